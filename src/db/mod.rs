pub mod models;
pub mod store;

pub use store::{HistoryStore, PostgresStore};
