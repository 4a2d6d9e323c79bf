use thiserror::Error;

/// Failure taxonomy for the tracker. Fetch/Parse/StorageRead/StorageWrite
/// are cycle-scoped and recovered by the poll loop; StorageUnavailable and
/// Config are fatal at startup; Notification is best-effort only.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("fetch error: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("page structure error: {0}")]
    Parse(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    #[error("storage read error: {0}")]
    StorageRead(#[source] sqlx::Error),

    #[error("storage write error: {0}")]
    StorageWrite(#[source] sqlx::Error),

    #[error("notification delivery error: {0}")]
    Notification(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
