mod config;
mod db;
mod detector;
mod error;
mod fetcher;
mod notifier;
mod parser;
mod tracker;
mod types;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, TELEGRAM_API_URL};
use crate::db::{HistoryStore, PostgresStore};
use crate::error::Result;
use crate::fetcher::HttpFetcher;
use crate::notifier::TelegramNotifier;
use crate::tracker::PriceTracker;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database setup: schema failure here is fatal, never skipped ---
    let store = PostgresStore::connect(&cfg.database_url()).await?;
    store.initialize().await?;
    let pool = store.pool().clone();
    info!(
        host = %cfg.postgres_host,
        db = %cfg.postgres_db,
        "database ready",
    );

    // --- Collaborators, injected into the tracker ---
    let fetcher = HttpFetcher::new(cfg.product_url.clone())?;
    let notifier = TelegramNotifier::new(
        TELEGRAM_API_URL.to_string(),
        cfg.telegram_token.clone(),
        cfg.telegram_chat_id.clone(),
    )?;

    // --- Cooperative shutdown on Ctrl-C ---
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
        }
        let _ = shutdown_tx.send(true);
    });

    let tracker = PriceTracker::new(
        fetcher,
        store,
        notifier,
        cfg.detection_policy,
        cfg.poll_interval(),
        shutdown_rx,
    );
    tracker.run().await;

    // Connection released on every exit path — run() only returns once the
    // loop has stopped.
    pool.close().await;
    info!("store connection closed");

    Ok(())
}
