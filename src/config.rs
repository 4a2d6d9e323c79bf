use std::time::Duration;

use crate::error::{AppError, Result};
use crate::types::DetectionPolicy;

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Seconds slept after each completed cycle. Delay-after-completion, not a
/// fixed-rate schedule, so cadence drifts by however long the cycle took.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Request timeout for the page fetch and Telegram delivery.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// The retail site rejects default library user agents.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

#[derive(Debug, Clone)]
pub struct Config {
    /// Product page to poll (PRODUCT_URL).
    pub product_url: String,
    /// Telegram bot token (TELEGRAM_TOKEN).
    pub telegram_token: String,
    /// Destination chat identifier (TELEGRAM_CHAT_ID).
    pub telegram_chat_id: String,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_db: String,
    pub postgres_user: String,
    pub postgres_password: String,
    /// Inter-cycle delay in seconds (POLL_INTERVAL_SECS).
    pub poll_interval_secs: u64,
    /// Detection policy: "latest" or "maximum" (DETECTION_POLICY).
    pub detection_policy: DetectionPolicy,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            product_url: required("PRODUCT_URL")?,
            telegram_token: required("TELEGRAM_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
            postgres_host: required("POSTGRES_HOST")?,
            postgres_port: required("POSTGRES_PORT")?
                .parse::<u16>()
                .map_err(|_| {
                    AppError::Config("POSTGRES_PORT must be a valid port number".to_string())
                })?,
            postgres_db: required("POSTGRES_DB")?,
            postgres_user: required("POSTGRES_USER")?,
            postgres_password: required("POSTGRES_PASSWORD")?,
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL_SECS.to_string())
                .parse::<u64>()
                .map_err(|_| {
                    AppError::Config("POLL_INTERVAL_SECS must be a whole number of seconds".to_string())
                })?,
            detection_policy: {
                let raw = std::env::var("DETECTION_POLICY").unwrap_or_else(|_| "latest".to_string());
                DetectionPolicy::parse(&raw).ok_or_else(|| {
                    AppError::Config(format!(
                        "DETECTION_POLICY must be \"latest\" or \"maximum\", got {raw:?}"
                    ))
                })?
            },
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.postgres_user,
            self.postgres_password,
            self.postgres_host,
            self.postgres_port,
            self.postgres_db,
        )
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| AppError::Config(format!("{name} must be set")))
}
