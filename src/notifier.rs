use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{AppError, Result};
use crate::types::PriceEvent;

/// Delivers one human-readable message per notable event. Delivery is
/// best-effort from the tracker's point of view; a failure never fails
/// the cycle that produced it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Renders the message for an event, or `None` for the event kinds that do
/// not notify (`Unchanged`, `BelowMaximum`).
pub fn format_event(product_name: &str, event: &PriceEvent) -> Option<String> {
    match event {
        PriceEvent::FirstSeen { price } => {
            Some(format!("Price detected for {product_name}: R$ {price}"))
        }
        PriceEvent::Increased {
            price,
            previous_price,
            previous_at,
        } => Some(format!(
            "Price increased for {product_name}: R$ {price} (was R$ {previous_price} at {})",
            format_timestamp(previous_at),
        )),
        PriceEvent::Decreased {
            price,
            previous_price,
            previous_at,
        } => Some(format!(
            "Price dropped for {product_name}: R$ {price} (was R$ {previous_price} at {})",
            format_timestamp(previous_at),
        )),
        PriceEvent::Unchanged => None,
        PriceEvent::NewMaximum { price } => {
            Some(format!("New maximum price for {product_name}: R$ {price}"))
        }
        PriceEvent::BelowMaximum { .. } => None,
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%d/%m/%Y %H:%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// TelegramNotifier
// ---------------------------------------------------------------------------

/// Sends messages through the Telegram Bot API (`sendMessage`).
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(api_url: String, token: String, chat_id: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Notification(e.to_string()))?;
        Ok(Self {
            client,
            api_url,
            token,
            chat_id,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Notification(e.to_string()))?;

        debug!(chars = text.len(), "telegram message delivered");
        Ok(())
    }
}
