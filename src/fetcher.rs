use std::time::Duration;

use async_trait::async_trait;

use crate::config::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{AppError, Result};

/// Produces the raw product page document for one poll cycle.
/// A trait seam so tests can drive the tracker with canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self) -> Result<String>;
}

/// Fetches the configured product page over HTTP.
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(AppError::Fetch)?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(AppError::Fetch)?;

        response.text().await.map_err(AppError::Fetch)
    }
}
