//! reqwest-backed page fetching.

use super::{FetchedPage, PageFetcher};
use crate::core::config::Config;
use crate::core::error::{AppError, Result};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Builds the shared HTTP client used by every live source.
pub(crate) fn build_http_client(config: &Config) -> Result<Client> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| AppError::Initialization(format!("Failed to build HTTP client: {}", e)))
}

/// Fetches pages over HTTP with a per-call timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage> {
        tracing::trace!(target: "fetch_task", "GET {} (timeout {:?})", url, timeout);
        let response = self.client.get(url).timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::debug!(target: "fetch_task", "Request to {} timed out", url);
            }
            AppError::Network(e)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }
}
