//! Domain-pattern lookups against the Hunter.io domain-search API.

use super::EnrichmentApi;
use crate::core::error::{AppError, Result};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
struct DomainSearchResponse {
    #[serde(default)]
    data: Option<DomainSearchData>,
}

#[derive(Debug, Deserialize)]
struct DomainSearchData {
    #[serde(default)]
    pattern: Option<String>,
}

/// Client for the paid domain-search endpoint. Only constructed when an API key
/// is configured.
#[derive(Clone)]
pub struct HunterClient {
    http_client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl HunterClient {
    pub fn new(http_client: Client, endpoint: String, api_key: String, timeout: Duration) -> Self {
        Self {
            http_client,
            endpoint,
            api_key,
            timeout,
        }
    }

    fn request_url(&self, domain: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("domain", domain)
            .append_pair("api_key", &self.api_key)
            .append_pair("limit", "1");
        Ok(url)
    }
}

/// Pulls `data.pattern` out of a domain-search response body.
fn parse_pattern(body: &str) -> Result<Option<String>> {
    let parsed: DomainSearchResponse = serde_json::from_str(body)
        .map_err(|e| AppError::EnrichmentApi(format!("Malformed response: {}", e)))?;
    Ok(parsed
        .data
        .and_then(|d| d.pattern)
        .filter(|p| !p.trim().is_empty()))
}

#[async_trait]
impl EnrichmentApi for HunterClient {
    /// Returns `Ok(None)` when the API knows the domain but has no pattern for it.
    async fn domain_pattern(&self, domain: &str) -> Result<Option<String>> {
        let task_label = format!("[Domain search: {}]", domain);
        tracing::debug!(target: "enrichment_api", "{} Sending request", task_label);

        let response = self
            .http_client
            .get(self.request_url(domain)?)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(target: "enrichment_api", "{} Received status: {}", task_label, status);
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        let pattern = parse_pattern(&body)?;
        tracing::info!(target: "enrichment_api", "{} Pattern: {:?}", task_label, pattern);
        Ok(pattern)
    }
}
