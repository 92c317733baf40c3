//! Web search by scraping a search engine's HTML results page.

use super::SearchEngine;
use crate::core::config::{get_random_sleep_duration, Config};
use crate::core::error::{AppError, Result};

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use tokio::time::sleep;
use url::Url;

static RESULT_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="(/url\?[^"]+|https?://[^"]+)""#).unwrap());

/// Scrapes the results page of a Google-style search endpoint.
#[derive(Clone)]
pub struct GoogleSearch {
    http_client: Client,
    config: Arc<Config>,
}

impl GoogleSearch {
    pub fn new(http_client: Client, config: Arc<Config>) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn query_url(&self, query: &str, max_results: usize) -> Result<Url> {
        let mut url = Url::parse(&self.config.search_url)?;
        // Ask for a couple extra since some links are the engine's own pages.
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("num", &(max_results + 2).to_string())
            .append_pair("hl", "en");
        Ok(url)
    }
}

#[async_trait]
impl SearchEngine for GoogleSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
        let delay = get_random_sleep_duration(&self.config);
        if !delay.is_zero() {
            tracing::trace!(target: "search_task", "Sleeping {:?} before query", delay);
            sleep(delay).await;
        }

        let url = self.query_url(query, max_results)?;
        tracing::debug!(target: "search_task", "Searching: {}", query);
        let response = self
            .http_client
            .get(url)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
            return Err(AppError::SearchBlocked(format!(
                "status {} for query {}",
                status, query
            )));
        }
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: self.config.search_url.clone(),
            });
        }

        let html = response.text().await?;
        Ok(parse_result_links(&html, max_results))
    }
}

/// Extracts up to `max_results` distinct external result URLs from a results page.
///
/// Redirect links (`/url?q=...`) are unwrapped; links back to the search engine
/// itself are dropped.
pub(crate) fn parse_result_links(html: &str, max_results: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for caps in RESULT_LINK_REGEX.captures_iter(html) {
        let raw = caps[1].replace("&amp;", "&");
        let target = match raw.strip_prefix("/url?") {
            Some(query) => url::form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == "q" || k == "url")
                .map(|(_, v)| v.into_owned()),
            None => Some(raw),
        };
        let Some(target) = target else { continue };

        let Ok(parsed) = Url::parse(&target) else {
            continue;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            continue;
        }
        let host = parsed.host_str().unwrap_or_default();
        if host.is_empty() || is_engine_host(host) {
            continue;
        }
        if seen.insert(target.clone()) {
            links.push(target);
            if links.len() >= max_results {
                break;
            }
        }
    }
    links
}

fn is_engine_host(host: &str) -> bool {
    let host = host.to_lowercase();
    host.contains("google.")
        || host.ends_with("googleusercontent.com")
        || host.ends_with("gstatic.com")
        || host.ends_with("youtube.com")
}
