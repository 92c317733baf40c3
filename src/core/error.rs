//! Error types shared across the enrichment library.

use thiserror::Error;

/// Errors raised by the enrichment library.
///
/// Per-record enrichment never surfaces these to the caller: network and parse
/// failures are logged where they occur and the cascade moves on to the next source.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization error: {0}")]
    Initialization(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Search engine refused the query: {0}")]
    SearchBlocked(String),

    #[error("Enrichment API error: {0}")]
    EnrichmentApi(String),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, AppError>;
