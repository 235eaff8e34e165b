//! Error types for the Börsdata API client.

use greenblatt_traits::GreenblattError;
use thiserror::Error;

/// Errors that can occur when using the Börsdata API.
#[derive(Debug, Error)]
pub enum BorsdataError {
    /// Missing API key.
    #[error("BORSDATA_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("Börsdata API error: {0}")]
    Api(String),

    /// Still rate limited after every retry.
    #[error("Rate limit exceeded after {0} attempts")]
    RateLimitExceeded(u32),

    /// Environment variable error.
    #[error("Environment error: {0}")]
    Env(#[from] dotenvy::Error),
}

impl From<BorsdataError> for GreenblattError {
    fn from(err: BorsdataError) -> Self {
        Self::DataFetch(err.to_string())
    }
}
