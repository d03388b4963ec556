//! Mars API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarsApiError {
    #[error("Failed to parse Mars API response for filter '{filter}': {source}")]
    ApiResponseError {
        filter: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Mars API error (status {status_code}): {message}")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Mars API request timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl {
        url: String,
        reason: String,
    },
}
