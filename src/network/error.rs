//! Error handling for the network module

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The response body was not the JSON document we expected.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically while building the HTTP client.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with something other than 200.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl ApiError {
    /// True when the site could not be reached or failed on its side.
    pub fn is_unavailable(&self) -> bool {
        match self {
            ApiError::Http { status, .. } => *status == 0 || (500..=599).contains(status),
            ApiError::Reqwest(_) => true,
            ApiError::Decode(_) => false,
        }
    }
}
