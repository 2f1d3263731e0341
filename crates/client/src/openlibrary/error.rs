//! Open Library client error types.

use std::sync::Arc;

/// Errors from the Open Library search client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpenLibraryError {
    /// Invalid search parameters.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// HTTP error response.
    #[error("Open Library API error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request to Open Library timed out")]
    Timeout,

    /// Network error.
    #[error("failed to connect to Open Library: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for OpenLibraryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { OpenLibraryError::Timeout } else { OpenLibraryError::Network(Arc::new(err)) }
    }
}

impl From<OpenLibraryError> for shelf_core::Error {
    fn from(err: OpenLibraryError) -> Self {
        match err {
            OpenLibraryError::Timeout => shelf_core::Error::UpstreamTimeout(OpenLibraryError::Timeout.to_string()),
            OpenLibraryError::InvalidQuery(msg) => shelf_core::Error::Validation(msg),
            other => shelf_core::Error::Upstream(other.to_string()),
        }
    }
}
