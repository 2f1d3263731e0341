//! Unified error types for the shelf backend.
//!
//! Every store operation classifies its failure into one of these kinds and
//! propagates it; nothing here retries.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the shelf store and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected before any write (e.g., unknown reading status).
    #[error("VALIDATION_ERROR: {0}")]
    Validation(String),

    /// No status or book exists for the requested key.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Stored data could not be decoded, or a row that must exist after a
    /// successful write is missing.
    #[error("STORAGE_INTEGRITY: {0}")]
    StorageIntegrity(String),

    /// Connection acquisition or statement execution failed.
    #[error("STORAGE_UNAVAILABLE: {0}")]
    StorageUnavailable(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORAGE_UNAVAILABLE: migration failed: {0}")]
    MigrationFailed(String),

    /// The external catalog did not answer in time.
    #[error("UPSTREAM_TIMEOUT: {0}")]
    UpstreamTimeout(String),

    /// The external catalog answered with an error or an unreadable body.
    #[error("UPSTREAM_ERROR: {0}")]
    Upstream(String),
}

impl Error {
    /// Whether the caller may retry the same operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StorageUnavailable(_) | Error::UpstreamTimeout(_) | Error::Upstream(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => {
                Error::StorageUnavailable(tokio_rusqlite::Error::ConnectionClosed)
            }
            tokio_rusqlite::Error::Close(c) => Error::StorageUnavailable(tokio_rusqlite::Error::Close(c)),
            _ => Error::StorageUnavailable(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e.into(),
            other => Error::StorageUnavailable(other),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        // CHECK / UNIQUE / FOREIGN KEY failures mean the application let bad
        // data through to the schema backstop.
        if err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
            return Error::StorageIntegrity(err.to_string());
        }
        Error::StorageUnavailable(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::Validation(msg) => (-32602, msg.clone()),
            Error::NotFound(msg) => (-32001, msg.clone()),
            Error::StorageIntegrity(msg) => (-32003, msg.clone()),
            Error::StorageUnavailable(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::UpstreamTimeout(msg) => (-32006, msg.clone()),
            Error::Upstream(msg) => (-32008, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
