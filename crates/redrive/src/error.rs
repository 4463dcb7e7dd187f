//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations.
///
/// A transport-level error means no usable response was received at all; an
/// unfavorable status code is not an error and is returned as a normal
/// [`HttpResponse`](crate::HttpResponse).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request body could not be fully buffered before the first attempt.
    #[error("failed to buffer request body: {0}")]
    BodyCapture(#[source] std::io::Error),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Timeout error.
    #[error("timeout")]
    Timeout,

    /// HTTP request/response error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Generic transport error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
