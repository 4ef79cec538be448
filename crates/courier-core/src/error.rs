//! Error types for the courier client
//!
//! Configuration and builder mistakes surface synchronously as
//! `InvalidConfiguration`, `UnsupportedOperation`, or `FileNotFound`.
//! Transport-level failures (no HTTP response at all) are wrapped in
//! `Transport`; an HTTP response with a non-success status is *not* an
//! error and comes back as a normal [`crate::Response`] whose
//! `is_success()` is false.

use thiserror::Error;

use crate::transport::TransportError;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected at construction or setup time
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Operation not available in the current client mode
    #[error("Unsupported operation: {message}")]
    UnsupportedOperation { message: String },

    /// Attachment path does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// The transport produced no HTTP response (connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Body serialization or decoding errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
