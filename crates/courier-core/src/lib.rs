//! Courier Core - a configurable, synchronous HTTP request client
//!
//! This crate builds a single outbound HTTP request from composable
//! pieces, executes it over a pluggable transport, and normalizes the
//! result into a status/headers/body value.
//!
//! # Main Components
//!
//! - **Client**: fluent configuration and per-call builder surface, one
//!   `execute` per round trip, verb shortcuts
//! - **Transport**: the collaborator trait that performs the network I/O,
//!   with a `reqwest::blocking` default
//! - **Retry**: bounded attempts with a pluggable predicate and
//!   configurable delay growth
//! - **Error Handling**: configuration and builder errors raised
//!   synchronously; transport failures returned, never thrown past the
//!   `Result` boundary
//!
//! # Example
//!
//! ```no_run
//! use courier_core::{Client, ClientConfig, Result};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let mut client = Client::new(
//!         ClientConfig::new()
//!             .with_base_url("https://api.example.com")
//!             .with_use_json(true),
//!     )?;
//!
//!     let response = client.post("/items", json!({"name": "x"}), &json!({}))?;
//!     assert!(response.is_success());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod logging;
pub mod request;
pub mod response;
pub mod retry;
pub mod transport;

// Re-export main types for convenience
pub use auth::AuthScheme;
pub use client::{Client, Outcome};
pub use config::{AuthConfig, ClientConfig};
pub use error::{Error, Result};
pub use headers::{Header, HeaderSet};
pub use logging::{LogBuffer, LogEntry};
pub use request::{PendingRequest, QueryParams, RequestSpec};
pub use response::Response;
pub use retry::{default_should_retry, AttemptOutcome, RetryDecision, RetryPolicy};
pub use transport::{
    HttpTransport, Transport, TransportError, TransportErrorKind, TransportResponse,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }
}
