//! Transport collaborator
//!
//! The [`Transport`] trait is the seam between request assembly and the
//! network: it receives a fully-resolved [`RequestSpec`] and returns the
//! raw status/headers/body triple, or a classified [`TransportError`] when
//! no HTTP response was produced at all. [`HttpTransport`] is the default
//! implementation over reqwest's blocking client.

use std::fmt;

use thiserror::Error;

use crate::request::RequestSpec;

/// Maximum redirects the default transport will follow.
const MAX_REDIRECTS: usize = 10;

/// Classification of transport-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection could not be established (includes TLS handshake
    /// failures surfaced by the connector).
    Connect,
    /// The request timed out.
    Timeout,
    /// Certificate or TLS-layer failure, when the transport can tell.
    Tls,
    /// Anything else.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Connect => write!(f, "connection error"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Tls => write!(f, "TLS error"),
            TransportErrorKind::Other => write!(f, "transport error"),
        }
    }
}

/// A transport-level failure: the round trip produced no HTTP response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn tls(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Tls, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }
}

/// Raw output of one round trip, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Headers in wire order; duplicates preserved.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// The capability that performs the actual network I/O for one request.
///
/// Implementations must return a response for every HTTP status the
/// server produces, including 4xx and 5xx; `Err` is reserved for failures
/// where no response exists (connect, TLS, timeout).
pub trait Transport: Send + Sync {
    fn round_trip(&self, request: &RequestSpec) -> Result<TransportResponse, TransportError>;
}

/// Default transport over `reqwest::blocking`.
///
/// The inner client is built per round trip: timeout and TLS settings are
/// per-request state here, and sockets stay scoped to a single attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for HttpTransport {
    fn round_trip(&self, request: &RequestSpec) -> Result<TransportResponse, TransportError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(request.timeout)
            .danger_accept_invalid_certs(!request.verify_tls)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));
        if let Some(agent) = &request.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::other(e.to_string()))?;

        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| TransportError::other(format!("invalid method {}: {e}", request.method)))?;

        let mut outgoing = client.request(method, &request.url);
        for header in &request.headers {
            outgoing = outgoing.header(header.name.as_str(), header.value.as_str());
        }
        if let Some((username, password)) = &request.basic_auth {
            outgoing = outgoing.basic_auth(username, Some(password));
        }
        if let Some(body) = &request.body {
            outgoing = outgoing.body(body.clone());
        }

        let response = outgoing.send().map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().map_err(classify)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    let kind = if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    TransportError::new(kind, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_classification() {
        let err = TransportError::timeout("deadline exceeded");
        assert_eq!(err.to_string(), "timeout: deadline exceeded");

        let err = TransportError::connect("refused");
        assert_eq!(err.to_string(), "connection error: refused");
    }

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(TransportError::tls("x").kind, TransportErrorKind::Tls);
        assert_eq!(TransportError::other("x").kind, TransportErrorKind::Other);
    }
}
