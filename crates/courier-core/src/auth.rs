//! Authentication schemes
//!
//! Supports three ways of attaching credentials to a request:
//! - Bearer tokens (`Authorization: Bearer <token>`)
//! - Basic credentials, passed to the transport rather than as a header
//! - API keys in a caller-named header
//!
//! A scheme is validated in full when it is constructed from a
//! `{type, credentials}` pair; malformed credential shapes are rejected
//! up front instead of being silently skipped at send time.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::headers::{Header, HeaderSet};

/// A validated authentication scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    Bearer { token: String },
    /// Transport-level credentials, never a header
    Basic { username: String, password: String },
    /// A key in a caller-named header
    ApiKey { header: String, key: String },
}

impl AuthScheme {
    /// Build a scheme from a `{type, credentials}` pair.
    ///
    /// `bearer` expects a token string; `basic` expects an object with
    /// `username` and `password`; `api_key` expects an object with
    /// `header` and `key`. Anything else is `InvalidConfiguration`.
    pub fn from_config(kind: &str, credentials: &Value) -> Result<Self> {
        match kind.to_ascii_lowercase().as_str() {
            "bearer" => {
                let token = credentials.as_str().ok_or_else(|| {
                    Error::invalid_config("bearer credentials must be a token string")
                })?;
                Ok(AuthScheme::Bearer {
                    token: token.to_string(),
                })
            }
            "basic" => {
                let fields = credentials.as_object().ok_or_else(|| {
                    Error::invalid_config(
                        "basic credentials must be an object with \"username\" and \"password\"",
                    )
                })?;
                let username = string_field(fields, "username", "basic")?;
                let password = string_field(fields, "password", "basic")?;
                Ok(AuthScheme::Basic { username, password })
            }
            "api_key" => {
                let fields = credentials.as_object().ok_or_else(|| {
                    Error::invalid_config(
                        "api_key credentials must be an object with \"header\" and \"key\"",
                    )
                })?;
                let header = string_field(fields, "header", "api_key")?;
                let key = string_field(fields, "key", "api_key")?;
                Ok(AuthScheme::ApiKey { header, key })
            }
            other => Err(Error::invalid_config(format!(
                "unknown authentication type: {other}"
            ))),
        }
    }

    /// Attach this scheme to an outgoing request: bearer and api_key
    /// append a header, basic fills the transport credential slot.
    pub(crate) fn apply(
        &self,
        headers: &mut HeaderSet,
        basic_auth: &mut Option<(String, String)>,
    ) {
        match self {
            AuthScheme::Bearer { token } => {
                headers.push(Header::new("Authorization", format!("Bearer {token}")));
            }
            AuthScheme::Basic { username, password } => {
                *basic_auth = Some((username.clone(), password.clone()));
            }
            AuthScheme::ApiKey { header, key } => {
                headers.push(Header::new(header.clone(), key.clone()));
            }
        }
    }
}

fn string_field(
    fields: &serde_json::Map<String, Value>,
    name: &str,
    kind: &str,
) -> Result<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::invalid_config(format!("{kind} credentials are missing \"{name}\""))
        })
}
