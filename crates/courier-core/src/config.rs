//! Client configuration
//!
//! `ClientConfig` deserializes from the documented construction shape
//! (`baseURL`, `headers`, `authentication`, `timeout`, `verifySSL`,
//! `userAgent`, `useJson`) and also offers `with_*` builders for
//! programmatic construction. Validation of the base URL and the
//! authentication credentials happens when the config is handed to
//! [`crate::Client::new`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration accepted at client construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Absolute base URL; trailing slashes are stripped at validation.
    #[serde(rename = "baseURL", default)]
    pub base_url: Option<String>,

    /// Default header entries as preformatted `"Name: value"` strings.
    #[serde(default)]
    pub headers: Vec<String>,

    /// Authentication descriptor, validated at construction.
    #[serde(default)]
    pub authentication: Option<AuthConfig>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout: u64,

    /// Whether to verify TLS certificates.
    #[serde(rename = "verifySSL", default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Custom user agent, if any.
    #[serde(rename = "userAgent", default)]
    pub user_agent: Option<String>,

    /// JSON mode: couples default Accept/Content-Type headers and body
    /// encoding/decoding to JSON.
    #[serde(rename = "useJson", default)]
    pub use_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            headers: Vec::new(),
            authentication: None,
            timeout: default_timeout_secs(),
            verify_tls: default_verify_tls(),
            user_agent: None,
            use_json: false,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Append one default header entry (`"Name: value"`).
    pub fn with_header(mut self, entry: impl Into<String>) -> Self {
        self.headers.push(entry.into());
        self
    }

    /// Set the authentication descriptor.
    pub fn with_authentication(mut self, kind: impl Into<String>, credentials: Value) -> Self {
        self.authentication = Some(AuthConfig {
            kind: kind.into(),
            credentials,
        });
        self
    }

    /// Set the timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Enable or disable JSON mode.
    pub fn with_use_json(mut self, use_json: bool) -> Self {
        self.use_json = use_json;
        self
    }
}

/// Raw `{type, credentials}` authentication pair.
///
/// Both fields are required; the credential shape itself is validated
/// against the declared type by [`crate::AuthScheme::from_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub credentials: Value,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_verify_tls() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert!(config.base_url.is_none());
        assert!(config.headers.is_empty());
        assert!(config.authentication.is_none());
        assert_eq!(config.timeout, 30);
        assert!(config.verify_tls);
        assert!(config.user_agent.is_none());
        assert!(!config.use_json);
    }

    #[test]
    fn test_deserialize_documented_shape() {
        let config: ClientConfig = serde_json::from_value(json!({
            "baseURL": "https://api.example.com",
            "headers": ["Accept: application/json"],
            "authentication": {"type": "bearer", "credentials": "abc"},
            "timeout": 10,
            "verifySSL": false,
            "userAgent": "courier-test",
            "useJson": true
        }))
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.headers, vec!["Accept: application/json"]);
        let auth = config.authentication.unwrap();
        assert_eq!(auth.kind, "bearer");
        assert_eq!(auth.credentials, json!("abc"));
        assert_eq!(config.timeout, 10);
        assert!(!config.verify_tls);
        assert_eq!(config.user_agent.as_deref(), Some("courier-test"));
        assert!(config.use_json);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: ClientConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.timeout, 30);
        assert!(config.verify_tls);
    }

    #[test]
    fn test_authentication_requires_both_fields() {
        let result: std::result::Result<ClientConfig, _> = serde_json::from_value(json!({
            "authentication": {"type": "bearer"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::new()
            .with_base_url("https://api.example.com")
            .with_header("X-Env: test")
            .with_authentication("basic", json!({"username": "u", "password": "p"}))
            .with_timeout(5)
            .with_verify_tls(false)
            .with_user_agent("agent/1.0")
            .with_use_json(true);

        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.headers.len(), 1);
        assert_eq!(config.authentication.unwrap().kind, "basic");
        assert_eq!(config.timeout, 5);
        assert!(!config.verify_tls);
        assert!(config.use_json);
    }
}
