//! Request assembly
//!
//! Per-call state accumulates in [`PendingRequest`] and is resolved into an
//! immutable [`RequestSpec`] at execute time. The spec is the complete,
//! already-encoded request: final URL (query string appended for GET and
//! DELETE), merged headers, encoded body, and the transport settings for
//! this round trip. Nothing in a spec is mutated after it is built.

use std::time::Duration;

use serde_json::Value;
use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::headers::HeaderSet;

/// Insertion-ordered query parameters.
///
/// Sequence values are flattened to comma-joined strings when inserted;
/// inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. `null` is treated as no parameters;
    /// any other non-object value is rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(fields) => {
                let mut params = Self::new();
                for (key, value) in fields {
                    params.insert(key, value);
                }
                Ok(params)
            }
            _ => Err(Error::invalid_config(
                "query parameters must be a JSON object",
            )),
        }
    }

    /// Insert one parameter, flattening sequence values to comma-joined
    /// strings. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: &str, value: &Value) {
        let flattened = flatten_value(value);
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = flattened,
            None => self.entries.push((key.to_string(), flattened)),
        }
    }

    /// URL-encode as a query string, in insertion order.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, String)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-call request state, consumed when `execute` resolves it into a
/// [`RequestSpec`]. All fields are back to their defaults once a call
/// completes, on every path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingRequest {
    /// Method, normalized to uppercase.
    pub method: Option<String>,
    /// Endpoint already joined with the base URL.
    pub endpoint: Option<String>,
    pub params: QueryParams,
    /// Body payload: a mapping or a raw value.
    pub data: Option<Value>,
    /// One-shot headers, appended after the defaults for this call only.
    pub headers: HeaderSet,
}

/// A fully-resolved, immutable request ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: String,
    pub url: String,
    pub headers: HeaderSet,
    /// Already-encoded body, when the method and payload call for one.
    pub body: Option<String>,
    /// Basic credentials, attached at the transport level rather than as
    /// a header.
    pub basic_auth: Option<(String, String)>,
    pub timeout: Duration,
    pub verify_tls: bool,
    pub user_agent: Option<String>,
}

/// An encoded body plus the content type it implies, if any.
pub(crate) struct EncodedBody {
    pub content: String,
    pub content_type: Option<&'static str>,
}

/// Encode a body payload. JSON mode serializes any value; otherwise a
/// mapping becomes a form-urlencoded payload and a raw value is passed
/// through as text with no implied content type.
pub(crate) fn encode_body(data: &Value, use_json: bool) -> Result<EncodedBody> {
    if use_json {
        return Ok(EncodedBody {
            content: serde_json::to_string(data)?,
            content_type: Some("application/json"),
        });
    }

    match data {
        Value::Object(fields) => {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (key, value) in fields {
                serializer.append_pair(key, &flatten_value(value));
            }
            Ok(EncodedBody {
                content: serializer.finish(),
                content_type: Some("application/x-www-form-urlencoded"),
            })
        }
        Value::String(raw) => Ok(EncodedBody {
            content: raw.clone(),
            content_type: None,
        }),
        other => Ok(EncodedBody {
            content: scalar_to_string(other),
            content_type: None,
        }),
    }
}

/// Whether a payload counts as empty for body-attachment purposes.
pub(crate) fn body_is_empty(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

fn flatten_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => scalar_to_string(other),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
