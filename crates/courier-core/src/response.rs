//! Response values
//!
//! A [`Response`] is built once from the transport's raw output and
//! returned by value; header names are lower-cased, and when a name
//! repeats the first occurrence wins.

use std::collections::HashMap;

use serde_json::Value;

use crate::transport::TransportResponse;

/// The normalized result of one HTTP round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers with lower-cased names; on duplicate names the
    /// first occurrence wins.
    pub headers: HashMap<String, String>,
    /// Raw body text.
    pub body: String,
    /// Body decoded as JSON when JSON mode was active and the body parsed.
    pub json: Option<Value>,
}

impl Response {
    pub(crate) fn from_transport(raw: TransportResponse, decode_json: bool) -> Self {
        let mut headers = HashMap::new();
        for (name, value) in raw.headers {
            headers
                .entry(name.trim().to_ascii_lowercase())
                .or_insert_with(|| value.trim().to_string());
        }

        let json = if decode_json {
            serde_json::from_str(&raw.body).ok()
        } else {
            None
        };

        Self {
            status: raw.status,
            headers,
            body: raw.body,
            json,
        }
    }

    /// True iff the status is in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The body as JSON: the eagerly-decoded value when JSON mode was on,
    /// otherwise decoded on demand.
    pub fn json(&self) -> Option<Value> {
        self.json
            .clone()
            .or_else(|| serde_json::from_str(&self.body).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(status: u16, headers: Vec<(&str, &str)>, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            headers: headers
                .into_iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_header_names_are_lowercased_first_wins() {
        let response = Response::from_transport(
            raw(
                200,
                vec![
                    ("Content-Type", "application/json"),
                    ("X-Dup", "first"),
                    ("x-dup", "second"),
                ],
                "",
            ),
            false,
        );

        assert_eq!(response.headers.get("content-type").unwrap(), "application/json");
        assert_eq!(response.headers.get("x-dup").unwrap(), "first");
        assert_eq!(response.headers.len(), 2);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = Response::from_transport(raw(200, vec![("X-Id", "42")], ""), false);
        assert_eq!(response.header("x-id"), Some("42"));
        assert_eq!(response.header("X-ID"), Some("42"));
        assert_eq!(response.header("missing"), None);
    }

    #[test]
    fn test_success_bounds() {
        for (status, success) in [(199, false), (200, true), (299, true), (300, false), (404, false)]
        {
            let response = Response::from_transport(raw(status, vec![], ""), false);
            assert_eq!(response.is_success(), success, "status {status}");
        }
    }

    #[test]
    fn test_json_mode_decodes_eagerly() {
        let response =
            Response::from_transport(raw(200, vec![], r#"{"id": 1}"#), true);
        assert_eq!(response.json, Some(json!({"id": 1})));
    }

    #[test]
    fn test_json_mode_tolerates_unparseable_body() {
        let response = Response::from_transport(raw(200, vec![], "not json"), true);
        assert!(response.json.is_none());
        assert_eq!(response.body, "not json");
    }

    #[test]
    fn test_json_on_demand_when_mode_off() {
        let response = Response::from_transport(raw(200, vec![], r#"{"id": 1}"#), false);
        assert!(response.json.is_none());
        assert_eq!(response.json(), Some(json!({"id": 1})));
    }
}
