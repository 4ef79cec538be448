//! The request client
//!
//! `Client` owns the process-lifetime configuration (base URL, default
//! headers, authentication, timeout, TLS verification, user agent, JSON
//! mode) and a per-call [`PendingRequest`] accumulator. `execute` resolves
//! the pending state into an immutable [`RequestSpec`], hands it to the
//! [`Transport`] collaborator, and returns a [`Response`] value. The
//! pending state is consumed up front, so a later call can never replay
//! stale request state, whatever the outcome of this one.
//!
//! The client is synchronous and single-threaded: every operation blocks
//! until the transport returns or times out. Sharing one instance across
//! threads requires external synchronization; the per-call state is
//! exactly what would race.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};
use url::Url;

use crate::auth::AuthScheme;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::headers::HeaderSet;
use crate::logging::{LogBuffer, LogEntry};
use crate::request::{body_is_empty, encode_body, PendingRequest, QueryParams, RequestSpec};
use crate::response::Response;
use crate::retry::{default_should_retry, AttemptOutcome, RetryDecision, RetryPolicy};
use crate::transport::{HttpTransport, Transport};

/// Classified result of one executed call, a plain value in place of
/// callback-style completion handling.
#[derive(Debug)]
pub enum Outcome {
    /// Status in `[200, 300)`.
    Success(Response),
    /// Status `>= 400`, or no response at all.
    Failure {
        response: Option<Response>,
        error: Option<Error>,
    },
    /// A final 3xx after redirect handling: neither success nor failure,
    /// left to the caller.
    Ambiguous(Response),
}

/// Configurable synchronous HTTP request client.
pub struct Client {
    base_url: Option<String>,
    headers: HeaderSet,
    auth: Option<AuthScheme>,
    timeout: Duration,
    verify_tls: bool,
    user_agent: Option<String>,
    use_json: bool,
    pending: PendingRequest,
    transport: Box<dyn Transport>,
    logbook: LogBuffer,
}

impl Client {
    /// Create a client over the default [`HttpTransport`].
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, Box::new(HttpTransport::new()))
    }

    /// Create a client with a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Box<dyn Transport>) -> Result<Self> {
        let mut client = Self {
            base_url: None,
            headers: HeaderSet::new(),
            auth: None,
            timeout: Duration::from_secs(config.timeout),
            verify_tls: config.verify_tls,
            user_agent: config.user_agent.clone(),
            use_json: false,
            pending: PendingRequest::default(),
            transport,
            logbook: LogBuffer::new(),
        };

        if let Some(url) = &config.base_url {
            client.set_base_url(url)?;
        }
        if !config.headers.is_empty() {
            client.set_headers(&config.headers);
        }
        if let Some(auth) = &config.authentication {
            client.set_authentication(&auth.kind, &auth.credentials)?;
        }
        if config.use_json {
            client.set_use_json(true);
        }

        Ok(client)
    }

    // --- configuration surface ---

    /// Set the base URL. Must parse as an absolute URL; trailing slashes
    /// are stripped.
    pub fn set_base_url(&mut self, url: &str) -> Result<&mut Self> {
        Url::parse(url).map_err(|e| Error::InvalidConfiguration {
            message: format!("invalid base URL: {url}"),
            source: Some(anyhow::Error::new(e)),
        })?;
        self.base_url = Some(url.trim_end_matches('/').to_string());
        Ok(self)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Validate and store an authentication scheme from a
    /// `{type, credentials}` pair.
    pub fn set_authentication(&mut self, kind: &str, credentials: &Value) -> Result<&mut Self> {
        self.auth = Some(AuthScheme::from_config(kind, credentials)?);
        Ok(self)
    }

    /// Store an already-built scheme.
    pub fn set_auth_scheme(&mut self, scheme: AuthScheme) -> &mut Self {
        self.auth = Some(scheme);
        self
    }

    pub fn clear_authentication(&mut self) -> &mut Self {
        self.auth = None;
        self
    }

    /// Replace the default header set wholesale with preformatted
    /// `"Name: value"` entries.
    pub fn set_headers<I, S>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.headers = HeaderSet::from_lines(entries);
        self
    }

    /// Append one default header.
    pub fn add_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.headers.add(name, value);
        self
    }

    /// Append one default header from a preformatted `"Name: value"`
    /// string.
    pub fn add_header_line(&mut self, entry: &str) -> &mut Self {
        self.headers.add_line(entry);
        self
    }

    /// Remove default headers by case-insensitive name, optionally
    /// restricted to an exact (trimmed) value.
    pub fn remove_header(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.headers.remove(name, value);
        self
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Toggle JSON mode. Enabling swaps any existing `Content-Type` and
    /// `Accept` entries for `application/json`; disabling removes only the
    /// `application/json` entries it manages.
    pub fn set_use_json(&mut self, use_json: bool) -> &mut Self {
        self.use_json = use_json;

        if use_json {
            self.headers.remove("Content-Type", None);
            self.headers.remove("Accept", None);
            self.headers.add("Content-Type", "application/json");
            self.headers.add("Accept", "application/json");
        } else {
            self.headers.remove("Content-Type", Some("application/json"));
            self.headers.remove("Accept", Some("application/json"));
        }

        self
    }

    pub fn use_json(&self) -> bool {
        self.use_json
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn set_verify_tls(&mut self, verify: bool) -> &mut Self {
        self.verify_tls = verify;
        self
    }

    pub fn set_user_agent(&mut self, agent: impl Into<String>) -> &mut Self {
        self.user_agent = Some(agent.into());
        self
    }

    // --- request builder surface ---

    /// Composite setter: method and endpoint always, params/data/one-shot
    /// headers when given. The headers apply to this call only and are
    /// appended after the defaults.
    pub fn set_request(
        &mut self,
        method: &str,
        endpoint: &str,
        params: Option<&Value>,
        data: Option<Value>,
        headers: Option<&[&str]>,
    ) -> Result<&mut Self> {
        self.set_method(method);
        self.set_endpoint(endpoint)?;
        if let Some(params) = params {
            self.set_params(params)?;
        }
        if let Some(data) = data {
            self.set_data(data);
        }
        if let Some(lines) = headers {
            self.pending.headers = HeaderSet::from_lines(lines.iter().copied());
        }
        Ok(self)
    }

    /// Set the method, normalized to uppercase.
    pub fn set_method(&mut self, method: &str) -> &mut Self {
        self.pending.method = Some(method.trim().to_ascii_uppercase());
        self
    }

    /// Join the base URL and an endpoint path with exactly one separating
    /// slash.
    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<&mut Self> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| Error::invalid_config("base URL is not configured"))?;
        self.pending.endpoint = Some(format!("{base}/{}", endpoint.trim_start_matches('/')));
        Ok(self)
    }

    /// Replace the query parameters from a JSON object; sequence values
    /// are flattened to comma-joined strings. `null` clears them.
    pub fn set_params(&mut self, params: &Value) -> Result<&mut Self> {
        self.pending.params = QueryParams::from_value(params)?;
        Ok(self)
    }

    /// Insert one query parameter with the same flattening rule.
    pub fn add_param(&mut self, key: &str, value: &Value) -> &mut Self {
        self.pending.params.insert(key, value);
        self
    }

    /// Replace the body payload (a mapping or a raw value).
    pub fn set_data(&mut self, data: Value) -> &mut Self {
        self.pending.data = Some(data);
        self
    }

    /// Insert one field into the mapping body, replacing any non-mapping
    /// payload with a fresh mapping first.
    pub fn add_field(&mut self, key: &str, value: Value) -> &mut Self {
        if !matches!(self.pending.data, Some(Value::Object(_))) {
            self.pending.data = Some(json!({}));
        }
        if let Some(Value::Object(fields)) = &mut self.pending.data {
            fields.insert(key.to_string(), value);
        }
        self
    }

    /// Attach a file reference for form submission, stored as the
    /// canonical path prefixed with `@` (the cURL file-reference
    /// convention; multipart encoding itself is out of scope).
    ///
    /// Fails with `UnsupportedOperation` while JSON mode is active, and
    /// with `FileNotFound` when the path does not exist. Body state is
    /// untouched on failure.
    pub fn add_file(&mut self, key: &str, path: impl AsRef<Path>) -> Result<&mut Self> {
        if self.use_json {
            return Err(Error::UnsupportedOperation {
                message: "file attachment is not supported in JSON mode; disable JSON mode first"
                    .to_string(),
            });
        }

        let path = path.as_ref();
        let canonical = fs::canonicalize(path).map_err(|_| Error::FileNotFound {
            path: path.display().to_string(),
        })?;

        self.add_field(key, Value::String(format!("@{}", canonical.display())));
        Ok(self)
    }

    /// The per-call state accumulated so far.
    pub fn pending(&self) -> &PendingRequest {
        &self.pending
    }

    /// Reset all per-call state.
    pub fn clear(&mut self) -> &mut Self {
        self.pending = PendingRequest::default();
        self
    }

    // --- logging ---

    pub fn enable_logging(&mut self) -> &mut Self {
        self.logbook.set_enabled(true);
        self
    }

    pub fn disable_logging(&mut self) -> &mut Self {
        self.logbook.set_enabled(false);
        self
    }

    /// Append a caller-supplied entry; a no-op unless logging is enabled.
    pub fn log(&mut self, message: &str, data: Option<Value>) -> &mut Self {
        self.logbook.record(message, data);
        self
    }

    pub fn logs(&self) -> &[LogEntry] {
        self.logbook.entries()
    }

    pub fn clear_logs(&mut self) -> &mut Self {
        self.logbook.clear();
        self
    }

    // --- execution ---

    /// Perform one round trip with the pending request state.
    ///
    /// Transport-level failures come back as `Err(Error::Transport)`; any
    /// HTTP response, success or not, comes back as `Ok`; check
    /// [`Response::is_success`]. Pending state is consumed either way.
    pub fn execute(&mut self) -> Result<Response> {
        let spec = self.resolve_spec()?;
        self.perform(&spec).map_err(Error::from)
    }

    /// `execute` with up to `policy.max_attempts` round trips, using the
    /// default retry predicate (transport errors, 5xx, 429).
    pub fn execute_with_retry(&mut self, policy: &RetryPolicy) -> Result<Response> {
        self.execute_with_retry_if(policy, default_should_retry)
    }

    /// `execute` with a caller-supplied retry predicate over each
    /// attempt's outcome. The request is resolved once; the delay between
    /// attempts follows the policy, and no delay runs after the final
    /// attempt.
    pub fn execute_with_retry_if<F>(
        &mut self,
        policy: &RetryPolicy,
        mut should_retry: F,
    ) -> Result<Response>
    where
        F: FnMut(&AttemptOutcome) -> bool,
    {
        let spec = self.resolve_spec()?;
        let mut backoff = policy.backoff();
        let mut attempt: u32 = 1;

        loop {
            let outcome = self.perform(&spec);
            match policy.decide(attempt, should_retry(&outcome), &mut backoff) {
                RetryDecision::Stop => return outcome.map_err(Error::from),
                RetryDecision::Retry { delay } => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        url = %spec.url,
                        "attempt failed, retrying"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// One `execute`, classified into a plain [`Outcome`] value.
    pub fn execute_outcome(&mut self) -> Outcome {
        match self.execute() {
            Ok(response) if response.is_success() => Outcome::Success(response),
            Ok(response) if response.status >= 400 => Outcome::Failure {
                response: Some(response),
                error: None,
            },
            Ok(response) => Outcome::Ambiguous(response),
            Err(error) => Outcome::Failure {
                response: None,
                error: Some(error),
            },
        }
    }

    // --- verb shortcuts ---
    //
    // Every shortcut clears all per-call state before configuring, so
    // residue from an abandoned builder sequence cannot leak in.

    pub fn get(&mut self, endpoint: &str, params: &Value) -> Result<Response> {
        self.clear();
        self.set_params(params)?;
        self.set_method("GET");
        self.set_endpoint(endpoint)?;
        self.execute()
    }

    pub fn post(&mut self, endpoint: &str, data: Value, params: &Value) -> Result<Response> {
        self.clear();
        self.set_params(params)?;
        self.set_data(data);
        self.set_method("POST");
        self.set_endpoint(endpoint)?;
        self.execute()
    }

    pub fn put(&mut self, endpoint: &str, data: Value, params: &Value) -> Result<Response> {
        self.clear();
        self.set_params(params)?;
        self.set_data(data);
        self.set_method("PUT");
        self.set_endpoint(endpoint)?;
        self.execute()
    }

    pub fn patch(&mut self, endpoint: &str, data: Value, params: &Value) -> Result<Response> {
        self.clear();
        self.set_params(params)?;
        self.set_data(data);
        self.set_method("PATCH");
        self.set_endpoint(endpoint)?;
        self.execute()
    }

    pub fn delete(&mut self, endpoint: &str, params: &Value) -> Result<Response> {
        self.clear();
        self.set_params(params)?;
        self.set_method("DELETE");
        self.set_endpoint(endpoint)?;
        self.execute()
    }

    // --- internals ---

    /// Consume the pending state and resolve it into an immutable spec.
    /// Taking the state first is what guarantees the reset-after-every-
    /// execute invariant, including on resolution errors.
    fn resolve_spec(&mut self) -> Result<RequestSpec> {
        let pending = std::mem::take(&mut self.pending);

        let method = pending
            .method
            .ok_or_else(|| Error::invalid_config("no request method configured"))?;
        let endpoint = pending
            .endpoint
            .ok_or_else(|| Error::invalid_config("no request endpoint configured"))?;

        // Query parameters reach the URL only for GET and DELETE; for
        // body-carrying methods they are neither appended nor merged into
        // the body.
        let url = if matches!(method.as_str(), "GET" | "DELETE") && !pending.params.is_empty() {
            format!("{endpoint}?{}", pending.params.encode())
        } else {
            endpoint
        };

        let mut headers = self.headers.clone();
        headers.extend(pending.headers);

        let mut basic_auth = None;
        if let Some(auth) = &self.auth {
            auth.apply(&mut headers, &mut basic_auth);
        }

        let mut body = None;
        if matches!(method.as_str(), "POST" | "PUT" | "PATCH") {
            if let Some(data) = pending.data.as_ref().filter(|d| !body_is_empty(d)) {
                let encoded = encode_body(data, self.use_json)?;
                if let Some(content_type) = encoded.content_type {
                    if !headers.contains("Content-Type") {
                        headers.add("Content-Type", content_type);
                    }
                }
                body = Some(encoded.content);
            }
        }

        Ok(RequestSpec {
            method,
            url,
            headers,
            body,
            basic_auth,
            timeout: self.timeout,
            verify_tls: self.verify_tls,
            user_agent: self.user_agent.clone(),
        })
    }

    /// One transport round trip, with logging on both sides.
    fn perform(&mut self, spec: &RequestSpec) -> AttemptOutcome {
        tracing::debug!(method = %spec.method, url = %spec.url, "dispatching request");
        self.logbook.record(
            "dispatching request",
            Some(json!({"method": spec.method, "url": spec.url})),
        );

        match self.transport.round_trip(spec) {
            Ok(raw) => {
                let response = Response::from_transport(raw, self.use_json);
                tracing::debug!(status = response.status, "response received");
                self.logbook
                    .record("response received", Some(json!({"status": response.status})));
                Ok(response)
            }
            Err(error) => {
                tracing::warn!(%error, url = %spec.url, "transport failure");
                self.logbook
                    .record("transport failure", Some(json!({"error": error.to_string()})));
                Err(error)
            }
        }
    }
}
