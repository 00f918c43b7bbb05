//! Bounded-duration requests against the Waitlist Service.
//!
//! Every exchange goes through [`HttpClient::request`], which wraps the
//! transport in a single timer and tolerates unparseable bodies. Failures
//! surface as [`TransportError`]; nothing here panics.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const SUBMIT_PATH: &str = "/api/waitlist";
pub const STATS_PATH: &str = "/api/waitlist/stats";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single outbound call: method, service-relative path, optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Status line and raw bytes as they came off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub bytes: Vec<u8>,
}

/// Transport-level failure before a status line was available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("waitlist transport failed: {message}")]
pub struct TransportFailure {
    pub message: String,
}

/// Moves bytes to and from the Waitlist Service.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFailure>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

/// One `{field, message}` item from a validation response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldIssue {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub message: String,
}

/// Parsed JSON object body. Anything that is not a JSON object reads as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseBody(Map<String, Value>);

impl ResponseBody {
    pub fn parse(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Self(map),
            Ok(other) => {
                debug!(kind = json_kind(&other), "response body is not an object");
                Self::default()
            }
            Err(err) => {
                debug!(%err, "response body is not valid json");
                Self::default()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// True only for a literal `"success": true`.
    pub fn success(&self) -> bool {
        matches!(self.0.get("success"), Some(Value::Bool(true)))
    }

    pub fn message(&self) -> Option<&str> {
        self.non_empty_str("message")
    }

    pub fn error(&self) -> Option<&str> {
        self.non_empty_str("error")
    }

    /// Validation items in server order; malformed items are skipped.
    pub fn details(&self) -> Vec<FieldIssue> {
        match self.0.get("details") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| FieldIssue::deserialize(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub ok: bool,
    pub reason: Option<String>,
    pub body: ResponseBody,
}

/// Wraps a [`Transport`] with a per-call timer and body normalization.
pub struct HttpClient<T> {
    transport: T,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The timer is dropped on every exit path; an expired timer drops the
    /// transport future, which aborts the underlying call.
    pub async fn request(
        &self,
        request: &ApiRequest,
        timeout: Duration,
    ) -> Result<ApiResponse, TransportError> {
        let raw = match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(failure)) => {
                warn!(path = %request.path, error = %failure.message, "waitlist request failed");
                return Err(TransportError::Network(failure.message));
            }
            Err(_) => {
                warn!(path = %request.path, ?timeout, "waitlist request timed out");
                return Err(TransportError::Timeout);
            }
        };

        let body = ResponseBody::parse(&raw.bytes);
        debug!(path = %request.path, status = raw.status, ?body, "waitlist response received");

        Ok(ApiResponse {
            status: raw.status,
            ok: (200..300).contains(&raw.status),
            reason: raw.reason,
            body,
        })
    }
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFailure> {
        let url = self.endpoint(&request.path);
        let builder = match request.method {
            Method::Get => self.http.get(url.as_str()),
            Method::Post => self.http.post(url.as_str()),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|err| TransportFailure {
            message: err.to_string(),
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| TransportFailure {
            message: err.to_string(),
        })?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            bytes: bytes.to_vec(),
        })
    }
}
