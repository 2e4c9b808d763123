//! Error classification and normalization
//!
//! Every failed attempt, whether the transport gave up or the upstream
//! answered with a non-2xx status, maps to exactly one [`ErrorKind`].
//! Anything not explicitly recognized is a non-retryable
//! [`ErrorKind::GenericApiError`].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest slice of a raw response body quoted in an error message.
const MAX_BODY_EXCERPT: usize = 500;

/// Closed set of failure kinds surfaced to tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// 401/403 - invalid or expired API key
    AuthenticationError,
    /// 404 - resource does not exist
    NotFoundError,
    /// 429 - upstream rate limit
    RateLimitError,
    /// Connect or read timeout
    TimeoutError,
    /// DNS failure or connection refused
    ConnectionError,
    /// 5xx from the upstream
    UpstreamError,
    /// Everything else
    GenericApiError,
}

impl ErrorKind {
    /// Whether an attempt failing with this kind may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimitError
                | ErrorKind::UpstreamError
                | ErrorKind::TimeoutError
                | ErrorKind::ConnectionError
        )
    }

    /// Classify an HTTP status code. Success codes are not failures and
    /// should not reach this function; they classify as generic.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => ErrorKind::AuthenticationError,
            404 => ErrorKind::NotFoundError,
            429 => ErrorKind::RateLimitError,
            500..=599 => ErrorKind::UpstreamError,
            _ => ErrorKind::GenericApiError,
        }
    }

    /// Classify a failure that produced no HTTP response.
    pub fn from_transport(failure: &TransportFailure) -> Self {
        match failure {
            TransportFailure::Timeout(_) => ErrorKind::TimeoutError,
            TransportFailure::Connect(_) => ErrorKind::ConnectionError,
            TransportFailure::Other(_) => ErrorKind::GenericApiError,
        }
    }

    fn default_message(&self, path: &str) -> String {
        match self {
            ErrorKind::AuthenticationError => "Invalid or expired API key.".to_string(),
            ErrorKind::NotFoundError => format!("{} not found.", path),
            ErrorKind::RateLimitError => "Rate limited.".to_string(),
            ErrorKind::TimeoutError => "Request timed out. Please try again.".to_string(),
            ErrorKind::ConnectionError => {
                "Unable to connect to the upstream API. Check your network connection.".to_string()
            }
            ErrorKind::UpstreamError => "Upstream API error.".to_string(),
            ErrorKind::GenericApiError => "Request failed.".to_string(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::AuthenticationError => "AuthenticationError",
            ErrorKind::NotFoundError => "NotFoundError",
            ErrorKind::RateLimitError => "RateLimitError",
            ErrorKind::TimeoutError => "TimeoutError",
            ErrorKind::ConnectionError => "ConnectionError",
            ErrorKind::UpstreamError => "UpstreamError",
            ErrorKind::GenericApiError => "GenericApiError",
        };
        f.write_str(name)
    }
}

/// A failure below the HTTP layer, already stripped of the request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout(String),
    Connect(String),
    Other(String),
}

impl TransportFailure {
    pub fn message(&self) -> &str {
        match self {
            TransportFailure::Timeout(m) | TransportFailure::Connect(m) | TransportFailure::Other(m) => m,
        }
    }
}

/// Normalized description of a failed call, as surfaced to tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    pub message: String,
    pub retryable: bool,
}

impl ErrorDescriptor {
    /// Create a descriptor whose retryability follows its kind
    pub fn new(kind: ErrorKind, http_status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            http_status,
            message: message.into(),
            retryable: kind.is_retryable(),
        }
    }

    /// A non-retryable generic failure
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::GenericApiError, None, message)
    }

    /// Replace every occurrence of `secret` in the message.
    pub fn redacted(mut self, secret: &str) -> Self {
        if !secret.is_empty() && self.message.contains(secret) {
            self.message = self.message.replace(secret, "***");
        }
        self
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "{} [{}]: {}", self.kind, status, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// One classified failed attempt
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub descriptor: ErrorDescriptor,
    /// Upstream's `Retry-After` hint, if any
    pub retry_after: Option<Duration>,
}

impl AttemptFailure {
    /// Classify a non-2xx HTTP response.
    pub fn from_response(status: u16, retry_after: Option<&str>, body: &str, path: &str) -> Self {
        let kind = ErrorKind::from_status(status);
        let message = extract_message(body).unwrap_or_else(|| kind.default_message(path));
        let retry_after = retry_after
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            descriptor: ErrorDescriptor::new(kind, Some(status), message),
            retry_after,
        }
    }

    /// Classify a transport failure.
    pub fn from_transport(failure: &TransportFailure, path: &str) -> Self {
        let kind = ErrorKind::from_transport(failure);
        let message = match kind {
            ErrorKind::GenericApiError => format!("Request failed: {}", failure.message()),
            _ => kind.default_message(path),
        };

        Self {
            descriptor: ErrorDescriptor::new(kind, None, message),
            retry_after: None,
        }
    }
}

/// Pull a human-readable message out of an error body.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        match json.get("error") {
            Some(Value::String(message)) => return Some(message.clone()),
            Some(error) => {
                if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
                    return Some(message.to_string());
                }
            }
            None => {}
        }
        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return Some(message.to_string());
        }
        if let Some(errors) = json.get("errors").and_then(|e| e.as_array()) {
            let joined: Vec<&str> = errors.iter().filter_map(|e| e.as_str()).collect();
            if !joined.is_empty() {
                return Some(joined.join("; "));
            }
        }
        return None;
    }

    // HTML error pages carry nothing useful
    if trimmed.starts_with('<') {
        return None;
    }

    Some(trimmed.chars().take(MAX_BODY_EXCERPT).collect())
}
