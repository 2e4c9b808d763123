//! Connection management
//!
//! [`ConnectionManager`] owns the process-wide pooled HTTP client. It is
//! constructed once at startup and shared through `Arc`; the pool replaces
//! broken connections on its own and is never rebuilt.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::request::Verb;
use crate::taxonomy::TransportFailure;

/// Timeout configuration for upstream requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection timeout - time to establish a connection
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
    /// Request timeout - total time for one round trip, body included
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// How long an idle pooled connection is kept
    #[serde(with = "duration_secs")]
    pub pool_idle_timeout: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl TimeoutConfig {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            request_timeout,
            ..Default::default()
        }
    }

    /// Validate timeout configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.connect_timeout.is_zero() {
            return Err("Connect timeout cannot be zero".to_string());
        }

        if self.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }

        if self.request_timeout < self.connect_timeout {
            return Err("Request timeout should be >= connect timeout".to_string());
        }

        Ok(())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom("duration must be a non-negative number of seconds"));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}

/// A fully rendered request, ready for the transport
#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct WireRequest {
    pub verb: Verb,
    /// For GET this embeds the API key; never log it.
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Status, selected headers and the fully read body of one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    pub retry_after: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One round trip to the upstream
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and read its whole body.
    async fn send(&self, request: WireRequest) -> std::result::Result<WireResponse, TransportFailure>;
}

/// The shared pooled HTTP client
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    client: Client,
    timeouts: TimeoutConfig,
}

impl ConnectionManager {
    /// Create the pool
    pub fn new(timeouts: TimeoutConfig, pool_max_idle_per_host: usize) -> Result<Self> {
        timeouts.validate().map_err(Error::configuration)?;

        let client = Client::builder()
            .connect_timeout(timeouts.connect_timeout)
            .timeout(timeouts.request_timeout)
            .pool_idle_timeout(timeouts.pool_idle_timeout)
            .pool_max_idle_per_host(pool_max_idle_per_host)
            .user_agent(concat!("fairway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::HttpClient {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e.into()),
            })?;

        Ok(Self { client, timeouts })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(TimeoutConfig::default(), 10)
    }

    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }
}

#[async_trait]
impl Transport for ConnectionManager {
    async fn send(&self, request: WireRequest) -> std::result::Result<WireResponse, TransportFailure> {
        let mut builder = self.client.request(request.verb.into(), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let retry_after = header_value(response.headers(), RETRY_AFTER);
        let content_type = header_value(response.headers(), CONTENT_TYPE);

        // Reading the body here hands the connection back to the pool
        let body = response.text().await.map_err(classify)?;

        Ok(WireResponse {
            status,
            retry_after,
            content_type,
            body,
        })
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Map a reqwest error to a transport failure, dropping the URL first.
fn classify(error: reqwest::Error) -> TransportFailure {
    let error = error.without_url();
    let message = error.to_string();
    if error.is_timeout() {
        TransportFailure::Timeout(message)
    } else if error.is_connect() {
        TransportFailure::Connect(message)
    } else {
        TransportFailure::Other(message)
    }
}
