//! Shared test support utilities for integration tests
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fairway_core::{
    ClientConfig, RequestExecutor, RetryPolicy, TimeoutConfig, Transport, TransportFailure, Verb,
    WireRequest, WireResponse,
};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::Registry;

pub const API_KEY: &str = "gg-test-key-5f3a9c";
pub const BASE_URL: &str = "https://api.example.test/api_v2";
pub const WIDE_ID: &str = "12300956988786918579";

/// Client configuration with millisecond-scale retry delays
pub fn test_config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::new(API_KEY);
    config.base_url = base_url.to_string();
    config.retry = RetryPolicy::default()
        .with_base_delay(Duration::from_millis(5))
        .with_max_delay(Duration::from_millis(40));
    config
}

/// One scripted transport outcome
#[derive(Debug, Clone)]
pub enum Step {
    Respond {
        status: u16,
        body: String,
        retry_after: Option<String>,
    },
    Fail(TransportFailure),
    /// Never completes
    Hang,
}

impl Step {
    pub fn json(status: u16, body: &str) -> Self {
        Step::Respond {
            status,
            body: body.to_string(),
            retry_after: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self::json(status, "")
    }

    pub fn rate_limited(retry_after: Option<&str>) -> Self {
        Step::Respond {
            status: 429,
            body: String::new(),
            retry_after: retry_after.map(str::to_string),
        }
    }
}

/// What the transport was asked to send
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub verb: Verb,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A transport that replays a script and records every request
#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportFailure> {
        self.requests.lock().unwrap().push(RecordedRequest {
            verb: request.verb,
            url: request.url.to_string(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            Some(Step::Respond {
                status,
                body,
                retry_after,
            }) => Ok(WireResponse {
                status,
                retry_after,
                content_type: Some("application/json".to_string()),
                body,
            }),
            Some(Step::Fail(failure)) => Err(failure),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(TransportFailure::Other("script exhausted".to_string())),
        }
    }
}

/// An executor over a scripted transport
pub fn scripted_executor(steps: Vec<Step>) -> (Arc<ScriptedTransport>, Arc<RequestExecutor<ScriptedTransport>>) {
    let transport = ScriptedTransport::new(steps);
    let executor = RequestExecutor::new(transport.clone(), &test_config(BASE_URL)).unwrap();
    (transport, Arc::new(executor))
}

/// A canned HTTP response served by [`StubServer`]
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A request as seen on the wire by [`StubServer`]
#[derive(Debug, Clone)]
pub struct ServedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ServedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Minimal loopback HTTP/1.1 server answering from a script.
///
/// Every connection is closed after one exchange. When the script runs out
/// the server answers 500. With `silent` set it accepts and never answers.
pub struct StubServer {
    pub addr: SocketAddr,
    served: Arc<Mutex<Vec<ServedRequest>>>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        Self::spawn(responses, false).await
    }

    pub async fn silent() -> Self {
        Self::spawn(Vec::new(), true).await
    }

    async fn spawn(responses: Vec<StubResponse>, silent: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let served = Arc::new(Mutex::new(Vec::new()));
        let script = Arc::new(Mutex::new(VecDeque::from(responses)));

        let served_log = served.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(_) => return,
                };
                let served_log = served_log.clone();
                let script = script.clone();
                tokio::spawn(async move {
                    if silent {
                        let _held = stream;
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        return;
                    }
                    handle_connection(stream, served_log, script).await;
                });
            }
        });

        Self { addr, served }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api_v2", self.addr)
    }

    pub fn served(&self) -> Vec<ServedRequest> {
        self.served.lock().unwrap().clone()
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    served: Arc<Mutex<Vec<ServedRequest>>>,
    script: Arc<Mutex<VecDeque<StubResponse>>>,
) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_header_end(&buffer) {
            break pos;
        }
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let body_start = header_end + 4;
    while buffer.len() < body_start + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
        }
    }
    let body_end = (body_start + content_length).min(buffer.len());
    let body = String::from_utf8_lossy(&buffer[body_start..body_end]).to_string();

    served.lock().unwrap().push(ServedRequest {
        method,
        target,
        headers,
        body,
    });

    let response = script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| StubResponse::json(500, r#"{"error": "stub script exhausted"}"#));

    let mut raw = format!("HTTP/1.1 {} {}\r\n", response.status, reason(response.status));
    for (name, value) in &response.headers {
        raw.push_str(&format!("{}: {}\r\n", name, value));
    }
    raw.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n", response.body.len()));
    raw.push_str(&response.body);

    let _ = stream.write_all(raw.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        401 => "Unauthorized",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

/// Timeouts short enough for a silent server to trip them quickly
pub fn short_timeouts() -> TimeoutConfig {
    TimeoutConfig::new(Duration::from_millis(200), Duration::from_millis(300))
}

/// Fields of one captured log event, rendered as text
pub type EventFields = BTreeMap<String, String>;

/// A tracing layer that keeps every event carrying an `attempt` field
#[derive(Clone, Default)]
pub struct AttemptEvents {
    events: Arc<Mutex<Vec<EventFields>>>,
}

impl AttemptEvents {
    /// A subscriber that feeds this capture
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        Registry::default().with(self.clone())
    }

    pub fn events(&self) -> Vec<EventFields> {
        self.events.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct FieldRecorder(EventFields);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

impl<S: Subscriber> Layer<S> for AttemptEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        if recorder.0.contains_key("attempt") {
            self.events.lock().unwrap().push(recorder.0);
        }
    }
}
