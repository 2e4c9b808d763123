//! Request execution
//!
//! [`RequestExecutor`] performs one logical API call: build the wire request,
//! send it, classify failures, retry what may be retried, and shape the
//! successful body. Every tool calls through it.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::auth::ApiKey;
use crate::builder::WireRequestBuilder;
use crate::config::ClientConfig;
use crate::connection::{ConnectionManager, Transport, WireRequest};
use crate::error::{Error, Result};
use crate::request::{RequestSpec, ResponseFormat};
use crate::result::{ApiResult, ResponseBody};
use crate::retry::{RetryDecision, RetryPolicy};
use crate::shaper::ResponseShaper;
use crate::taxonomy::{AttemptFailure, ErrorKind};

/// What happened on one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success { http_status: u16 },
    Failure { kind: ErrorKind, http_status: Option<u16> },
}

/// One attempt of a call, mirroring the log record emitted for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
    /// Wait before the next attempt, if one follows
    pub delay: Option<Duration>,
}

/// Per-call record of every attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallTrace {
    pub attempts: Vec<AttemptRecord>,
}

impl CallTrace {
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Delays waited between attempts, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.attempts.iter().filter_map(|record| record.delay).collect()
    }

    pub fn total_backoff(&self) -> Duration {
        self.delays().into_iter().sum()
    }

    fn record(&mut self, attempt: u32, outcome: AttemptOutcome, delay: Option<Duration>) {
        self.attempts.push(AttemptRecord {
            attempt,
            outcome,
            delay,
        });
    }
}

/// Executes request specs against the upstream
pub struct RequestExecutor<T: Transport = ConnectionManager> {
    transport: Arc<T>,
    builder: WireRequestBuilder,
    policy: RetryPolicy,
    shaper: ResponseShaper,
}

impl RequestExecutor<ConnectionManager> {
    /// Create the connection pool and an executor sharing it
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(ConnectionManager::new(
            config.timeouts.clone(),
            config.pool_max_idle_per_host,
        )?);
        Self::new(transport, config)
    }
}

impl<T: Transport> RequestExecutor<T> {
    /// Create an executor over an existing transport
    pub fn new(transport: Arc<T>, config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url).map_err(|e| Error::Configuration {
            message: format!("Invalid base URL '{}': {}", config.base_url, e),
            source: Some(e.into()),
        })?;
        let api_key = ApiKey::new(config.api_key.clone())?;

        Ok(Self {
            transport,
            builder: WireRequestBuilder::new(base_url, api_key, config.identifier_patterns.clone()),
            policy: config.retry.clone(),
            shaper: ResponseShaper::new(config.identifier_patterns.clone()),
        })
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Perform one logical call
    pub async fn call(&self, spec: &RequestSpec) -> ApiResult {
        self.call_traced(spec).await.0
    }

    /// Perform one logical call and return the record of its attempts
    pub async fn call_traced(&self, spec: &RequestSpec) -> (ApiResult, CallTrace) {
        let mut trace = CallTrace::default();

        let wire = match self.builder.build(spec) {
            Ok(wire) => wire,
            Err(descriptor) => {
                let descriptor = descriptor.redacted(self.builder.api_key().expose());
                warn!(
                    verb = %spec.verb(),
                    path = spec.path(),
                    error = %descriptor,
                    "Request could not be built"
                );
                return (ApiResult::Failure(descriptor), trace);
            }
        };
        let format = spec.response_format();
        let mut state = self.policy.start();

        loop {
            let attempt = state.begin_attempt();

            let failure = match self.attempt(&wire, spec, format).await {
                Ok((http_status, body)) => {
                    info!(
                        verb = %spec.verb(),
                        path = spec.path(),
                        attempt,
                        outcome = "success",
                        http_status,
                        "Upstream call succeeded"
                    );
                    trace.record(attempt, AttemptOutcome::Success { http_status }, None);
                    return (ApiResult::Success(body), trace);
                }
                Err(failure) => failure,
            };

            let outcome = AttemptOutcome::Failure {
                kind: failure.descriptor.kind,
                http_status: failure.descriptor.http_status,
            };

            match self.policy.decide(&mut state, &failure) {
                RetryDecision::Retry { delay } => {
                    warn!(
                        verb = %spec.verb(),
                        path = spec.path(),
                        attempt,
                        outcome = %failure.descriptor.kind,
                        delay_ms = delay.as_millis() as u64,
                        "Upstream call failed, retrying"
                    );
                    trace.record(attempt, outcome, Some(delay));
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::NoRetry => {
                    warn!(
                        verb = %spec.verb(),
                        path = spec.path(),
                        attempt,
                        outcome = %failure.descriptor.kind,
                        error = %failure.descriptor.message,
                        "Upstream call failed"
                    );
                    trace.record(attempt, outcome, None);
                    return (ApiResult::Failure(failure.descriptor), trace);
                }
            }
        }
    }

    async fn attempt(
        &self,
        wire: &WireRequest,
        spec: &RequestSpec,
        format: ResponseFormat,
    ) -> std::result::Result<(u16, ResponseBody), AttemptFailure> {
        let secret = self.builder.api_key().expose();

        let response = match self.transport.send(wire.clone()).await {
            Ok(response) => response,
            Err(failure) => {
                let mut classified = AttemptFailure::from_transport(&failure, spec.path());
                classified.descriptor = classified.descriptor.redacted(secret);
                return Err(classified);
            }
        };

        if !response.is_success() {
            let mut classified = AttemptFailure::from_response(
                response.status,
                response.retry_after.as_deref(),
                &response.body,
                spec.path(),
            );
            classified.descriptor = classified.descriptor.redacted(secret);
            return Err(classified);
        }

        self.shaper
            .shape(&response.body, format)
            .map(|body| (response.status, body))
            .map_err(|descriptor| AttemptFailure {
                descriptor: descriptor.redacted(secret),
                retry_after: None,
            })
    }
}
