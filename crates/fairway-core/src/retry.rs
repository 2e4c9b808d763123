//! Retry logic with exponential backoff
//!
//! [`RetryPolicy`] is immutable configuration shared by every call.
//! [`RetryState`] is created per call and dropped when the call returns.

use std::time::Duration;

use backoff::{backoff::Backoff, ExponentialBackoff};
use serde::{Deserialize, Serialize};

use crate::taxonomy::AttemptFailure;

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry (in milliseconds)
    pub base_delay_ms: u64,
    /// Ceiling for any single delay (in milliseconds)
    pub max_delay_ms: u64,
    /// Whether to add jitter to prevent thundering herd
    pub jitter: bool,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 8_000,
            jitter: true,
            multiplier: 2.0,
        }
    }
}

/// Spread applied around each computed delay when jitter is on. Kept below
/// `1 - 1/multiplier` so consecutive delays still strictly increase.
const JITTER_FACTOR: f64 = 0.25;

impl RetryPolicy {
    /// Create a new retry policy with custom settings
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Set the base delay
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Enable or disable jitter
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if self.multiplier < 1.0 {
            return Err("multiplier must be >= 1.0".to_string());
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err("base delay must not exceed max delay".to_string());
        }
        Ok(())
    }

    /// Create an exponential backoff instance
    fn create_backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            current_interval: self.base_delay(),
            initial_interval: self.base_delay(),
            max_interval: self.max_delay(),
            multiplier: self.multiplier,
            randomization_factor: if self.jitter { JITTER_FACTOR } else { 0.0 },
            max_elapsed_time: None, // We handle max attempts separately
            ..Default::default()
        };
        backoff.reset();
        backoff
    }

    /// Begin the retry bookkeeping for one call
    pub fn start(&self) -> RetryState {
        RetryState {
            attempt: 0,
            elapsed_backoff: Duration::ZERO,
            max_attempts: self.max_attempts,
            backoff: self.create_backoff(),
        }
    }

    /// Decide what to do after a failed attempt
    pub fn decide(&self, state: &mut RetryState, failure: &AttemptFailure) -> RetryDecision {
        if !failure.descriptor.retryable {
            return RetryDecision::NoRetry;
        }

        if state.attempt >= state.max_attempts {
            return RetryDecision::NoRetry;
        }

        let computed = state.backoff.next_backoff().unwrap_or_else(|| self.max_delay());
        let delay = failure.retry_after.unwrap_or(computed).min(self.max_delay());
        state.elapsed_backoff += delay;

        RetryDecision::Retry { delay }
    }
}

/// Decision on whether to retry a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the request after the specified delay
    Retry { delay: Duration },
    /// Do not retry the request
    NoRetry,
}

/// Per-call retry bookkeeping
#[derive(Debug)]
pub struct RetryState {
    attempt: u32,
    elapsed_backoff: Duration,
    max_attempts: u32,
    backoff: ExponentialBackoff,
}

impl RetryState {
    /// Record the start of a new attempt and return its 1-based number
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    /// Get the number of attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    /// Total time spent waiting between attempts
    pub fn elapsed_backoff(&self) -> Duration {
        self.elapsed_backoff
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
