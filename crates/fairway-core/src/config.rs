//! Client configuration

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::connection::TimeoutConfig;
use crate::error::{Error, Result};
use crate::identifiers::IdentifierPatterns;
use crate::retry::RetryPolicy;

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://www.golfgenius.com/api_v2";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOLF_GENIUS_API_KEY";

/// Everything needed to build a [`crate::RequestExecutor`]
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Upstream API key
    pub api_key: String,
    pub base_url: String,
    pub timeouts: TimeoutConfig,
    pub retry: RetryPolicy,
    /// Upper bound on idle pooled connections per host
    pub pool_max_idle_per_host: usize,
    pub identifier_patterns: IdentifierPatterns,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeouts: TimeoutConfig::default(),
            retry: RetryPolicy::default(),
            pool_max_idle_per_host: 10,
            identifier_patterns: IdentifierPatterns::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Read the API key from the environment
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            Error::configuration(format!("{} environment variable is required", API_KEY_ENV))
        })?;
        Ok(Self::new(api_key))
    }

    /// Check the configuration before any connection is made
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::configuration(format!(
                "API key is required (set {})",
                API_KEY_ENV
            )));
        }
        if self.base_url.trim().is_empty() {
            return Err(Error::configuration("base_url cannot be empty"));
        }
        if self.pool_max_idle_per_host == 0 {
            return Err(Error::configuration("pool_max_idle_per_host must be at least 1"));
        }
        self.timeouts.validate().map_err(Error::configuration)?;
        self.retry
            .validate()
            .map_err(|e| Error::configuration(format!("Invalid retry policy: {}", e)))?;
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .field("retry", &self.retry)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .field("identifier_patterns", &self.identifier_patterns)
            .finish()
    }
}
