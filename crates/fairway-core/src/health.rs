//! Connectivity diagnostics

use serde::{Deserialize, Serialize};

use crate::connection::Transport;
use crate::executor::RequestExecutor;
use crate::request::RequestSpec;
use crate::result::ApiResult;
use crate::taxonomy::ErrorKind;
use crate::VERSION;

/// Overall health verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    AuthError,
    Error,
}

/// Result of [`health_check`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// Whether the upstream answered at all
    pub reachable: bool,
    /// `None` when reachability alone could not tell
    pub authenticated: Option<bool>,
    pub version: String,
    pub message: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

/// Perform one authenticated `GET /seasons` and report on it
pub async fn health_check<T: Transport>(executor: &RequestExecutor<T>) -> HealthReport {
    let result = executor.call(&RequestSpec::get("/seasons").build()).await;

    let (status, reachable, authenticated, message) = match &result {
        ApiResult::Success(_) => (
            HealthStatus::Ok,
            true,
            Some(true),
            "Upstream API is reachable and the API key is valid.".to_string(),
        ),
        ApiResult::Failure(error) => match error.kind {
            ErrorKind::AuthenticationError => (
                HealthStatus::AuthError,
                true,
                Some(false),
                error.message.clone(),
            ),
            ErrorKind::TimeoutError | ErrorKind::ConnectionError => {
                (HealthStatus::Error, false, None, error.message.clone())
            }
            _ => (HealthStatus::Error, error.http_status.is_some(), None, error.message.clone()),
        },
    };

    HealthReport {
        status,
        reachable,
        authenticated,
        version: VERSION.to_string(),
        message,
    }
}
