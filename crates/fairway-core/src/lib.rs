//! Fairway Core - request execution layer for the Golf Genius league API
//!
//! This crate turns tool invocations into authenticated, retried,
//! precision-safe HTTP calls and maps every outcome into a stable
//! [`ApiResult`].
//!
//! # Main Components
//!
//! - **Identifier codec**: identifiers are strings in both directions
//! - **Error taxonomy**: a closed set of failure kinds
//! - **Retry policy**: exponential backoff for transient failures
//! - **Connection manager**: the shared pooled HTTP client
//! - **Request executor**: one logical call, retries included
//! - **Response shaper**: sanitization and pagination
//! - **Tools**: validated league operations built on the executor
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fairway_core::{ClientConfig, LeagueTools, RequestExecutor, EventArgs};
//!
//! async fn example() -> fairway_core::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let executor = Arc::new(RequestExecutor::from_config(&config)?);
//!     let tools = LeagueTools::new(executor);
//!
//!     let rounds = tools
//!         .list_event_rounds(EventArgs { event_id: "12300956988786918579".parse()? })
//!         .await;
//!     println!("{:?}", rounds);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod builder;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod health;
pub mod identifiers;
pub mod request;
pub mod result;
pub mod retry;
pub mod shaper;
pub mod taxonomy;
pub mod tools;

// Re-export main types for convenience
pub use auth::{ApiKey, AuthPlacement};
pub use config::{ClientConfig, API_KEY_ENV, DEFAULT_BASE_URL};
pub use connection::{ConnectionManager, TimeoutConfig, Transport, WireRequest, WireResponse};
pub use error::{Error, Result};
pub use executor::{AttemptOutcome, AttemptRecord, CallTrace, RequestExecutor};
pub use health::{health_check, HealthReport, HealthStatus};
pub use identifiers::{encode_body, sanitize, to_wire, Identifier, IdentifierPatterns, WireValue};
pub use request::{ParamValue, RequestSpec, RequestSpecBuilder, ResponseFormat, Verb};
pub use result::{ApiResult, ResponseBody};
pub use retry::{RetryDecision, RetryPolicy, RetryState};
pub use shaper::{extract_collection, Pagination, ResponseShaper};
pub use taxonomy::{AttemptFailure, ErrorDescriptor, ErrorKind, TransportFailure};
pub use tools::{LeagueTools, ToolResult, ValidationError, TOOL_NAMES};

// Tool argument types
pub use tools::args::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
