//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod call;
mod completions;
mod config;
mod health;
mod tools;

pub use call::handle_call;
pub use completions::handle_completions;
pub use config::handle_config;
pub use health::handle_health;
pub use tools::handle_tools;

use crate::config::Config;
use crate::error::Result;
use fairway_core::{LeagueTools, RequestExecutor};
use std::sync::Arc;
use tracing::debug;

/// Build the tool surface, failing before any connection when the key is missing
fn league_tools(config: &Config) -> Result<LeagueTools> {
    let client = config.client_config()?;
    debug!(base_url = %client.base_url, "Creating request executor");
    let executor = RequestExecutor::from_config(&client)?;
    Ok(LeagueTools::new(Arc::new(executor)))
}
