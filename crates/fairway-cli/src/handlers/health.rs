//! Health command handler

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;

/// Handle the health command. Anything but an ok report exits non-zero.
pub async fn handle_health(config: &Config, output: &mut OutputWriter) -> Result<()> {
    let tools = super::league_tools(config)?;
    let report = tools.health_check().await;
    output.health_report(&report)?;

    if report.is_healthy() {
        Ok(())
    } else {
        Err(Error::Unhealthy {
            message: report.message,
        })
    }
}
