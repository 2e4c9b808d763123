use super::{LeagueTools, ToolResult};
use crate::connection::Transport;
use crate::health::{health_check, HealthReport};
use crate::request::RequestSpec;

impl<T: Transport> LeagueTools<T> {
    /// Check reachability and authentication of the upstream
    pub async fn health_check(&self) -> HealthReport {
        health_check(&self.executor).await
    }

    pub async fn list_seasons(&self) -> ToolResult {
        Ok(self.list(RequestSpec::get("/seasons").build(), "seasons").await)
    }

    /// Categories with their event counts
    pub async fn list_categories(&self) -> ToolResult {
        Ok(self.list(RequestSpec::get("/categories").build(), "categories").await)
    }

    pub async fn list_directories(&self) -> ToolResult {
        Ok(self.list(RequestSpec::get("/directories").build(), "directories").await)
    }
}
