//! League management tools
//!
//! Each tool validates its arguments, builds a fresh [`RequestSpec`] and
//! delegates to the shared [`RequestExecutor`]. Tools are plain async
//! methods on [`LeagueTools`]; [`LeagueTools::invoke`] dispatches by name
//! from JSON arguments for hosts that only know tool names.
//!
//! Tools are organized by area:
//! - `organization`: diagnostics, seasons, categories, directories
//! - `roster`: master roster and event roster
//! - `events`: event lifecycle
//! - `rounds`: rounds, tee sheets and results
//! - `divisions`: courses and divisions
//! - `pairings`: pairing groups

pub mod args;
pub mod validation;

mod divisions;
mod events;
mod organization;
mod pairings;
mod rounds;
mod roster;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::connection::{ConnectionManager, Transport};
use crate::executor::RequestExecutor;
use crate::identifiers::Identifier;
use crate::request::RequestSpec;
use crate::result::{ApiResult, ResponseBody};
use crate::shaper::extract_collection;
use crate::taxonomy::ErrorDescriptor;

pub use args::*;
pub use validation::ValidationError;

/// Outcome of a tool invocation. Validation failures never reach the network.
pub type ToolResult = std::result::Result<ApiResult, ValidationError>;

/// Every tool name accepted by [`LeagueTools::invoke`]
pub const TOOL_NAMES: &[&str] = &[
    "health_check",
    "list_seasons",
    "list_categories",
    "list_directories",
    "list_master_roster",
    "get_player_details",
    "get_master_roster_member",
    "get_player_events",
    "list_events",
    "get_event_details",
    "create_event",
    "update_event",
    "delete_event",
    "get_event_roster",
    "register_member_to_event",
    "update_member_in_event",
    "delete_member_from_event",
    "list_event_rounds",
    "create_round",
    "update_round",
    "delete_round",
    "get_round_tee_sheet",
    "get_round_tournaments",
    "get_tournament_results",
    "get_event_courses",
    "get_event_divisions",
    "create_division",
    "update_division",
    "delete_division",
    "create_pairing",
    "update_pairing",
    "delete_pairing",
];

/// The tool surface over one executor
pub struct LeagueTools<T: Transport = ConnectionManager> {
    executor: Arc<RequestExecutor<T>>,
}

impl<T: Transport> Clone for LeagueTools<T> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<T: Transport> LeagueTools<T> {
    pub fn new(executor: Arc<RequestExecutor<T>>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &RequestExecutor<T> {
        &self.executor
    }

    async fn call(&self, spec: RequestSpec) -> ApiResult {
        self.executor.call(&spec).await
    }

    /// Call a list endpoint and unwrap its collection
    async fn list(&self, spec: RequestSpec, key: &str) -> ApiResult {
        self.executor
            .call(&spec)
            .await
            .map_body(|body| extract_collection(body, key))
    }

    /// Dispatch a tool by name. `null` arguments are treated as `{}`.
    pub async fn invoke(&self, name: &str, args: Value) -> ToolResult {
        match name {
            "health_check" => {
                parse::<NoArgs>(name, args)?;
                let report = self.health_check().await;
                Ok(match serde_json::to_value(&report) {
                    Ok(value) => ApiResult::Success(ResponseBody::Json(value)),
                    Err(e) => ApiResult::Failure(ErrorDescriptor::generic(e.to_string())),
                })
            }
            "list_seasons" => {
                parse::<NoArgs>(name, args)?;
                self.list_seasons().await
            }
            "list_categories" => {
                parse::<NoArgs>(name, args)?;
                self.list_categories().await
            }
            "list_directories" => {
                parse::<NoArgs>(name, args)?;
                self.list_directories().await
            }
            "list_master_roster" => self.list_master_roster(parse(name, args)?).await,
            "get_player_details" => self.get_player_details(parse(name, args)?).await,
            "get_master_roster_member" => self.get_master_roster_member(parse(name, args)?).await,
            "get_player_events" => self.get_player_events(parse(name, args)?).await,
            "list_events" => self.list_events(parse(name, args)?).await,
            "get_event_details" => self.get_event_details(parse(name, args)?).await,
            "create_event" => self.create_event(parse(name, args)?).await,
            "update_event" => self.update_event(parse(name, args)?).await,
            "delete_event" => self.delete_event(parse(name, args)?).await,
            "get_event_roster" => self.get_event_roster(parse(name, args)?).await,
            "register_member_to_event" => self.register_member_to_event(parse(name, args)?).await,
            "update_member_in_event" => self.update_member_in_event(parse(name, args)?).await,
            "delete_member_from_event" => self.delete_member_from_event(parse(name, args)?).await,
            "list_event_rounds" => self.list_event_rounds(parse(name, args)?).await,
            "create_round" => self.create_round(parse(name, args)?).await,
            "update_round" => self.update_round(parse(name, args)?).await,
            "delete_round" => self.delete_round(parse(name, args)?).await,
            "get_round_tee_sheet" => self.get_round_tee_sheet(parse(name, args)?).await,
            "get_round_tournaments" => self.get_round_tournaments(parse(name, args)?).await,
            "get_tournament_results" => self.get_tournament_results(parse(name, args)?).await,
            "get_event_courses" => self.get_event_courses(parse(name, args)?).await,
            "get_event_divisions" => self.get_event_divisions(parse(name, args)?).await,
            "create_division" => self.create_division(parse(name, args)?).await,
            "update_division" => self.update_division(parse(name, args)?).await,
            "delete_division" => self.delete_division(parse(name, args)?).await,
            "create_pairing" => self.create_pairing(parse(name, args)?).await,
            "update_pairing" => self.update_pairing(parse(name, args)?).await,
            "delete_pairing" => self.delete_pairing(parse(name, args)?).await,
            _ => Err(ValidationError::UnknownTool {
                name: name.to_string(),
            }),
        }
    }
}

fn parse<A: DeserializeOwned>(tool: &str, args: Value) -> std::result::Result<A, ValidationError> {
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| ValidationError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// JSON object under construction for a request body
#[derive(Debug, Default)]
struct Body(Map<String, Value>);

impl Body {
    fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), Value::String(value.into()));
        self
    }

    fn text_opt(self, key: &str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.text(key, value),
            None => self,
        }
    }

    fn id_opt(mut self, key: &str, value: Option<Identifier>) -> Self {
        if let Some(id) = value {
            self.0.insert(key.to_string(), Value::String(id.into_string()));
        }
        self
    }

    fn value_opt(mut self, key: &str, value: Option<Value>) -> Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value);
        }
        self
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
