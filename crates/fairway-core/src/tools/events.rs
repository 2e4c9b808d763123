use tracing::info;

use super::validation::{self, ValidationError};
use super::{Body, CreateEventArgs, EventArgs, LeagueTools, ListEventsArgs, ToolResult, UpdateEventArgs};
use crate::connection::Transport;
use crate::request::RequestSpec;

/// Event type used when the caller does not name one
const DEFAULT_EVENT_TYPE: &str = "event";

impl<T: Transport> LeagueTools<T> {
    /// List events, optionally filtered, one page at a time
    pub async fn list_events(&self, args: ListEventsArgs) -> ToolResult {
        validation::optional_positive_id("season_id", args.season_id.as_ref())?;
        validation::optional_positive_id("category_id", args.category_id.as_ref())?;
        validation::optional_positive_id("directory_id", args.directory_id.as_ref())?;
        let pagination = validation::page(args.limit, args.offset);

        let spec = RequestSpec::get("/events")
            .query_opt("season_id", args.season_id)
            .query_opt("category_id", args.category_id)
            .query_opt("directory_id", args.directory_id)
            .query_opt("archived", args.archived.then_some(true))
            .paginate(pagination)
            .build();
        Ok(self.list(spec, "events").await)
    }

    pub async fn get_event_details(&self, args: EventArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;

        let spec = RequestSpec::get("/events/{event_id}")
            .path_param("event_id", args.event_id)
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn create_event(&self, args: CreateEventArgs) -> ToolResult {
        validation::name("name", &args.name)?;
        validation::optional_date("start_date", args.start_date.as_deref())?;
        validation::optional_date("end_date", args.end_date.as_deref())?;
        validation::optional_positive_id("season_id", args.season_id.as_ref())?;
        validation::optional_positive_id("category_id", args.category_id.as_ref())?;

        info!(name = %args.name, "Creating event");
        let event_type = args
            .event_type
            .filter(|kind| !kind.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string());
        let body = Body::default()
            .text("name", args.name)
            .text("event_type", event_type)
            .text_opt("external_id", args.external_id)
            .text_opt("start_date", args.start_date)
            .text_opt("end_date", args.end_date)
            .id_opt("season_id", args.season_id)
            .id_opt("category_id", args.category_id);

        let spec = RequestSpec::post("/events").body(body.into_value()).build();
        Ok(self.call(spec).await)
    }

    pub async fn update_event(&self, args: UpdateEventArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::optional_name("name", args.name.as_deref())?;
        validation::optional_date("start_date", args.start_date.as_deref())?;
        validation::optional_date("end_date", args.end_date.as_deref())?;

        let body = Body::default()
            .text_opt("name", args.name)
            .text_opt("event_type", args.event_type)
            .text_opt("external_id", args.external_id)
            .text_opt("start_date", args.start_date)
            .text_opt("end_date", args.end_date);
        if body.is_empty() {
            return Err(ValidationError::NoFields);
        }

        info!(event_id = %args.event_id, "Updating event");
        let spec = RequestSpec::put("/events/{event_id}")
            .path_param("event_id", args.event_id)
            .body(body.into_value())
            .build();
        Ok(self.call(spec).await)
    }

    /// Delete (archive) an event
    pub async fn delete_event(&self, args: EventArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;

        info!(event_id = %args.event_id, "Deleting event");
        let spec = RequestSpec::delete("/events/{event_id}")
            .path_param("event_id", args.event_id)
            .build();
        Ok(self.call(spec).await)
    }
}
