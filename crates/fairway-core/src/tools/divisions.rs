use tracing::info;

use super::validation::{self, ValidationError};
use super::{Body, CreateDivisionArgs, DivisionArgs, EventArgs, LeagueTools, ToolResult, UpdateDivisionArgs};
use crate::connection::Transport;
use crate::request::RequestSpec;

impl<T: Transport> LeagueTools<T> {
    pub async fn get_event_courses(&self, args: EventArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;

        let spec = RequestSpec::get("/events/{event_id}/courses")
            .path_param("event_id", args.event_id)
            .build();
        Ok(self.list(spec, "courses").await)
    }

    pub async fn get_event_divisions(&self, args: EventArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;

        let spec = RequestSpec::get("/events/{event_id}/divisions")
            .path_param("event_id", args.event_id)
            .build();
        Ok(self.list(spec, "divisions").await)
    }

    pub async fn create_division(&self, args: CreateDivisionArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::name("name", &args.name)?;

        info!(event_id = %args.event_id, name = %args.name, "Creating division");
        let spec = RequestSpec::post("/events/{event_id}/divisions")
            .path_param("event_id", args.event_id)
            .body(Body::default().text("name", args.name).into_value())
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn update_division(&self, args: UpdateDivisionArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("division_id", &args.division_id)?;
        validation::optional_name("name", args.name.as_deref())?;

        let body = Body::default().text_opt("name", args.name);
        if body.is_empty() {
            return Err(ValidationError::NoFields);
        }

        info!(event_id = %args.event_id, division_id = %args.division_id, "Updating division");
        let spec = RequestSpec::put("/events/{event_id}/divisions/{division_id}")
            .path_param("event_id", args.event_id)
            .path_param("division_id", args.division_id)
            .body(body.into_value())
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn delete_division(&self, args: DivisionArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("division_id", &args.division_id)?;

        info!(event_id = %args.event_id, division_id = %args.division_id, "Deleting division");
        let spec = RequestSpec::delete("/events/{event_id}/divisions/{division_id}")
            .path_param("event_id", args.event_id)
            .path_param("division_id", args.division_id)
            .build();
        Ok(self.call(spec).await)
    }
}
