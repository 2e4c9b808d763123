use tracing::info;

use super::validation::{self, ValidationError};
use super::{
    Body, CreateRoundArgs, EventArgs, EventRoundArgs, LeagueTools, TeeSheetArgs, ToolResult,
    TournamentResultsArgs, UpdateRoundArgs,
};
use crate::connection::Transport;
use crate::request::RequestSpec;

impl<T: Transport> LeagueTools<T> {
    pub async fn list_event_rounds(&self, args: EventArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;

        let spec = RequestSpec::get("/events/{event_id}/rounds")
            .path_param("event_id", args.event_id)
            .build();
        Ok(self.list(spec, "rounds").await)
    }

    pub async fn create_round(&self, args: CreateRoundArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::optional_name("name", args.name.as_deref())?;
        validation::optional_date("date", args.date.as_deref())?;

        info!(event_id = %args.event_id, "Creating round");
        let body = Body::default()
            .text_opt("name", args.name)
            .text_opt("date", args.date);

        let spec = RequestSpec::post("/events/{event_id}/rounds")
            .path_param("event_id", args.event_id)
            .body(body.into_value())
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn update_round(&self, args: UpdateRoundArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("round_id", &args.round_id)?;
        validation::optional_name("name", args.name.as_deref())?;
        validation::optional_date("date", args.date.as_deref())?;

        let body = Body::default()
            .text_opt("name", args.name)
            .text_opt("date", args.date);
        if body.is_empty() {
            return Err(ValidationError::NoFields);
        }

        info!(event_id = %args.event_id, round_id = %args.round_id, "Updating round");
        let spec = RequestSpec::put("/events/{event_id}/rounds/{round_id}")
            .path_param("event_id", args.event_id)
            .path_param("round_id", args.round_id)
            .body(body.into_value())
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn delete_round(&self, args: EventRoundArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("round_id", &args.round_id)?;

        info!(event_id = %args.event_id, round_id = %args.round_id, "Deleting round");
        let spec = RequestSpec::delete("/events/{event_id}/rounds/{round_id}")
            .path_param("event_id", args.event_id)
            .path_param("round_id", args.round_id)
            .build();
        Ok(self.call(spec).await)
    }

    /// Tee sheet and scores of one round. The event id is optional and
    /// only validated; upstream keys the tee sheet by round.
    pub async fn get_round_tee_sheet(&self, args: TeeSheetArgs) -> ToolResult {
        validation::optional_positive_id("event_id", args.event_id.as_ref())?;
        validation::positive_id("round_id", &args.round_id)?;

        let spec = RequestSpec::get("/rounds/{round_id}/tee_sheet_and_scores")
            .path_param("round_id", args.round_id)
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn get_round_tournaments(&self, args: EventRoundArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("round_id", &args.round_id)?;

        let spec = RequestSpec::get("/events/{event_id}/rounds/{round_id}/tournaments")
            .path_param("event_id", args.event_id)
            .path_param("round_id", args.round_id)
            .build();
        Ok(self.list(spec, "tournaments").await)
    }

    /// Tournament results of one round as JSON, or as an HTML/XML rendering
    pub async fn get_tournament_results(&self, args: TournamentResultsArgs) -> ToolResult {
        validation::positive_id("round_id", &args.round_id)?;
        let format = validation::result_format(args.format.as_deref())?;

        let spec = RequestSpec::get("/rounds/{round_id}/tournament_results")
            .path_param("round_id", args.round_id)
            .query("format", format)
            .build();
        Ok(self.call(spec).await)
    }
}
