use tracing::info;

use super::validation::{self, ValidationError};
use super::{
    Body, EventArgs, LeagueTools, ListMasterRosterArgs, MemberArgs, MemberLookupArgs, PlayerArgs,
    RegisterMemberArgs, ToolResult, UpdateMemberArgs,
};
use crate::connection::Transport;
use crate::request::RequestSpec;

impl<T: Transport> LeagueTools<T> {
    /// Search the master roster, one page at a time
    pub async fn list_master_roster(&self, args: ListMasterRosterArgs) -> ToolResult {
        let pagination = validation::page(args.limit, args.offset);
        let search = args.search.filter(|term| !term.trim().is_empty());

        let spec = RequestSpec::get("/master_roster")
            .query_opt("search", search)
            .paginate(pagination)
            .build();
        Ok(self.list(spec, "players").await)
    }

    pub async fn get_player_details(&self, args: PlayerArgs) -> ToolResult {
        validation::positive_id("player_id", &args.player_id)?;

        let spec = RequestSpec::get("/master_roster/{player_id}")
            .path_param("player_id", args.player_id)
            .build();
        Ok(self.call(spec).await)
    }

    /// Look up a master roster member by email address
    pub async fn get_master_roster_member(&self, args: MemberLookupArgs) -> ToolResult {
        validation::email(&args.email)?;

        let spec = RequestSpec::get("/master_roster_member")
            .query("email", args.email)
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn get_player_events(&self, args: PlayerArgs) -> ToolResult {
        validation::positive_id("player_id", &args.player_id)?;

        let spec = RequestSpec::get("/players/{player_id}/events")
            .path_param("player_id", args.player_id)
            .build();
        Ok(self.list(spec, "events").await)
    }

    pub async fn get_event_roster(&self, args: EventArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;

        let spec = RequestSpec::get("/events/{event_id}/roster")
            .path_param("event_id", args.event_id)
            .build();
        Ok(self.list(spec, "roster").await)
    }

    pub async fn register_member_to_event(&self, args: RegisterMemberArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::non_blank("external_id", &args.external_id)?;
        validation::name("last_name", &args.last_name)?;
        validation::optional_name("first_name", args.first_name.as_deref())?;
        validation::optional_email(args.email.as_deref())?;

        info!(event_id = %args.event_id, "Registering member to event");
        let body = Body::default()
            .text("external_id", args.external_id)
            .text("last_name", args.last_name)
            .text_opt("first_name", args.first_name)
            .text_opt("email", args.email)
            .value_opt("rounds", args.rounds.map(serde_json::Value::Array));

        let spec = RequestSpec::post("/events/{event_id}/roster")
            .path_param("event_id", args.event_id)
            .body(body.into_value())
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn update_member_in_event(&self, args: UpdateMemberArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("member_id", &args.member_id)?;
        validation::optional_name("first_name", args.first_name.as_deref())?;
        validation::optional_name("last_name", args.last_name.as_deref())?;
        validation::optional_email(args.email.as_deref())?;

        let body = Body::default()
            .text_opt("first_name", args.first_name)
            .text_opt("last_name", args.last_name)
            .text_opt("email", args.email)
            .text_opt("external_id", args.external_id);
        if body.is_empty() {
            return Err(ValidationError::NoFields);
        }

        info!(event_id = %args.event_id, member_id = %args.member_id, "Updating event member");
        let spec = RequestSpec::put("/events/{event_id}/roster/{member_id}")
            .path_param("event_id", args.event_id)
            .path_param("member_id", args.member_id)
            .body(body.into_value())
            .build();
        Ok(self.call(spec).await)
    }

    /// Remove a member from an event roster
    pub async fn delete_member_from_event(&self, args: MemberArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("member_id", &args.member_id)?;

        info!(event_id = %args.event_id, member_id = %args.member_id, "Removing member from event");
        let spec = RequestSpec::delete("/events/{event_id}/roster/{member_id}")
            .path_param("event_id", args.event_id)
            .path_param("member_id", args.member_id)
            .build();
        Ok(self.call(spec).await)
    }
}
