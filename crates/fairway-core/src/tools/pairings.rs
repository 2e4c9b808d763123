use serde_json::Value;
use tracing::info;

use super::validation::{self, ValidationError};
use super::{Body, CreatePairingArgs, LeagueTools, PairingArgs, ToolResult, UpdatePairingArgs};
use crate::connection::Transport;
use crate::identifiers::Identifier;
use crate::request::RequestSpec;

/// Player entries are either bare ids, sent as strings, or player objects
/// passed through for the body encoder.
fn player_entries(players: Vec<Value>) -> Result<Value, ValidationError> {
    validation::non_empty("players", &players)?;
    players
        .into_iter()
        .enumerate()
        .map(|(index, player)| match player {
            Value::Object(_) => Ok(player),
            Value::String(_) | Value::Number(_) => {
                let id: Identifier = serde_json::from_value(player)
                    .map_err(|_| ValidationError::InvalidPlayer { index })?;
                validation::positive_id("players", &id)?;
                Ok(Value::String(id.into_string()))
            }
            _ => Err(ValidationError::InvalidPlayer { index }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn validate_slot(tee_time: Option<&str>, hole: Option<u32>) -> Result<(), ValidationError> {
    if let Some(tee_time) = tee_time {
        validation::time_of_day("tee_time", tee_time)?;
    }
    if hole == Some(0) {
        return Err(ValidationError::NotPositive { field: "hole" });
    }
    Ok(())
}

impl<T: Transport> LeagueTools<T> {
    /// Create a pairing group for a round
    pub async fn create_pairing(&self, args: CreatePairingArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("round_id", &args.round_id)?;
        let player_count = args.players.len();
        let players = player_entries(args.players)?;
        validate_slot(args.tee_time.as_deref(), args.hole)?;

        info!(
            event_id = %args.event_id,
            round_id = %args.round_id,
            players = player_count,
            "Creating pairing group"
        );
        let body = Body::default()
            .value_opt("players", Some(players))
            .text_opt("tee_time", args.tee_time)
            .value_opt("hole", args.hole.map(Value::from));

        let spec = RequestSpec::post("/events/{event_id}/rounds/{round_id}/pairing_groups")
            .path_param("event_id", args.event_id)
            .path_param("round_id", args.round_id)
            .body(body.into_value())
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn update_pairing(&self, args: UpdatePairingArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("round_id", &args.round_id)?;
        validation::positive_id("pairing_group_id", &args.pairing_group_id)?;
        let players = args.players.map(player_entries).transpose()?;
        validate_slot(args.tee_time.as_deref(), args.hole)?;

        let body = Body::default()
            .value_opt("players", players)
            .text_opt("tee_time", args.tee_time)
            .value_opt("hole", args.hole.map(Value::from));
        if body.is_empty() {
            return Err(ValidationError::NoFields);
        }

        info!(pairing_group_id = %args.pairing_group_id, "Updating pairing group");
        let spec = RequestSpec::put("/events/{event_id}/rounds/{round_id}/pairing_groups/{pairing_group_id}")
            .path_param("event_id", args.event_id)
            .path_param("round_id", args.round_id)
            .path_param("pairing_group_id", args.pairing_group_id)
            .body(body.into_value())
            .build();
        Ok(self.call(spec).await)
    }

    pub async fn delete_pairing(&self, args: PairingArgs) -> ToolResult {
        validation::positive_id("event_id", &args.event_id)?;
        validation::positive_id("round_id", &args.round_id)?;
        validation::positive_id("pairing_group_id", &args.pairing_group_id)?;

        info!(pairing_group_id = %args.pairing_group_id, "Deleting pairing group");
        let spec = RequestSpec::delete("/events/{event_id}/rounds/{round_id}/pairing_groups/{pairing_group_id}")
            .path_param("event_id", args.event_id)
            .path_param("round_id", args.round_id)
            .path_param("pairing_group_id", args.pairing_group_id)
            .build();
        Ok(self.call(spec).await)
    }
}
