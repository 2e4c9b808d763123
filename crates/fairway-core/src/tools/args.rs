//! Tool argument types
//!
//! Identifiers accept either JSON strings or JSON integers. Unknown fields
//! are rejected so that a misspelled filter is not silently ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::identifiers::Identifier;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListMasterRosterArgs {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerArgs {
    pub player_id: Identifier,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberLookupArgs {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListEventsArgs {
    pub season_id: Option<Identifier>,
    pub category_id: Option<Identifier>,
    pub directory_id: Option<Identifier>,
    #[serde(default)]
    pub archived: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventArgs {
    pub event_id: Identifier,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEventArgs {
    pub name: String,
    pub event_type: Option<String>,
    pub external_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub season_id: Option<Identifier>,
    pub category_id: Option<Identifier>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEventArgs {
    pub event_id: Identifier,
    pub name: Option<String>,
    pub event_type: Option<String>,
    pub external_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterMemberArgs {
    pub event_id: Identifier,
    pub external_id: String,
    pub last_name: String,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub rounds: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMemberArgs {
    pub event_id: Identifier,
    pub member_id: Identifier,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberArgs {
    pub event_id: Identifier,
    pub member_id: Identifier,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRoundArgs {
    pub event_id: Identifier,
    pub name: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRoundArgs {
    pub event_id: Identifier,
    pub round_id: Identifier,
    pub name: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventRoundArgs {
    pub event_id: Identifier,
    pub round_id: Identifier,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeeSheetArgs {
    pub event_id: Option<Identifier>,
    pub round_id: Identifier,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TournamentResultsArgs {
    pub round_id: Identifier,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateDivisionArgs {
    pub event_id: Identifier,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDivisionArgs {
    pub event_id: Identifier,
    pub division_id: Identifier,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DivisionArgs {
    pub event_id: Identifier,
    pub division_id: Identifier,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePairingArgs {
    pub event_id: Identifier,
    pub round_id: Identifier,
    /// Player ids or player objects
    pub players: Vec<Value>,
    pub tee_time: Option<String>,
    pub hole: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePairingArgs {
    pub event_id: Identifier,
    pub round_id: Identifier,
    pub pairing_group_id: Identifier,
    pub players: Option<Vec<Value>>,
    pub tee_time: Option<String>,
    pub hole: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairingArgs {
    pub event_id: Identifier,
    pub round_id: Identifier,
    pub pairing_group_id: Identifier,
}
