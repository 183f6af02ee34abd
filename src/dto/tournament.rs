use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    bracket::{BracketPhase, BracketSize},
    dao::models::TournamentEntity,
    dto::{
        bracket::{PickView, RoundView, picks_of},
        format_system_time,
        validation::validate_bracket_size,
    },
    state::{HostPhase, HostSession},
};

/// Payload opening a new host session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTournamentRequest {
    /// Number of entrants: 8, 16 or 32.
    #[schema(example = 16)]
    pub size: u32,
}

impl Validate for CreateTournamentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_bracket_size(self.size) {
            errors.add("size", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Replacement entrant list, in seeding order.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct EntrantsRequest {
    #[validate(length(max = 32))]
    pub names: Vec<String>,
}

/// Winner of one game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PickRequest {
    #[validate(range(min = 1, max = 5))]
    pub round: u32,
    #[validate(range(max = 15))]
    pub game: u32,
    #[validate(length(min = 1))]
    pub winner: String,
}

/// Live view of a host session.
#[derive(Debug, Serialize, ToSchema)]
pub struct TournamentView {
    pub game_id: String,
    #[schema(value_type = u32)]
    pub size: BracketSize,
    pub phase: HostPhase,
    /// Entrant names; locked once the bracket started.
    pub entrants: Vec<String>,
    /// Present once the bracket started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bracket_phase: Option<BracketPhase>,
    /// Present once the bracket started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<RoundView>,
    /// Present once the final has a winner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champion: Option<String>,
    pub can_save: bool,
}

impl From<&HostSession> for TournamentView {
    fn from(session: &HostSession) -> Self {
        let bracket = session.bracket();
        let champion = bracket
            .and_then(|b| b.finalize().ok())
            .map(str::to_owned);
        Self {
            game_id: session.game_id().to_owned(),
            size: session.size(),
            phase: session.phase(),
            entrants: session.names().to_vec(),
            bracket_phase: bracket.map(|b| BracketPhase::of(b.bracket(), b.size())),
            round: bracket.map(RoundView::of),
            can_save: session.phase() == HostPhase::Picking && champion.is_some(),
            champion,
        }
    }
}

/// Returned once the master record is stored.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveTournamentResponse {
    pub game_id: String,
    /// Winning name.
    pub champion: String,
}

/// Stored master record.
#[derive(Debug, Serialize, ToSchema)]
pub struct TournamentRecordView {
    pub game_id: String,
    #[schema(value_type = u32)]
    pub size: BracketSize,
    pub entrants: Vec<String>,
    pub picks: Vec<PickView>,
    pub champion: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TournamentEntity> for TournamentRecordView {
    fn from(record: TournamentEntity) -> Self {
        Self {
            picks: picks_of(&record.bracket),
            game_id: record.game_id,
            size: record.size,
            entrants: record.entrants,
            champion: record.champion,
            created_at: format_system_time(record.created_at),
            updated_at: format_system_time(record.updated_at),
        }
    }
}
