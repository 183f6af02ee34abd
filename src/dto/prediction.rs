use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    bracket::{BracketPhase, BracketSize},
    dao::models::PredictionEntity,
    dto::{bracket::RoundView, format_system_time, validation::validate_player_name},
    state::PredictionSession,
};

/// Payload opening a prediction for a stored tournament.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartPredictionRequest {
    #[schema(example = "Ada")]
    pub player_name: String,
}

impl Validate for StartPredictionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_player_name(&self.player_name) {
            errors.add("player_name", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Live view of a prediction session. The master bracket is never included.
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionView {
    pub id: Uuid,
    pub game_id: String,
    pub player_name: String,
    #[schema(value_type = u32)]
    pub size: BracketSize,
    pub bracket_phase: BracketPhase,
    pub round: RoundView,
    pub can_submit: bool,
}

impl From<&PredictionSession> for PredictionView {
    fn from(session: &PredictionSession) -> Self {
        let bracket = session.bracket();
        Self {
            id: session.id(),
            game_id: session.game_id().to_owned(),
            player_name: session.player_name().to_owned(),
            size: bracket.size(),
            bracket_phase: BracketPhase::of(bracket.bracket(), bracket.size()),
            round: RoundView::of(bracket),
            can_submit: bracket.finalize().is_ok(),
        }
    }
}

/// Returned once a prediction is stored.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmittedPrediction {
    pub id: Uuid,
    pub game_id: String,
    pub player_name: String,
    pub predicted_winner: String,
    pub submitted_at: String,
}

impl From<PredictionEntity> for SubmittedPrediction {
    fn from(entity: PredictionEntity) -> Self {
        Self {
            id: entity.id,
            game_id: entity.game_id,
            player_name: entity.player_name,
            predicted_winner: entity.predicted_winner,
            submitted_at: format_system_time(entity.submitted_at),
        }
    }
}
