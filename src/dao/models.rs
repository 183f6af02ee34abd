use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::bracket::{Bracket, BracketSize};

/// Master tournament record persisted by the storage layer, keyed by its game id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentEntity {
    /// Short opaque code shared with participants.
    pub game_id: String,
    /// Number of entrants.
    pub size: BracketSize,
    /// Entrant names in seeding order.
    pub entrants: Vec<String>,
    /// The host's picks.
    pub bracket: Bracket,
    /// Winner of the final.
    pub champion: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last time the record was saved.
    pub updated_at: SystemTime,
}

/// A participant's submitted prediction, never merged into the master record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionEntity {
    /// Stable identifier of the prediction.
    pub id: Uuid,
    /// Tournament the prediction belongs to.
    pub game_id: String,
    /// Display name of the participant.
    pub player_name: String,
    /// Number of entrants of the tournament at submission time.
    pub size: BracketSize,
    /// The participant's picks.
    pub bracket: Bracket,
    /// Champion picked by the participant.
    pub predicted_winner: String,
    /// Submission timestamp, used as the leaderboard tie-breaker.
    pub submitted_at: SystemTime,
}
