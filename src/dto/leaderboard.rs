use serde::Serialize;
use utoipa::ToSchema;

/// One ranked prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// Competition rank; tied scores share a rank.
    pub rank: usize,
    pub player_name: String,
    pub score: u32,
    pub max_score: u32,
    pub predicted_winner: String,
    pub correct_champion: bool,
}

/// Ranked predictions of a tournament.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub game_id: String,
    pub champion: String,
    pub max_score: u32,
    pub entries: Vec<LeaderboardEntry>,
}
