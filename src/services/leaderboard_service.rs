use tracing::debug;

use crate::{
    bracket::{max_score, rank, rounds_for},
    dto::leaderboard::{LeaderboardEntry, LeaderboardResponse},
    error::ServiceError,
    services::tournament_service::normalize_game_id,
    state::SharedState,
};

/// Score every submitted prediction of `game_id` against its master record.
pub async fn leaderboard(
    state: &SharedState,
    game_id: &str,
) -> Result<LeaderboardResponse, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    let id = game_id.clone();
    let record = state
        .with_store("find_tournament", move |store| store.find_tournament(id))
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("tournament `{game_id}` not found")))?;

    let id = game_id.clone();
    let predictions = state
        .with_store("list_predictions", move |store| store.list_predictions(id))
        .await?;

    let rounds = rounds_for(record.size);
    let max_score = max_score(&rounds);
    let entries: Vec<LeaderboardEntry> =
        rank(predictions, &record.bracket, &rounds, |prediction| {
            &prediction.bracket
        })
        .into_iter()
        .map(|standing| LeaderboardEntry {
            rank: standing.rank,
            correct_champion: standing.entry.predicted_winner == record.champion,
            player_name: standing.entry.player_name,
            score: standing.score,
            max_score,
            predicted_winner: standing.entry.predicted_winner,
        })
        .collect();
    debug!(%game_id, count = entries.len(), "leaderboard computed");

    Ok(LeaderboardResponse {
        game_id,
        champion: record.champion,
        max_score,
        entries,
    })
}
