use utoipa::OpenApi;

#[derive(OpenApi)]
/// OpenAPI document for every Bracket Back route.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::tournament::create_tournament,
        crate::routes::tournament::get_tournament,
        crate::routes::tournament::set_entrants,
        crate::routes::tournament::start_bracket,
        crate::routes::tournament::pick_winner,
        crate::routes::tournament::next_round,
        crate::routes::tournament::previous_round,
        crate::routes::tournament::save_tournament,
        crate::routes::tournament::resume_tournament,
        crate::routes::tournament::get_record,
        crate::routes::tournament::leaderboard,
        crate::routes::tournament::start_prediction,
        crate::routes::prediction::get_prediction,
        crate::routes::prediction::pick_winner,
        crate::routes::prediction::next_round,
        crate::routes::prediction::previous_round,
        crate::routes::prediction::submit_prediction,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::config::StorageBackend,
            crate::dto::bracket::MatchupView,
            crate::dto::bracket::RoundView,
            crate::dto::bracket::PickView,
            crate::dto::tournament::CreateTournamentRequest,
            crate::dto::tournament::EntrantsRequest,
            crate::dto::tournament::PickRequest,
            crate::dto::tournament::TournamentView,
            crate::dto::tournament::SaveTournamentResponse,
            crate::dto::tournament::TournamentRecordView,
            crate::dto::prediction::StartPredictionRequest,
            crate::dto::prediction::PredictionView,
            crate::dto::prediction::SubmittedPrediction,
            crate::dto::leaderboard::LeaderboardEntry,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::bracket::BracketPhase,
            crate::state::HostPhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "tournament", description = "Host workflow: entrants, picks and the master record"),
        (name = "prediction", description = "Participant predictions and the leaderboard"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for expected in [
            "/healthcheck",
            "/tournaments",
            "/tournaments/{game_id}",
            "/tournaments/{game_id}/rounds/next",
            "/tournaments/{game_id}/leaderboard",
            "/tournaments/{game_id}/predictions",
            "/predictions/{id}",
            "/predictions/{id}/submit",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }
}
