use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        leaderboard::LeaderboardResponse,
        prediction::{PredictionView, StartPredictionRequest},
        tournament::{
            CreateTournamentRequest, EntrantsRequest, PickRequest, SaveTournamentResponse,
            TournamentRecordView, TournamentView,
        },
    },
    error::AppError,
    services::{leaderboard_service, prediction_service, tournament_service},
    state::SharedState,
};

/// Routes driving the host workflow, plus the per-tournament prediction entry points.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/tournaments", post(create_tournament))
        .route("/tournaments/{game_id}", get(get_tournament))
        .route("/tournaments/{game_id}/entrants", put(set_entrants))
        .route("/tournaments/{game_id}/start", post(start_bracket))
        .route("/tournaments/{game_id}/picks", post(pick_winner))
        .route("/tournaments/{game_id}/rounds/next", post(next_round))
        .route("/tournaments/{game_id}/rounds/previous", post(previous_round))
        .route("/tournaments/{game_id}/save", post(save_tournament))
        .route("/tournaments/{game_id}/resume", post(resume_tournament))
        .route("/tournaments/{game_id}/record", get(get_record))
        .route("/tournaments/{game_id}/predictions", post(start_prediction))
        .route("/tournaments/{game_id}/leaderboard", get(leaderboard))
}

/// Open a host session under a fresh game id.
#[utoipa::path(
    post,
    path = "/tournaments",
    tag = "tournament",
    request_body = CreateTournamentRequest,
    responses(
        (status = 200, description = "Tournament opened", body = TournamentView),
        (status = 400, description = "Unsupported size")
    )
)]
pub async fn create_tournament(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateTournamentRequest>>,
) -> Result<Json<TournamentView>, AppError> {
    let view = tournament_service::create_tournament(&state, payload).await?;
    Ok(Json(view))
}

/// Current view of an open host session.
#[utoipa::path(
    get,
    path = "/tournaments/{game_id}",
    tag = "tournament",
    params(("game_id" = String, Path, description = "Game id of the open tournament")),
    responses(
        (status = 200, description = "Host session", body = TournamentView),
        (status = 404, description = "No open session")
    )
)]
pub async fn get_tournament(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Result<Json<TournamentView>, AppError> {
    Ok(Json(tournament_service::get_tournament(&state, &game_id)?))
}

/// Replace the entrant names. A started bracket is discarded.
#[utoipa::path(
    put,
    path = "/tournaments/{game_id}/entrants",
    tag = "tournament",
    params(("game_id" = String, Path, description = "Game id of the open tournament")),
    request_body = EntrantsRequest,
    responses(
        (status = 200, description = "Entrants replaced", body = TournamentView),
        (status = 409, description = "Tournament already saved")
    )
)]
pub async fn set_entrants(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
    Valid(Json(payload)): Valid<Json<EntrantsRequest>>,
) -> Result<Json<TournamentView>, AppError> {
    Ok(Json(tournament_service::set_entrants(
        &state, &game_id, payload,
    )?))
}

/// Check the entrant list and build the first round.
#[utoipa::path(
    post,
    path = "/tournaments/{game_id}/start",
    tag = "tournament",
    params(("game_id" = String, Path, description = "Game id of the open tournament")),
    responses(
        (status = 200, description = "Bracket started", body = TournamentView),
        (status = 400, description = "Missing or duplicate names"),
        (status = 409, description = "Bracket already started")
    )
)]
pub async fn start_bracket(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Result<Json<TournamentView>, AppError> {
    Ok(Json(tournament_service::start_bracket(&state, &game_id)?))
}

/// Record the winner of one game. Later rounds are cleared.
#[utoipa::path(
    post,
    path = "/tournaments/{game_id}/picks",
    tag = "tournament",
    params(("game_id" = String, Path, description = "Game id of the open tournament")),
    request_body = PickRequest,
    responses(
        (status = 200, description = "Winner recorded", body = TournamentView),
        (status = 400, description = "Unknown game or contestant"),
        (status = 409, description = "Matchup not decided yet, or tournament not picking")
    )
)]
pub async fn pick_winner(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
    Valid(Json(payload)): Valid<Json<PickRequest>>,
) -> Result<Json<TournamentView>, AppError> {
    Ok(Json(tournament_service::pick_winner(
        &state, &game_id, payload,
    )?))
}

/// Move to the next round.
#[utoipa::path(
    post,
    path = "/tournaments/{game_id}/rounds/next",
    tag = "tournament",
    params(("game_id" = String, Path, description = "Game id of the open tournament")),
    responses(
        (status = 200, description = "Advanced", body = TournamentView),
        (status = 409, description = "Round incomplete or already final")
    )
)]
pub async fn next_round(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Result<Json<TournamentView>, AppError> {
    Ok(Json(tournament_service::next_round(&state, &game_id)?))
}

/// Move back one round.
#[utoipa::path(
    post,
    path = "/tournaments/{game_id}/rounds/previous",
    tag = "tournament",
    params(("game_id" = String, Path, description = "Game id of the open tournament")),
    responses((status = 200, description = "Went back", body = TournamentView))
)]
pub async fn previous_round(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Result<Json<TournamentView>, AppError> {
    Ok(Json(tournament_service::previous_round(&state, &game_id)?))
}

/// Persist the completed bracket as the master record.
#[utoipa::path(
    post,
    path = "/tournaments/{game_id}/save",
    tag = "tournament",
    params(("game_id" = String, Path, description = "Game id of the open tournament")),
    responses(
        (status = 200, description = "Record stored", body = SaveTournamentResponse),
        (status = 409, description = "Final not decided"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn save_tournament(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Result<Json<SaveTournamentResponse>, AppError> {
    let saved = tournament_service::save_tournament(&state, &game_id).await?;
    Ok(Json(saved))
}

/// Reopen a stored tournament for editing.
#[utoipa::path(
    post,
    path = "/tournaments/{game_id}/resume",
    tag = "tournament",
    params(("game_id" = String, Path, description = "Game id of the stored tournament")),
    responses(
        (status = 200, description = "Host session reopened", body = TournamentView),
        (status = 404, description = "Unknown tournament"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn resume_tournament(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Result<Json<TournamentView>, AppError> {
    let view = tournament_service::resume_tournament(&state, &game_id).await?;
    Ok(Json(view))
}

/// Stored master record.
#[utoipa::path(
    get,
    path = "/tournaments/{game_id}/record",
    tag = "tournament",
    params(("game_id" = String, Path, description = "Game id of the stored tournament")),
    responses(
        (status = 200, description = "Stored record", body = TournamentRecordView),
        (status = 404, description = "Unknown tournament")
    )
)]
pub async fn get_record(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Result<Json<TournamentRecordView>, AppError> {
    let record = tournament_service::get_record(&state, &game_id).await?;
    Ok(Json(record))
}

/// Open a prediction for a stored tournament.
#[utoipa::path(
    post,
    path = "/tournaments/{game_id}/predictions",
    tag = "prediction",
    params(("game_id" = String, Path, description = "Game id of the stored tournament")),
    request_body = StartPredictionRequest,
    responses(
        (status = 200, description = "Prediction opened", body = PredictionView),
        (status = 404, description = "Unknown tournament")
    )
)]
pub async fn start_prediction(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
    Valid(Json(payload)): Valid<Json<StartPredictionRequest>>,
) -> Result<Json<PredictionView>, AppError> {
    let view = prediction_service::start_prediction(&state, &game_id, payload).await?;
    Ok(Json(view))
}

/// Submitted predictions ranked against the master record.
#[utoipa::path(
    get,
    path = "/tournaments/{game_id}/leaderboard",
    tag = "prediction",
    params(("game_id" = String, Path, description = "Game id of the stored tournament")),
    responses(
        (status = 200, description = "Ranked predictions", body = LeaderboardResponse),
        (status = 404, description = "Unknown tournament")
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let board = leaderboard_service::leaderboard(&state, &game_id).await?;
    Ok(Json(board))
}
