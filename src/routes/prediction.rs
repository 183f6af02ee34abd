use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        prediction::{PredictionView, SubmittedPrediction},
        tournament::PickRequest,
    },
    error::AppError,
    services::prediction_service,
    state::SharedState,
};

/// Routes driving an open prediction.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/predictions/{id}", get(get_prediction))
        .route("/predictions/{id}/picks", post(pick_winner))
        .route("/predictions/{id}/rounds/next", post(next_round))
        .route("/predictions/{id}/rounds/previous", post(previous_round))
        .route("/predictions/{id}/submit", post(submit_prediction))
}

/// Current view of an open prediction.
#[utoipa::path(
    get,
    path = "/predictions/{id}",
    tag = "prediction",
    params(("id" = Uuid, Path, description = "Prediction identifier")),
    responses(
        (status = 200, description = "Prediction", body = PredictionView),
        (status = 404, description = "No open prediction")
    )
)]
pub async fn get_prediction(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PredictionView>, AppError> {
    Ok(Json(prediction_service::get_prediction(&state, id)?))
}

/// Record a predicted winner.
#[utoipa::path(
    post,
    path = "/predictions/{id}/picks",
    tag = "prediction",
    params(("id" = Uuid, Path, description = "Prediction identifier")),
    request_body = PickRequest,
    responses(
        (status = 200, description = "Winner recorded", body = PredictionView),
        (status = 400, description = "Unknown game or contestant")
    )
)]
pub async fn pick_winner(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<PickRequest>>,
) -> Result<Json<PredictionView>, AppError> {
    Ok(Json(prediction_service::pick_winner(&state, id, payload)?))
}

/// Move to the next round.
#[utoipa::path(
    post,
    path = "/predictions/{id}/rounds/next",
    tag = "prediction",
    params(("id" = Uuid, Path, description = "Prediction identifier")),
    responses(
        (status = 200, description = "Advanced", body = PredictionView),
        (status = 409, description = "Round incomplete or already final")
    )
)]
pub async fn next_round(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PredictionView>, AppError> {
    Ok(Json(prediction_service::next_round(&state, id)?))
}

/// Move back one round.
#[utoipa::path(
    post,
    path = "/predictions/{id}/rounds/previous",
    tag = "prediction",
    params(("id" = Uuid, Path, description = "Prediction identifier")),
    responses((status = 200, description = "Went back", body = PredictionView))
)]
pub async fn previous_round(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PredictionView>, AppError> {
    Ok(Json(prediction_service::previous_round(&state, id)?))
}

/// Store the completed prediction. Each prediction is stored once.
#[utoipa::path(
    post,
    path = "/predictions/{id}/submit",
    tag = "prediction",
    params(("id" = Uuid, Path, description = "Prediction identifier")),
    responses(
        (status = 200, description = "Prediction stored", body = SubmittedPrediction),
        (status = 409, description = "Final not predicted"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn submit_prediction(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmittedPrediction>, AppError> {
    let submitted = prediction_service::submit_prediction(&state, id).await?;
    Ok(Json(submitted))
}
