use std::time::SystemTime;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    bracket::GameKey,
    dto::{
        prediction::{PredictionView, StartPredictionRequest, SubmittedPrediction},
        tournament::PickRequest,
    },
    error::ServiceError,
    services::tournament_service::normalize_game_id,
    state::{PredictionSession, SharedState},
};

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("no open prediction `{id}`"))
}

fn with_session_mut<F>(state: &SharedState, id: Uuid, action: F) -> Result<PredictionView, ServiceError>
where
    F: FnOnce(&mut PredictionSession) -> Result<(), ServiceError>,
{
    let mut session = state.predictions().get_mut(&id).ok_or_else(|| not_found(id))?;
    action(&mut session)?;
    session.touch();
    Ok(PredictionView::from(&*session))
}

/// Open a prediction for the stored tournament `game_id`.
pub async fn start_prediction(
    state: &SharedState,
    game_id: &str,
    request: StartPredictionRequest,
) -> Result<PredictionView, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    let id = game_id.clone();
    let record = state
        .with_store("find_tournament", move |store| store.find_tournament(id))
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("tournament `{game_id}` not found")))?;

    let session = PredictionSession::open(&record, request.player_name.trim().to_owned())?;
    let view = PredictionView::from(&session);
    info!(%game_id, prediction_id = %session.id(), "prediction opened");
    state.predictions().insert(session.id(), session);
    Ok(view)
}

/// Current view of an open prediction.
pub fn get_prediction(state: &SharedState, id: Uuid) -> Result<PredictionView, ServiceError> {
    let session = state.predictions().get(&id).ok_or_else(|| not_found(id))?;
    Ok(PredictionView::from(&*session))
}

/// Record the predicted winner of one game.
pub fn pick_winner(
    state: &SharedState,
    id: Uuid,
    request: PickRequest,
) -> Result<PredictionView, ServiceError> {
    with_session_mut(state, id, |session| {
        let key = GameKey::new(request.round, request.game);
        session.bracket_mut().select(key, request.winner.trim())?;
        debug!(prediction_id = %id, round = key.round, game = key.game, "winner predicted");
        Ok(())
    })
}

/// Move to the next round once the current one is complete.
pub fn next_round(state: &SharedState, id: Uuid) -> Result<PredictionView, ServiceError> {
    with_session_mut(state, id, |session| {
        session.bracket_mut().advance()?;
        Ok(())
    })
}

/// Move back one round; stays on the first round.
pub fn previous_round(state: &SharedState, id: Uuid) -> Result<PredictionView, ServiceError> {
    with_session_mut(state, id, |session| {
        session.bracket_mut().go_back();
        Ok(())
    })
}

/// Persist the completed prediction once and close the session.
pub async fn submit_prediction(
    state: &SharedState,
    id: Uuid,
) -> Result<SubmittedPrediction, ServiceError> {
    let entity = {
        let session = state.predictions().get(&id).ok_or_else(|| not_found(id))?;
        session.to_entity(SystemTime::now())?
    };

    let stored = entity.clone();
    state
        .with_store("save_prediction", move |store| store.save_prediction(stored))
        .await?;

    state.predictions().remove(&id);
    info!(
        game_id = %entity.game_id,
        prediction_id = %id,
        predicted_winner = %entity.predicted_winner,
        "prediction submitted"
    );
    Ok(entity.into())
}
