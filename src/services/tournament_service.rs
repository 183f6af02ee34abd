use std::time::SystemTime;

use dashmap::mapref::entry::Entry;
use tracing::{debug, info, warn};

use crate::{
    bracket::{BracketSize, GameKey},
    dto::{
        tournament::{
            CreateTournamentRequest, EntrantsRequest, PickRequest, SaveTournamentResponse,
            TournamentRecordView, TournamentView,
        },
        validation::validate_game_id,
    },
    error::ServiceError,
    services::game_id,
    state::{HostPhase, HostSession, SharedState},
};

const MAX_GAME_ID_ATTEMPTS: usize = 8;

/// Trim and upper-case a client supplied game id, then check its format.
pub fn normalize_game_id(raw: &str) -> Result<String, ServiceError> {
    let game_id = raw.trim().to_ascii_uppercase();
    validate_game_id(&game_id).map_err(|err| {
        ServiceError::InvalidInput(
            err.message
                .map(|message| message.into_owned())
                .unwrap_or_else(|| format!("invalid game id `{raw}`")),
        )
    })?;
    Ok(game_id)
}

/// Apply `action` to the live host session of `game_id` and project the result.
fn with_session_mut<F>(
    state: &SharedState,
    game_id: &str,
    action: F,
) -> Result<TournamentView, ServiceError>
where
    F: FnOnce(&mut HostSession) -> Result<(), ServiceError>,
{
    let mut session = state
        .tournaments()
        .get_mut(game_id)
        .ok_or_else(|| ServiceError::NotFound(format!("no open tournament `{game_id}`")))?;
    action(&mut session)?;
    session.touch();
    Ok(TournamentView::from(&*session))
}

fn bracket_not_started(game_id: &str) -> ServiceError {
    ServiceError::InvalidState(format!("bracket of `{game_id}` has not started"))
}

/// Whether a stored record already uses `game_id`. Skipped while degraded.
async fn is_stored(state: &SharedState, game_id: &str) -> Result<bool, ServiceError> {
    if state.is_degraded() {
        return Ok(false);
    }
    let id = game_id.to_owned();
    let found = state
        .with_store("find_tournament", move |store| store.find_tournament(id))
        .await?;
    Ok(found.is_some())
}

/// Open a host session under a fresh game id.
pub async fn create_tournament(
    state: &SharedState,
    request: CreateTournamentRequest,
) -> Result<TournamentView, ServiceError> {
    let size = BracketSize::try_from(request.size)?;
    let length = state.config().game_id_length();

    for attempt in 1..=MAX_GAME_ID_ATTEMPTS {
        let game_id = game_id::generate(length);
        if is_stored(state, &game_id).await? {
            debug!(%game_id, attempt, "game id already stored; retrying");
            continue;
        }
        match state.tournaments().entry(game_id.clone()) {
            Entry::Occupied(_) => {
                debug!(%game_id, attempt, "game id already open; retrying");
            }
            Entry::Vacant(slot) => {
                let session = slot.insert(HostSession::new(game_id.clone(), size));
                info!(%game_id, size = request.size, "tournament opened");
                return Ok(TournamentView::from(&*session));
            }
        }
    }

    warn!(attempts = MAX_GAME_ID_ATTEMPTS, "could not allocate a game id");
    Err(ServiceError::InvalidState(
        "could not allocate a unique game id".into(),
    ))
}

/// Current view of an open host session.
pub fn get_tournament(state: &SharedState, game_id: &str) -> Result<TournamentView, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    let session = state
        .tournaments()
        .get(&game_id)
        .ok_or_else(|| ServiceError::NotFound(format!("no open tournament `{game_id}`")))?;
    Ok(TournamentView::from(&*session))
}

/// Replace the entrant list, discarding a started bracket.
pub fn set_entrants(
    state: &SharedState,
    game_id: &str,
    request: EntrantsRequest,
) -> Result<TournamentView, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    with_session_mut(state, &game_id, |session| {
        let had_bracket = session.bracket().is_some();
        session.set_names(request.names)?;
        if had_bracket {
            info!(%game_id, "entrants edited; bracket discarded");
        }
        Ok(())
    })
}

/// Check the entrants and build the first round.
pub fn start_bracket(state: &SharedState, game_id: &str) -> Result<TournamentView, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    with_session_mut(state, &game_id, |session| {
        session.start()?;
        info!(%game_id, "bracket started");
        Ok(())
    })
}

/// Record the winner of one game.
pub fn pick_winner(
    state: &SharedState,
    game_id: &str,
    request: PickRequest,
) -> Result<TournamentView, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    with_session_mut(state, &game_id, |session| {
        let key = GameKey::new(request.round, request.game);
        session.pick(key, request.winner.trim())?;
        debug!(%game_id, round = key.round, game = key.game, "winner picked");
        Ok(())
    })
}

/// Move to the next round once the current one is complete.
pub fn next_round(state: &SharedState, game_id: &str) -> Result<TournamentView, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    with_session_mut(state, &game_id, |session| {
        let bracket = session
            .bracket_mut()
            .ok_or_else(|| bracket_not_started(&game_id))?;
        let round = bracket.advance()?;
        debug!(%game_id, round, "advanced");
        Ok(())
    })
}

/// Move back one round; stays on the first round.
pub fn previous_round(state: &SharedState, game_id: &str) -> Result<TournamentView, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    with_session_mut(state, &game_id, |session| {
        let bracket = session
            .bracket_mut()
            .ok_or_else(|| bracket_not_started(&game_id))?;
        let round = bracket.go_back();
        debug!(%game_id, round, "went back");
        Ok(())
    })
}

/// Persist the completed bracket as the master record.
///
/// The session stays open in the saved phase until it is evicted or resumed.
pub async fn save_tournament(
    state: &SharedState,
    game_id: &str,
) -> Result<SaveTournamentResponse, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    let record = {
        let session = state
            .tournaments()
            .get(&game_id)
            .ok_or_else(|| ServiceError::NotFound(format!("no open tournament `{game_id}`")))?;
        session.to_record(SystemTime::now())?
    };
    let champion = record.champion.clone();

    state
        .with_store("save_tournament", move |store| store.save_tournament(record))
        .await?;

    if let Some(mut session) = state.tournaments().get_mut(&game_id) {
        session.mark_saved()?;
        session.touch();
    }
    info!(%game_id, %champion, "tournament saved");

    Ok(SaveTournamentResponse { game_id, champion })
}

/// Reopen a stored tournament for editing. Replaces any live session with the same id.
pub async fn resume_tournament(
    state: &SharedState,
    game_id: &str,
) -> Result<TournamentView, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    let id = game_id.clone();
    let record = state
        .with_store("find_tournament", move |store| store.find_tournament(id))
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("tournament `{game_id}` not found")))?;

    let session = HostSession::resume(record)?;
    let view = TournamentView::from(&session);
    let replaced = state.tournaments().insert(game_id.clone(), session);
    if replaced.is_some_and(|previous| previous.phase() != HostPhase::Saved) {
        warn!(%game_id, "replaced unsaved host session while resuming");
    }
    info!(%game_id, "tournament resumed");
    Ok(view)
}

/// Stored master record of `game_id`.
pub async fn get_record(
    state: &SharedState,
    game_id: &str,
) -> Result<TournamentRecordView, ServiceError> {
    let game_id = normalize_game_id(game_id)?;
    let id = game_id.clone();
    state
        .with_store("find_tournament", move |store| store.find_tournament(id))
        .await?
        .map(TournamentRecordView::from)
        .ok_or_else(|| ServiceError::NotFound(format!("tournament `{game_id}` not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_ids_are_normalized() {
        assert_eq!(normalize_game_id(" k3f9q2a ").unwrap(), "K3F9Q2A");
        assert!(matches!(
            normalize_game_id("K3F-Q2A"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            normalize_game_id("K3"),
            Err(ServiceError::InvalidInput(_))
        ));
    }
}
