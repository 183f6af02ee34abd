use tracing::warn;

use crate::{
    dto::health::{HealthResponse, HealthStatus},
    state::SharedState,
};

/// Check the installed store and summarize the live sessions.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let status = match state.require_game_store().await {
        Ok(store) => match store.health_check().await {
            Ok(()) => HealthStatus::Ok,
            Err(err) => {
                warn!(error = %err, "storage health check failed");
                HealthStatus::Degraded
            }
        },
        Err(_) => HealthStatus::Degraded,
    };

    HealthResponse {
        status,
        storage: state.config().storage(),
        open_tournaments: state.tournaments().len(),
        open_predictions: state.predictions().len(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        bracket::BracketSize,
        config::AppConfig,
        dao::bracket_store::{BracketStore, memory::MemoryBracketStore},
        state::{AppState, HostSession},
    };

    #[tokio::test]
    async fn reports_degraded_until_a_store_answers() {
        let state = AppState::new(AppConfig::default());
        state
            .tournaments()
            .insert("ABC1234".into(), HostSession::new("ABC1234".into(), BracketSize::Eight));

        let before = health_status(&state).await;
        assert_eq!(before.status, HealthStatus::Degraded);
        assert_eq!(before.open_tournaments, 1);

        let store: Arc<dyn BracketStore> = Arc::new(MemoryBracketStore::new());
        state.set_game_store(store).await;
        assert_eq!(health_status(&state).await.status, HealthStatus::Ok);
    }
}
