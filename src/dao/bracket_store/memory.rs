//! Process-local [`BracketStore`] used when no database is configured, and by tests.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::{
    bracket_store::BracketStore,
    models::{PredictionEntity, TournamentEntity},
    storage::{StorageError, StorageResult},
};

/// In-memory store. Clones share the same maps.
#[derive(Clone, Default)]
pub struct MemoryBracketStore {
    tournaments: Arc<DashMap<String, TournamentEntity>>,
    predictions: Arc<DashMap<String, Vec<PredictionEntity>>>,
}

impl MemoryBracketStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BracketStore for MemoryBracketStore {
    fn save_tournament(&self, tournament: TournamentEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .tournaments
                .insert(tournament.game_id.clone(), tournament);
            Ok(())
        })
    }

    fn find_tournament(
        &self,
        game_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<TournamentEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .tournaments
                .get(&game_id)
                .map(|entry| entry.value().clone()))
        })
    }

    fn save_prediction(&self, prediction: PredictionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut entries = store
                .predictions
                .entry(prediction.game_id.clone())
                .or_default();
            if entries.iter().any(|existing| existing.id == prediction.id) {
                return Err(StorageError::prediction_exists(prediction.id));
            }
            entries.push(prediction);
            Ok(())
        })
    }

    fn list_predictions(
        &self,
        game_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<PredictionEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut predictions = store
                .predictions
                .get(&game_id)
                .map(|entry| entry.value().clone())
                .unwrap_or_default();
            predictions.sort_by_key(|prediction| prediction.submitted_at);
            Ok(predictions)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
