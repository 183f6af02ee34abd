#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{PredictionEntity, TournamentEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for tournament records and predictions.
///
/// Saving a tournament replaces any previous record with the same game id (last write wins).
/// Predictions are write-once.
pub trait BracketStore: Send + Sync {
    fn save_tournament(&self, tournament: TournamentEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_tournament(
        &self,
        game_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<TournamentEntity>>>;
    fn save_prediction(&self, prediction: PredictionEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Predictions of `game_id` in submission order.
    fn list_predictions(
        &self,
        game_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<PredictionEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
