use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
    models::{MongoPredictionDocument, MongoTournamentDocument, tournament_filter},
};
use crate::dao::{
    bracket_store::BracketStore,
    models::{PredictionEntity, TournamentEntity},
    storage::StorageResult,
};

const TOURNAMENT_COLLECTION_NAME: &str = "tournaments";
const PREDICTION_COLLECTION_NAME: &str = "predictions";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed [`BracketStore`] implementation.
#[derive(Clone)]
pub struct MongoBracketStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    // kept alive alongside the database handle
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let fresh = open(&self.config).await?;
        *self.state.write().await = fresh;
        Ok(())
    }
}

/// Build a client and check that the server answers one ping.
///
/// Retries belong to the storage supervisor, which backs off between connect attempts.
async fn open(config: &MongoConfig) -> MongoResult<MongoState> {
    let client = Client::with_options(config.options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(&config.database_name);
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|source| MongoDaoError::InitialPing {
            database: config.database_name.clone(),
            source,
        })?;
    Ok(MongoState { client, database })
}

impl MongoBracketStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let state = open(&config).await?;
        let inner = Arc::new(MongoInner {
            state: RwLock::new(state),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.prediction_collection().await;
        let index = mongodb::IndexModel::builder()
            .keys(doc! {"game_id": 1, "submitted_at": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("prediction_game_idx".to_owned()))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PREDICTION_COLLECTION_NAME,
                index: "game_id,submitted_at",
                source,
            })?;

        Ok(())
    }

    async fn tournament_collection(&self) -> Collection<MongoTournamentDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoTournamentDocument>(TOURNAMENT_COLLECTION_NAME)
    }

    async fn prediction_collection(&self) -> Collection<MongoPredictionDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoPredictionDocument>(PREDICTION_COLLECTION_NAME)
    }

    async fn save_tournament(&self, tournament: TournamentEntity) -> MongoResult<()> {
        let game_id = tournament.game_id.clone();
        let document: MongoTournamentDocument = tournament.into();
        let collection = self.tournament_collection().await;
        collection
            .replace_one(tournament_filter(&game_id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveTournament { game_id, source })?;

        Ok(())
    }

    async fn find_tournament(&self, game_id: String) -> MongoResult<Option<TournamentEntity>> {
        let collection = self.tournament_collection().await;

        let document = collection
            .find_one(tournament_filter(&game_id))
            .await
            .map_err(|source| MongoDaoError::LoadTournament { game_id, source })?;

        Ok(document.map(Into::into))
    }

    async fn save_prediction(&self, prediction: PredictionEntity) -> MongoResult<()> {
        let id = prediction.id;
        let document: MongoPredictionDocument = prediction.into();
        let collection = self.prediction_collection().await;

        collection
            .insert_one(&document)
            .await
            .map_err(|source| {
                if is_duplicate_key(&source) {
                    MongoDaoError::DuplicatePrediction { id, source }
                } else {
                    MongoDaoError::SavePrediction { id, source }
                }
            })?;

        Ok(())
    }

    async fn list_predictions(&self, game_id: String) -> MongoResult<Vec<PredictionEntity>> {
        let collection = self.prediction_collection().await;

        let documents: Vec<MongoPredictionDocument> = collection
            .find(doc! {"game_id": &game_id})
            .sort(doc! {"submitted_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListPredictions {
                game_id: game_id.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListPredictions {
                game_id: game_id.clone(),
                source,
            })?;

        documents
            .into_iter()
            .map(|document| {
                PredictionEntity::try_from(document).map_err(|source| {
                    MongoDaoError::InvalidPredictionId {
                        game_id: game_id.clone(),
                        source,
                    }
                })
            })
            .collect()
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

impl BracketStore for MongoBracketStore {
    fn save_tournament(&self, tournament: TournamentEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_tournament(tournament).await.map_err(Into::into) })
    }

    fn find_tournament(
        &self,
        game_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<TournamentEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_tournament(game_id).await.map_err(Into::into) })
    }

    fn save_prediction(&self, prediction: PredictionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_prediction(prediction).await.map_err(Into::into) })
    }

    fn list_predictions(
        &self,
        game_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<PredictionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_predictions(game_id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
