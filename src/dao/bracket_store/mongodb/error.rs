use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB database `{database}` did not answer the connect ping")]
    InitialPing {
        database: String,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save tournament `{game_id}`")]
    SaveTournament {
        game_id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load tournament `{game_id}`")]
    LoadTournament {
        game_id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to save prediction `{id}`")]
    SavePrediction {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("prediction `{id}` already exists")]
    DuplicatePrediction {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list predictions of tournament `{game_id}`")]
    ListPredictions {
        game_id: String,
        #[source]
        source: MongoError,
    },
    #[error("stored prediction of tournament `{game_id}` has an invalid id")]
    InvalidPredictionId {
        game_id: String,
        #[source]
        source: uuid::Error,
    },
}
