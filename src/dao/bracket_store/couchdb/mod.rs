mod config;
mod error;
mod models;
mod store;

pub use config::CouchConfig;
pub use error::CouchDaoError;
pub use store::CouchBracketStore;

use crate::dao::storage::StorageError;

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        match err {
            CouchDaoError::Conflict { path } if path.starts_with(models::PREDICTION_PREFIX) => {
                StorageError::prediction_exists(path)
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
