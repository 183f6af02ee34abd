use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the request.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Backend specific description.
        message: String,
        /// Underlying driver failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A write-once document was written a second time.
    #[error("{kind} `{id}` already exists")]
    AlreadyExists {
        /// Document kind, e.g. `prediction`.
        kind: &'static str,
        /// Identifier of the existing document.
        id: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a duplicate-write error for a prediction.
    pub fn prediction_exists(id: impl ToString) -> Self {
        StorageError::AlreadyExists {
            kind: "prediction",
            id: id.to_string(),
        }
    }
}
