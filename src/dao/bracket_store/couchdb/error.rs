//! Failures of the CouchDB bracket store, before they are folded into [`StorageError`].
//!
//! [`StorageError`]: crate::dao::storage::StorageError

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for CouchDB calls.
pub type CouchResult<T> = Result<T, CouchDaoError>;

/// What went wrong while talking to CouchDB.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    /// A required setting is absent.
    #[error("environment variable `{var}` is required for CouchDB storage")]
    MissingEnvVar { var: &'static str },
    /// TLS or client setup failed.
    #[error("could not build the CouchDB HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// Checking or creating the database failed before any status was received.
    #[error("CouchDB database `{database}` is unreachable")]
    DatabaseRequest {
        database: String,
        #[source]
        source: reqwest::Error,
    },
    /// The database check or creation returned an unexpected status.
    #[error("CouchDB answered {status} while preparing database `{database}`")]
    DatabaseStatus {
        database: String,
        status: StatusCode,
    },
    /// A document request could not be sent.
    #[error("CouchDB request to `{path}` could not be sent")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Write-once documents (predictions) answer 409 on a second PUT.
    #[error("CouchDB document `{path}` already exists")]
    Conflict { path: String },
    /// A document endpoint returned an unexpected status.
    #[error("CouchDB answered {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// The response body could not be read as JSON.
    #[error("CouchDB response for `{path}` is not valid JSON")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// A listed document has an unexpected shape.
    #[error("CouchDB document in `{path}` does not match the stored model")]
    DeserializeValue {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
