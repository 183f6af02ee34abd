use serde::Serialize;
use utoipa::ToSchema;

use crate::config::StorageBackend;

/// Whether storage-backed operations are currently served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// A store is installed and answered its last health check.
    Ok,
    /// No usable store; only live session editing works.
    Degraded,
}

/// Body of `GET /healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: HealthStatus,
    /// Configured persistence backend.
    pub storage: StorageBackend,
    /// Host sessions currently being edited.
    pub open_tournaments: usize,
    /// Prediction sessions not yet submitted.
    pub open_predictions: usize,
}
