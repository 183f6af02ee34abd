use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    bracket::BracketError,
    dao::storage::StorageError,
    state::{HostSessionError, InvalidTransition},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Operation exceeded its timeout limit.
    #[error("operation timed out")]
    Timeout,
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AlreadyExists { .. } => ServiceError::InvalidState(err.to_string()),
            other => ServiceError::Unavailable(other),
        }
    }
}

impl From<BracketError> for ServiceError {
    fn from(err: BracketError) -> Self {
        match err {
            BracketError::InvalidSize(_)
            | BracketError::IncompleteEntrants { .. }
            | BracketError::DuplicateEntrant(_)
            | BracketError::IndexOutOfRange(_)
            | BracketError::InvalidWinner { .. } => ServiceError::InvalidInput(err.to_string()),
            BracketError::MatchupNotReady(_)
            | BracketError::RoundNotComplete { .. }
            | BracketError::NoNextRound(_) => ServiceError::InvalidState(err.to_string()),
        }
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(err: InvalidTransition) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

impl From<HostSessionError> for ServiceError {
    fn from(err: HostSessionError) -> Self {
        match err {
            HostSessionError::Transition(invalid) => invalid.into(),
            HostSessionError::Bracket(bracket) => bracket.into(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Timeout => AppError::ServiceUnavailable("operation timed out".into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bracket::GameKey,
        state::{HostEvent, HostPhase},
    };

    fn status_of(err: impl Into<ServiceError>) -> StatusCode {
        AppError::from(err.into()).into_response().status()
    }

    #[test]
    fn bracket_errors_split_between_bad_request_and_conflict() {
        assert_eq!(
            status_of(BracketError::IncompleteEntrants { filled: 31, size: 32 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(BracketError::InvalidWinner {
                key: GameKey::new(1, 0),
                winner: "Z".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(BracketError::RoundNotComplete {
                round: 1,
                decided: 3,
                expected: 4
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(BracketError::NoNextRound(3)), StatusCode::CONFLICT);
    }

    #[test]
    fn duplicate_writes_conflict_and_outages_are_unavailable() {
        assert_eq!(
            status_of(StorageError::prediction_exists("p-1")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(StorageError::unavailable(
                "down".into(),
                std::io::Error::other("refused")
            )),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(ServiceError::Degraded), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(ServiceError::Timeout), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn invalid_transitions_conflict() {
        let err = InvalidTransition {
            from: HostPhase::EnteringNames,
            event: HostEvent::Save,
        };
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }
}
