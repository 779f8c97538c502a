use axum::{Json, http::StatusCode, response::IntoResponse};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::{
    state::{
        game::SetupError,
        round::RoundError,
        state_machine::{ApplyError, InvalidTransition},
    },
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A round was refused because of per-player score entries.
    #[error("round rejected: {message}")]
    RoundRejected {
        message: String,
        fields: IndexMap<String, String>,
    },
    /// Invariant broken inside the service.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RoundError> for ServiceError {
    fn from(err: RoundError) -> Self {
        match err {
            RoundError::NotInProgress(_) => ServiceError::InvalidState(err.to_string()),
            RoundError::InvalidScores(issues) => {
                let message = format!("{} score entries need correcting", issues.len());
                let fields = issues
                    .into_iter()
                    .map(|(id, issue)| (id, issue.message().to_string()))
                    .collect();
                ServiceError::RoundRejected { message, fields }
            }
            RoundError::MissingWinner
            | RoundError::UnknownWinner(_)
            | RoundError::UnknownPlayers(_)
            | RoundError::ScoreOverflow => ServiceError::InvalidInput(err.to_string()),
        }
    }
}

impl From<SetupError> for ServiceError {
    fn from(err: SetupError) -> Self {
        match err {
            SetupError::EmptyPalette => ServiceError::Internal(err.to_string()),
            _ => ServiceError::InvalidInput(err.to_string()),
        }
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(err: InvalidTransition) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

impl From<ApplyError> for ServiceError {
    fn from(err: ApplyError) -> Self {
        ServiceError::Internal(err.to_string())
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
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Input understood but refused, with per-field messages.
    #[error("unprocessable: {message}")]
    Unprocessable {
        message: String,
        fields: IndexMap<String, String>,
    },
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::RoundRejected { message, fields } => {
                AppError::Unprocessable { message, fields }
            }
            ServiceError::Internal(message) => AppError::Internal(message),
        }
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub message: String,
    /// Per-player messages keyed by player id, for rejected rounds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, fields) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message, None),
            AppError::Unprocessable { message, fields } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, Some(fields))
            }
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
        };

        (status, Json(ErrorBody { message, fields })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        round::ScoreIssue,
        state_machine::{GameEvent, GamePhase},
    };

    #[test]
    fn score_issues_become_field_messages() {
        let mut issues = IndexMap::new();
        issues.insert("player-1".to_string(), ScoreIssue::Required);
        issues.insert("player-2".to_string(), ScoreIssue::Invalid);

        let ServiceError::RoundRejected { fields, .. } =
            ServiceError::from(RoundError::InvalidScores(issues))
        else {
            panic!("expected a rejected round");
        };
        assert_eq!(fields["player-1"], "Score required");
        assert_eq!(fields["player-2"], "Must be a non-negative number");
    }

    #[test]
    fn round_errors_map_to_statuses() {
        let missing = AppError::from(ServiceError::from(RoundError::MissingWinner));
        assert_eq!(missing.into_response().status(), StatusCode::BAD_REQUEST);

        let closed = AppError::from(ServiceError::from(RoundError::NotInProgress(
            GamePhase::Finished,
        )));
        assert_eq!(closed.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn lifecycle_errors_map_to_statuses() {
        let refused = AppError::from(ServiceError::from(InvalidTransition {
            from: GamePhase::Setup,
            event: GameEvent::SubmitRound,
        }));
        assert_eq!(refused.into_response().status(), StatusCode::CONFLICT);

        let broken = AppError::from(ServiceError::from(ApplyError {
            from: GamePhase::Setup,
            event: GameEvent::Start,
            actual: GamePhase::Setup,
        }));
        assert_eq!(
            broken.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
