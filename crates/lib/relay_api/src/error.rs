//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_core::assistant::AssistantError;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Assistant run failed")]
    RunFailed,

    #[error("Assistant returned an empty reply")]
    EmptyReply,

    #[error("Timed out waiting for assistant")]
    Timeout,

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::RunFailed | AppError::EmptyReply | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let error = match self {
            AppError::Validation(m) | AppError::Internal(m) => m,
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<AssistantError> for AppError {
    fn from(e: AssistantError) -> Self {
        match e {
            AssistantError::RunFailed { .. } => AppError::RunFailed,
            AssistantError::EmptyReply => AppError::EmptyReply,
            AssistantError::TimedOut(_) => AppError::Timeout,
            AssistantError::Transport(_)
            | AssistantError::Api { .. }
            | AssistantError::Decode(_) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use relay_core::assistant::RunStatus;

    use super::*;

    #[test]
    fn run_states_map_to_fixed_messages() {
        let failed = AppError::from(AssistantError::RunFailed {
            status: RunStatus::Failed,
            reason: Some("quota".into()),
        });
        assert!(matches!(failed, AppError::RunFailed));
        assert_eq!(failed.to_string(), "Assistant run failed");

        let timed_out = AppError::from(AssistantError::TimedOut(Duration::from_secs(1)));
        assert!(matches!(timed_out, AppError::Timeout));
    }

    #[test]
    fn other_errors_keep_their_description() {
        let err = AppError::from(AssistantError::Api {
            status: 401,
            message: "Incorrect API key provided".into(),
        });
        assert_eq!(
            err.to_string(),
            "Assistant API error (401): Incorrect API key provided"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Timeout.into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::RunFailed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
