//! Error types for the API surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur while handling an API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or incorrect shared secret.
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed request from the caller.
    #[error("{0}")]
    BadRequest(String),

    /// Scheduler error (including an already-running pass).
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] scheduler::SchedulerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Scheduler(scheduler::SchedulerError::PassInProgress) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::Scheduler(err) => {
                tracing::error!("Scheduler error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let resp = ApiError::Unauthorized.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = ApiError::BadRequest("missing body".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // An already-running pass is a conflict, not a server error.
        let resp = ApiError::Scheduler(scheduler::SchedulerError::PassInProgress).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = ApiError::Scheduler(scheduler::SchedulerError::Transport("down".to_string()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
