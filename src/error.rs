// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("No authenticated principal")]
    NotAuthenticated,

    #[error("Onboarding not complete")]
    OnboardingRequired,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Write rejected: {0}")]
    Persistence(String),

    #[error("Summary aggregation failed: {0}")]
    Aggregation(#[source] Box<AppError>),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap the first error observed during a fan-out read.
    /// Already-wrapped errors pass through unchanged so nested calls stay flat.
    pub fn aggregation(err: AppError) -> Self {
        match err {
            AppError::Aggregation(_) => err,
            other => AppError::Aggregation(Box::new(other)),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, "auth_failed", Some(msg.clone())),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "not_authenticated", None),
            AppError::OnboardingRequired => (StatusCode::FORBIDDEN, "onboarding_required", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Persistence(msg) => {
                tracing::error!(error = %msg, "Write rejected");
                (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error", None)
            }
            AppError::Aggregation(source) => {
                tracing::error!(error = %source, "Summary aggregation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "aggregation_error",
                    None,
                )
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_wraps_first_error() {
        let err = AppError::aggregation(AppError::Database("read failed".to_string()));
        assert!(matches!(err, AppError::Aggregation(_)));
    }

    #[test]
    fn test_aggregation_does_not_double_wrap() {
        let inner = AppError::aggregation(AppError::Database("read failed".to_string()));
        let outer = AppError::aggregation(inner);
        match outer {
            AppError::Aggregation(source) => {
                assert!(matches!(*source, AppError::Database(_)));
            }
            other => panic!("expected Aggregation, got {other:?}"),
        }
    }
}
