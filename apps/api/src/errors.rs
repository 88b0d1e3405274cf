use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::resume::validation::ValidationErrors;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Completion API or blob store failure. The detail is logged, never returned.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Unauthorized => json!({
                "error": { "code": "UNAUTHORIZED", "message": "Authentication required" }
            }),
            AppError::NotFound(msg) => json!({
                "error": { "code": "NOT_FOUND", "message": msg }
            }),
            AppError::Validation(errors) => json!({
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": errors.to_string(),
                    "fields": errors.fields(),
                }
            }),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                json!({
                    "error": {
                        "code": "UPSTREAM_ERROR",
                        "message": "An external service failed. Please try again."
                    }
                })
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                json!({
                    "error": { "code": "DATABASE_ERROR", "message": "A database error occurred" }
                })
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                json!({
                    "error": {
                        "code": "INTERNAL_ERROR",
                        "message": "An internal server error occurred"
                    }
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
