//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes:
//! input validation is 400 and user-correctable, a missing pool is 503 and
//! safe to retry, store failures are 500 with the driver message passed
//! through as a diagnostic. Nothing escapes a handler uncaught.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Pool not initialized yet (503)
    Unavailable { message: &'static str },

    /// Database error (500, logged, driver message surfaced)
    Database(DbError),
}

impl ApiError {
    /// The pool has not finished initializing.
    pub fn unavailable() -> Self {
        Self::Unavailable {
            message: "database not ready",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": e.to_string() }),
            ),
            Self::Unavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": message }),
            ),
            Self::Database(DbError::Sqlx(e)) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "db error",
                        "details": e.to_string()
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn validation_error_is_400_with_wire_message() {
        let err = ApiError::Validation(ValidationError::MissingUserFields);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "name & email required");
    }

    #[tokio::test]
    async fn unavailable_is_503() {
        let response = ApiError::unavailable().into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn database_error_is_500_with_details() {
        let err = ApiError::Database(DbError::Sqlx(sqlx::Error::PoolClosed));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "db error");
        assert!(body["details"].is_string());
    }
}
