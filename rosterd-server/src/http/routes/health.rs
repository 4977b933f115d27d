//! Health check endpoint
//!
//! GET /health reports one of three states: the pool is still
//! initializing (503), a trivial query succeeds (200, connected), or the
//! query fails (503, disconnected, with the driver message). Read-only,
//! no side effects beyond the probe query.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Response {
    let Some(pool) = state.pool().await else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "initializing",
                "message": "database pool is not ready yet"
            })),
        )
            .into_response();
    };

    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "connected" })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "database": "disconnected",
                "error": err.to_string()
            })),
        )
            .into_response(),
    }
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn reports_initializing_before_pool_construction() {
        let state = Arc::new(AppState::uninitialized());
        let response = health(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "initializing");
        assert!(body["message"].is_string());
    }
}
