//! Users endpoints
//!
//! GET /users lists at most 100 records in ascending id order;
//! POST /users validates and inserts a single record. Validation runs
//! before any pool access, so a rejected request performs no write.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::UserRepo;
use crate::http::error::ApiError;
use crate::models::{NewUser, User};
use crate::state::AppState;

/// Create user request. Fields default to empty so missing keys reach
/// validation (and its 400) instead of a deserialization rejection.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// GET /users - list users (ascending id, max 100)
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let pool = state.pool().await.ok_or_else(ApiError::unavailable)?;
    let users = UserRepo::new(&pool).list().await?;
    Ok(Json(users))
}

/// POST /users - create a user
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let new_user = NewUser::new(req.name, req.email)?;
    let pool = state.pool().await.ok_or_else(ApiError::unavailable)?;
    let user = UserRepo::new(&pool).create(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users", get(list_users).post(create_user))
}
