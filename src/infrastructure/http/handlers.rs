//! `/users` endpoints.
//!
//! Each handler is a thin mapping onto one `UserService` call.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use crate::domain::models::{EntityId, User};
use crate::services::{CacheStatsSnapshot, UserService};

/// Shared handler state.
pub type AppState = Arc<UserService>;

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveUserRequest {
    /// Existing key to overwrite; omitted to let the store assign one.
    #[serde(default)]
    pub id: Option<i64>,
    /// Display name, must not be blank.
    pub name: String,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
}

impl TryFrom<SaveUserRequest> for User {
    type Error = ApiError;

    fn try_from(req: SaveUserRequest) -> Result<Self, Self::Error> {
        Ok(User {
            id: req.id.map(EntityId::new).transpose()?,
            name: req.name,
            email: req.email,
            created_at: None,
            updated_at: None,
        })
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the handler runs.
    pub status: String,
    /// Current cache counters.
    pub cache: CacheStatsSnapshot,
}

/// `GET /users/{id}`: 200 with the user, 404 when absent.
pub async fn get_user(
    State(service): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id: EntityId = raw_id.parse()?;
    service.get(id).await?.map(Json).ok_or(ApiError::NotFound(id))
}

/// `POST /users`: 201 with the stored user.
///
/// Body rejections are reported through [`ApiError`] so they carry the same
/// JSON error shape as every other failure.
pub async fn save_user(
    State(service): State<AppState>,
    body: Result<Json<SaveUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(request) = body?;
    let user = User::try_from(request)?;
    let saved = service.save(user).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// `DELETE /users/{id}`: 204 whether or not the user existed.
pub async fn delete_user(
    State(service): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: EntityId = raw_id.parse()?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /health`: liveness plus cache counters.
pub async fn health(State(service): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        cache: service.stats(),
    })
}
