//! User endpoints

use crate::daw::DawSummary;
use crate::notes::SessionNote;
use crate::users::{LoginRequest, RegisterRequest, User};
use crate::{ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

/// POST /api/users
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.users.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list().await?))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.get(id).await?))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/auth
pub async fn authenticate(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users.authenticate(request).await?))
}

/// GET /api/users/:id/daws
pub async fn list_user_daws(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<DawSummary>>> {
    Ok(Json(state.daws.list_by_user(id).await?))
}

/// GET /api/users/:id/notes
pub async fn list_user_notes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<SessionNote>>> {
    Ok(Json(state.notes.list_by_user(id).await?))
}

/// Build user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(register_user))
        .route("/api/users/auth", post(authenticate))
        .route("/api/users/:id", get(get_user).delete(delete_user))
        .route("/api/users/:id/daws", get(list_user_daws))
        .route("/api/users/:id/notes", get(list_user_notes))
}
