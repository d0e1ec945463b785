//! DAW endpoints
//!
//! `PUT /api/daws` takes a full tree snapshot. Existing projects must carry
//! the `version` they were read at; a stale version answers 409.

use crate::daw::{CreateDawRequest, DawProject, DawSnapshot, DawSummary};
use crate::{ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

/// POST /api/daws
pub async fn create_daw(
    State(state): State<AppState>,
    Json(request): Json<CreateDawRequest>,
) -> ApiResult<(StatusCode, Json<DawProject>)> {
    let daw = state.daws.create(request.user_id, &request.name).await?;
    Ok((StatusCode::CREATED, Json(daw)))
}

/// GET /api/daws
pub async fn list_daws(State(state): State<AppState>) -> ApiResult<Json<Vec<DawProject>>> {
    Ok(Json(state.daws.list_all().await?))
}

/// PUT /api/daws
pub async fn save_daw(
    State(state): State<AppState>,
    Json(snapshot): Json<DawSnapshot>,
) -> ApiResult<Json<DawProject>> {
    Ok(Json(state.daws.save(snapshot).await?))
}

/// GET /api/daws/:id
pub async fn get_daw(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DawProject>> {
    Ok(Json(state.daws.get_by_id(&id).await?))
}

/// DELETE /api/daws/:id
pub async fn delete_daw(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.daws.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/daws/:id/exports
pub async fn record_export(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DawSummary>> {
    Ok(Json(state.daws.record_export(&id).await?))
}

/// Build DAW routes
pub fn daw_routes() -> Router<AppState> {
    Router::new()
        .route("/api/daws", get(list_daws).post(create_daw).put(save_daw))
        .route("/api/daws/:id", get(get_daw).delete(delete_daw))
        .route("/api/daws/:id/exports", post(record_export))
}
