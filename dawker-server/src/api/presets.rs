//! Gear catalog and preset endpoints

use crate::presets::{GearItem, GearUsage, NewGearItem, Preset, PresetInput, DEFAULT_POPULAR_LIMIT};
use crate::{ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<i64>,
}

/// GET /api/gear
pub async fn list_gear(State(state): State<AppState>) -> ApiResult<Json<Vec<GearItem>>> {
    Ok(Json(state.presets.list_gear_items().await?))
}

/// POST /api/gear
pub async fn add_gear(
    State(state): State<AppState>,
    Json(item): Json<NewGearItem>,
) -> ApiResult<(StatusCode, Json<GearItem>)> {
    let gear = state.presets.add_gear_item(item).await?;
    Ok((StatusCode::CREATED, Json(gear)))
}

/// GET /api/gear/popular?limit=N
pub async fn popular_gear(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> ApiResult<Json<Vec<GearUsage>>> {
    let limit = query.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    Ok(Json(state.presets.most_popular_gear(limit).await?))
}

/// POST /api/presets
pub async fn create_preset(
    State(state): State<AppState>,
    Json(input): Json<PresetInput>,
) -> ApiResult<(StatusCode, Json<Preset>)> {
    let preset = state.presets.create(input).await?;
    Ok((StatusCode::CREATED, Json(preset)))
}

/// GET /api/presets/:id
pub async fn get_preset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Preset>> {
    Ok(Json(state.presets.get(id).await?))
}

/// PUT /api/presets/:id
pub async fn update_preset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PresetInput>,
) -> ApiResult<Json<Preset>> {
    Ok(Json(state.presets.update(id, input).await?))
}

/// DELETE /api/presets/:id
pub async fn delete_preset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.presets.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/:id/presets
pub async fn list_user_presets(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Preset>>> {
    Ok(Json(state.presets.list_by_user(id).await?))
}

/// Build gear and preset routes
pub fn preset_routes() -> Router<AppState> {
    Router::new()
        .route("/api/gear", get(list_gear).post(add_gear))
        .route("/api/gear/popular", get(popular_gear))
        .route("/api/presets", post(create_preset))
        .route(
            "/api/presets/:id",
            get(get_preset).put(update_preset).delete(delete_preset),
        )
        .route("/api/users/:id/presets", get(list_user_presets))
}
