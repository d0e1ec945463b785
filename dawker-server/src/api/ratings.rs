//! DAW rating endpoints

use crate::ratings::{RatingInput, RatingsPage};
use crate::{ApiResult, AppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// GET /api/daws/:id/ratings
pub async fn get_ratings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RatingsPage>> {
    Ok(Json(state.ratings.page(&id).await?))
}

/// POST /api/daws/:id/ratings
pub async fn rate_daw(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RatingInput>,
) -> ApiResult<Json<RatingsPage>> {
    Ok(Json(state.ratings.rate(&id, input).await?))
}

/// Build rating routes
pub fn rating_routes() -> Router<AppState> {
    Router::new().route("/api/daws/:id/ratings", get(get_ratings).post(rate_daw))
}
