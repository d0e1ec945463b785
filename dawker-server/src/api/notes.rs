//! Session note endpoints

use crate::notes::{NoteInput, SessionNote};
use crate::{ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

/// POST /api/notes
pub async fn save_note(
    State(state): State<AppState>,
    Json(input): Json<NoteInput>,
) -> ApiResult<Json<SessionNote>> {
    Ok(Json(state.notes.save_or_update(input).await?))
}

/// GET /api/notes/:id
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SessionNote>> {
    Ok(Json(state.notes.get(id).await?))
}

/// DELETE /api/notes/:id
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.notes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build note routes
pub fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/api/notes", post(save_note))
        .route("/api/notes/:id", get(get_note).delete(delete_note))
}
