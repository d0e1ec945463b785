//! Forum endpoints

use crate::forum::{CommentInput, ForumComment, ForumPost, PostInput};
use crate::{ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

/// GET /api/forum/posts
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<ForumPost>>> {
    Ok(Json(state.forum.list_all().await?))
}

/// POST /api/forum/posts
pub async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<PostInput>,
) -> ApiResult<(StatusCode, Json<ForumPost>)> {
    let post = state.forum.create_post(input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/forum/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ForumPost>> {
    Ok(Json(state.forum.get_post(id).await?))
}

/// DELETE /api/forum/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.forum.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/forum/posts/:id/comments
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CommentInput>,
) -> ApiResult<(StatusCode, Json<ForumComment>)> {
    let comment = state.forum.add_comment(id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/users/:id/posts
pub async fn list_user_posts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<ForumPost>>> {
    Ok(Json(state.forum.list_by_user(id).await?))
}

/// Build forum routes
pub fn forum_routes() -> Router<AppState> {
    Router::new()
        .route("/api/forum/posts", get(list_posts).post(create_post))
        .route("/api/forum/posts/:id", get(get_post).delete(delete_post))
        .route("/api/forum/posts/:id/comments", post(add_comment))
        .route("/api/users/:id/posts", get(list_user_posts))
}
