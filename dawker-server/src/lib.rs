//! dawker-server library
//!
//! HTTP backend for saving and sharing DAW rig configurations, plus the
//! community side around them: gear presets, the forum and project ratings.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod daw;
pub mod db;
pub mod error;
pub mod forum;
pub mod notes;
pub mod presets;
pub mod ratings;
pub mod users;

pub use error::{ApiError, ApiResult};

use daw::{DawEvents, DawService, TracingEvents};
use forum::ForumService;
use notes::NoteService;
use presets::PresetService;
use ratings::RatingService;
use users::UserService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, checked by the health endpoint
    pub db: SqlitePool,
    pub daws: DawService,
    pub users: UserService,
    pub notes: NoteService,
    pub presets: PresetService,
    pub forum: ForumService,
    pub ratings: RatingService,
}

impl AppState {
    /// Create application state with DAW events reported through `tracing`
    pub fn new(db: SqlitePool) -> Self {
        Self::with_events(db, Arc::new(TracingEvents))
    }

    /// Create application state with a custom DAW event observer
    pub fn with_events(db: SqlitePool, events: Arc<dyn DawEvents>) -> Self {
        Self {
            daws: DawService::new(db.clone(), events),
            users: UserService::new(db.clone()),
            notes: NoteService::new(db.clone()),
            presets: PresetService::new(db.clone()),
            forum: ForumService::new(db.clone()),
            ratings: RatingService::new(db.clone()),
            db,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::user_routes())
        .merge(api::daw_routes())
        .merge(api::note_routes())
        .merge(api::preset_routes())
        .merge(api::forum_routes())
        .merge(api::rating_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
