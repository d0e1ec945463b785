//! Star ratings of DAW projects
//!
//! Each user holds at most one rating per project; rating again replaces the
//! earlier score and comment. The page average is over current ratings only.

use crate::db::{self, daws, ratings as store, users};
use dawker_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

/// Highest allowed score; the lowest is 0
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i64,
    pub daw_id: String,
    pub user_id: i64,
    pub username: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsPage {
    pub daw_id: String,
    /// Mean of all ratings, 0 when there are none
    pub rating: f64,
    pub count: usize,
    pub comments: Vec<Rating>,
}

impl RatingsPage {
    pub fn from_ratings(daw_id: &str, comments: Vec<Rating>) -> Self {
        let rating = if comments.is_empty() {
            0.0
        } else {
            comments.iter().map(|c| c.rating).sum::<f64>() / comments.len() as f64
        };

        Self {
            daw_id: daw_id.to_string(),
            rating,
            count: comments.len(),
            comments,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingInput {
    pub user_id: i64,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

#[derive(Clone)]
pub struct RatingService {
    pool: SqlitePool,
}

impl RatingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a user's rating and return the updated page
    pub async fn rate(&self, daw_id: &str, input: RatingInput) -> Result<RatingsPage> {
        if !(0.0..=MAX_RATING).contains(&input.rating) {
            return Err(Error::InvalidInput(format!(
                "Rating must be between 0 and {}, got {}",
                MAX_RATING, input.rating
            )));
        }

        let mut tx = db::begin_write(&self.pool).await?;
        if daws::load_summary(&mut *tx, daw_id).await?.is_none() {
            return Err(Error::not_found("DAW", daw_id));
        }
        if !users::user_exists(&mut *tx, input.user_id).await? {
            return Err(Error::not_found("User", input.user_id));
        }

        store::upsert_rating(&mut *tx, daw_id, input.user_id, input.rating, input.comment.trim())
            .await?;
        let page = store::load_page(&mut *tx, daw_id).await?;
        tx.commit().await?;

        info!(daw_id, user_id = input.user_id, average = page.rating, "Rated DAW");
        Ok(page)
    }

    /// Ratings of an existing project
    pub async fn page(&self, daw_id: &str) -> Result<RatingsPage> {
        let mut conn = self.pool.acquire().await?;
        if daws::load_summary(&mut *conn, daw_id).await?.is_none() {
            return Err(Error::not_found("DAW", daw_id));
        }

        store::load_page(&mut *conn, daw_id).await
    }
}
