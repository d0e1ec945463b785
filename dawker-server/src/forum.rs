//! Community forum: posts and their comment threads

use crate::db::{self, forum as store, users};
use dawker_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostType {
    #[default]
    General,
    Help,
    Showcase,
    Collab,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::General => "GENERAL",
            PostType::Help => "HELP",
            PostType::Showcase => "SHOWCASE",
            PostType::Collab => "COLLAB",
        }
    }
}

impl FromStr for PostType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GENERAL" => Ok(PostType::General),
            "HELP" => Ok(PostType::Help),
            "SHOWCASE" => Ok(PostType::Showcase),
            "COLLAB" => Ok(PostType::Collab),
            other => Err(Error::Internal(format!("Unknown post type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumComment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    /// Username of the commenter
    pub author: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: i64,
    pub user_id: i64,
    pub author: String,
    pub title: String,
    pub description: String,
    pub post_type: PostType,
    pub tags: Vec<String>,
    pub created_at: String,
    pub comments: Vec<ForumComment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub post_type: PostType,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub user_id: i64,
    pub content: String,
}

#[derive(Clone)]
pub struct ForumService {
    pool: SqlitePool,
}

impl ForumService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_post(&self, input: PostInput) -> Result<ForumPost> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("Post title must not be blank".to_string()));
        }
        let tags = normalize_tags(&input.tags);

        let mut tx = db::begin_write(&self.pool).await?;
        if !users::user_exists(&mut *tx, input.user_id).await? {
            return Err(Error::not_found("User", input.user_id));
        }

        let id = store::insert_post(
            &mut *tx,
            input.user_id,
            title,
            input.description.trim(),
            input.post_type,
            &tags,
        )
        .await?;
        let post = store::load_post(&mut *tx, id)
            .await?
            .ok_or_else(|| Error::not_found("Forum post", id))?;
        tx.commit().await?;

        info!(post_id = id, user_id = input.user_id, "Created forum post '{}'", post.title);
        Ok(post)
    }

    pub async fn get_post(&self, id: i64) -> Result<ForumPost> {
        let mut conn = self.pool.acquire().await?;
        store::load_post(&mut *conn, id)
            .await?
            .ok_or_else(|| Error::not_found("Forum post", id))
    }

    /// Every post, newest first
    pub async fn list_all(&self) -> Result<Vec<ForumPost>> {
        self.load_posts(None).await
    }

    /// A user's posts, newest first; NotFound for an unknown user
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<ForumPost>> {
        {
            let mut conn = self.pool.acquire().await?;
            if !users::user_exists(&mut *conn, user_id).await? {
                return Err(Error::not_found("User", user_id));
            }
        }

        self.load_posts(Some(user_id)).await
    }

    async fn load_posts(&self, user_id: Option<i64>) -> Result<Vec<ForumPost>> {
        let mut conn = self.pool.acquire().await?;
        let ids = store::list_post_ids(&mut *conn, user_id).await?;

        let mut posts = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(post) = store::load_post(&mut *conn, id).await? {
                posts.push(post);
            }
        }

        Ok(posts)
    }

    pub async fn add_comment(&self, post_id: i64, input: CommentInput) -> Result<ForumComment> {
        let content = input.content.trim();
        if content.is_empty() {
            return Err(Error::InvalidInput("Comment must not be blank".to_string()));
        }

        let mut tx = db::begin_write(&self.pool).await?;
        if !store::post_exists(&mut *tx, post_id).await? {
            return Err(Error::not_found("Forum post", post_id));
        }
        if !users::user_exists(&mut *tx, input.user_id).await? {
            return Err(Error::not_found("User", input.user_id));
        }

        let comment = store::insert_comment(&mut *tx, post_id, input.user_id, content).await?;
        tx.commit().await?;

        info!(post_id, comment_id = comment.id, user_id = input.user_id, "Added forum comment");
        Ok(comment)
    }

    /// Delete a post with its comments
    pub async fn delete_post(&self, id: i64) -> Result<()> {
        if !store::delete_post(&self.pool, id).await? {
            return Err(Error::not_found("Forum post", id));
        }

        info!(post_id = id, "Deleted forum post");
        Ok(())
    }
}

/// Trim, drop blanks and repeats, keep first-seen order
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !seen.iter().any(|s| s == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}
