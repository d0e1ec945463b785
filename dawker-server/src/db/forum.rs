//! Forum post and comment persistence

use crate::forum::{ForumComment, ForumPost, PostType};
use dawker_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{Row, SqliteConnection, SqlitePool};

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.user_id, u.username AS author, c.content, c.created_at
    FROM forum_comments c
    JOIN users u ON u.id = c.user_id
"#;

fn comment_from_row(row: &SqliteRow) -> Result<ForumComment> {
    Ok(ForumComment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        user_id: row.try_get("user_id")?,
        author: row.try_get("author")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn insert_post(
    conn: &mut SqliteConnection,
    user_id: i64,
    title: &str,
    description: &str,
    post_type: PostType,
    tags: &[String],
) -> Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO forum_posts (user_id, title, description, post_type, tags)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(post_type.as_str())
    .bind(Json(tags))
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Load a post with its comments, oldest comment first
pub async fn load_post(conn: &mut SqliteConnection, id: i64) -> Result<Option<ForumPost>> {
    let row = sqlx::query(
        r#"
        SELECT p.id, p.user_id, u.username AS author, p.title, p.description,
               p.post_type, p.tags, p.created_at
        FROM forum_posts p
        JOIN users u ON u.id = p.user_id
        WHERE p.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let row = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let comment_rows = sqlx::query(&format!("{} WHERE c.post_id = ? ORDER BY c.id", COMMENT_SELECT))
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;
    let comments = comment_rows
        .iter()
        .map(comment_from_row)
        .collect::<Result<Vec<_>>>()?;

    let post_type: String = row.try_get("post_type")?;
    let tags: Json<Vec<String>> = row.try_get("tags")?;

    Ok(Some(ForumPost {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        author: row.try_get("author")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        post_type: post_type.parse()?,
        tags: tags.0,
        created_at: row.try_get("created_at")?,
        comments,
    }))
}

/// Post ids, newest first, optionally limited to one author
pub async fn list_post_ids(conn: &mut SqliteConnection, user_id: Option<i64>) -> Result<Vec<i64>> {
    let ids = match user_id {
        Some(user_id) => {
            sqlx::query_scalar("SELECT id FROM forum_posts WHERE user_id = ? ORDER BY id DESC")
                .bind(user_id)
                .fetch_all(&mut *conn)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT id FROM forum_posts ORDER BY id DESC")
                .fetch_all(&mut *conn)
                .await?
        }
    };

    Ok(ids)
}

pub async fn post_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
    let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM forum_posts WHERE id = ?)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(exists)
}

pub async fn insert_comment(
    conn: &mut SqliteConnection,
    post_id: i64,
    user_id: i64,
    content: &str,
) -> Result<ForumComment> {
    let id = sqlx::query("INSERT INTO forum_comments (post_id, user_id, content) VALUES (?, ?, ?)")
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

    let row = sqlx::query(&format!("{} WHERE c.id = ?", COMMENT_SELECT))
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    comment_from_row(&row)
}

/// Delete a post and its comments. Returns false if it does not exist.
pub async fn delete_post(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM forum_posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}
