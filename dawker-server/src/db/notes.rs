//! Session note persistence

use crate::notes::SessionNote;
use dawker_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

const NOTE_COLUMNS: &str = "id, user_id, title, content, updated_at";

fn note_from_row(row: &SqliteRow) -> Result<SessionNote> {
    Ok(SessionNote {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn get_note(conn: &mut SqliteConnection, id: i64) -> Result<Option<SessionNote>> {
    let row = sqlx::query(&format!("SELECT {} FROM session_notes WHERE id = ?", NOTE_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(note_from_row).transpose()
}

pub async fn list_notes_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<SessionNote>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM session_notes WHERE user_id = ? ORDER BY id",
        NOTE_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(note_from_row).collect()
}

pub async fn insert_note(
    conn: &mut SqliteConnection,
    user_id: i64,
    title: &str,
    content: &str,
) -> Result<i64> {
    let id = sqlx::query("INSERT INTO session_notes (user_id, title, content) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(title)
        .bind(content)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

    Ok(id)
}

/// Overwrite title and content of a note owned by `user_id`
///
/// Returns false if no such note belongs to that user.
pub async fn update_note(
    conn: &mut SqliteConnection,
    id: i64,
    user_id: i64,
    title: &str,
    content: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE session_notes
        SET title = ?, content = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(id)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn delete_note(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM session_notes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}
