//! User persistence

use crate::users::User;
use dawker_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

const USER_COLUMNS: &str = "id, username, email, role, created_at";

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        role: row.try_get("role")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Insert a user and return the stored record
pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
    role: &str,
) -> Result<User> {
    let id = sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash, role)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .execute(pool)
    .await?
    .last_insert_rowid();

    let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_one(pool)
        .await?;

    user_from_row(&row)
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
        .fetch_all(pool)
        .await?;

    rows.iter().map(user_from_row).collect()
}

/// User and stored PHC password hash for a login email
pub async fn find_credentials(pool: &SqlitePool, email: &str) -> Result<Option<(User, String)>> {
    let row = sqlx::query(&format!(
        "SELECT {}, password_hash FROM users WHERE email = ?",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let user = user_from_row(&row)?;
            let password_hash: String = row.try_get("password_hash")?;
            Ok(Some((user, password_hash)))
        }
        None => Ok(None),
    }
}

/// Which unique field, if any, is already taken
pub async fn find_taken_field(
    pool: &SqlitePool,
    username: &str,
    email: &str,
) -> Result<Option<&'static str>> {
    let username_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
            .bind(username)
            .fetch_one(pool)
            .await?;
    if username_taken {
        return Ok(Some("username"));
    }

    let email_taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(email)
        .fetch_one(pool)
        .await?;
    if email_taken {
        return Ok(Some("email"));
    }

    Ok(None)
}

pub async fn user_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
    let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(exists)
}

/// Delete a user; owned projects and notes go with it
///
/// Returns false if the user does not exist.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}
