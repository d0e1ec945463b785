//! DAW rating persistence

use crate::ratings::{Rating, RatingsPage};
use dawker_common::Result;
use sqlx::{Row, SqliteConnection};

/// Insert the user's rating for a project, or overwrite their earlier one
pub async fn upsert_rating(
    conn: &mut SqliteConnection,
    daw_id: &str,
    user_id: i64,
    rating: f64,
    comment: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO daw_ratings (daw_id, user_id, rating, comment)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (daw_id, user_id) DO UPDATE SET
            rating = excluded.rating,
            comment = excluded.comment,
            created_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(daw_id)
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Every rating of a project, oldest first, with the average
pub async fn load_page(conn: &mut SqliteConnection, daw_id: &str) -> Result<RatingsPage> {
    let rows = sqlx::query(
        r#"
        SELECT r.id, r.daw_id, r.user_id, u.username, r.rating, r.comment, r.created_at
        FROM daw_ratings r
        JOIN users u ON u.id = r.user_id
        WHERE r.daw_id = ?
        ORDER BY r.id
        "#,
    )
    .bind(daw_id)
    .fetch_all(&mut *conn)
    .await?;

    let comments = rows
        .iter()
        .map(|row| {
            Ok(Rating {
                id: row.try_get("id")?,
                daw_id: row.try_get("daw_id")?,
                user_id: row.try_get("user_id")?,
                username: row.try_get("username")?,
                rating: row.try_get("rating")?,
                comment: row.try_get("comment")?,
                created_at: row.try_get("created_at")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RatingsPage::from_ratings(daw_id, comments))
}
