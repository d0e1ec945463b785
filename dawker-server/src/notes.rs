//! Session notes attached to a user

use crate::db::{self, notes as store, users};
use dawker_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionNote {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub updated_at: String,
}

/// Note as submitted: without `id` it is created, with `id` it is updated
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Clone)]
pub struct NoteService {
    pool: SqlitePool,
}

impl NoteService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a note, or update one the same user owns
    pub async fn save_or_update(&self, input: NoteInput) -> Result<SessionNote> {
        let mut tx = db::begin_write(&self.pool).await?;

        if !users::user_exists(&mut *tx, input.user_id).await? {
            return Err(Error::not_found("User", input.user_id));
        }

        let id = match input.id {
            Some(id) => {
                let existing = store::get_note(&mut *tx, id)
                    .await?
                    .ok_or_else(|| Error::not_found("Note", id))?;
                if existing.user_id != input.user_id {
                    return Err(Error::InvalidInput(format!(
                        "Note {} is owned by user {}, not user {}",
                        id, existing.user_id, input.user_id
                    )));
                }

                if !store::update_note(&mut *tx, id, input.user_id, &input.title, &input.content)
                    .await?
                {
                    return Err(Error::not_found("Note", id));
                }
                id
            }
            None => store::insert_note(&mut *tx, input.user_id, &input.title, &input.content).await?,
        };

        let note = store::get_note(&mut *tx, id)
            .await?
            .ok_or_else(|| Error::not_found("Note", id))?;
        tx.commit().await?;

        Ok(note)
    }

    pub async fn get(&self, id: i64) -> Result<SessionNote> {
        let mut conn = self.pool.acquire().await?;
        store::get_note(&mut *conn, id)
            .await?
            .ok_or_else(|| Error::not_found("Note", id))
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<SessionNote>> {
        store::list_notes_by_user(&self.pool, user_id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !store::delete_note(&self.pool, id).await? {
            return Err(Error::not_found("Note", id));
        }
        Ok(())
    }
}
