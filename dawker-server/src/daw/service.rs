//! DAW service: create, load, list, save, delete, export
//!
//! Saving runs in one transaction:
//! 1. Resolve the owner (NotFound if missing)
//! 2. Resolve the project by id (NotFound if missing) or create a new root
//! 3. Overwrite name and description, guarded by the version token
//! 4. Reconcile ids, delete the stored subtree and insert the incoming one
//! 5. Commit and return the tree with every id assigned
//!
//! Any error drops the transaction, which rolls back everything in it.

use super::events::{DawEvents, TracingEvents};
use super::model::{DawProject, DawSnapshot, DawSummary};
use super::reconcile::{self, ReconcilePlan};
use crate::db::{self, daws, users};
use dawker_common::{Error, Result};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct DawService {
    pool: SqlitePool,
    events: Arc<dyn DawEvents>,
}

impl DawService {
    pub fn new(pool: SqlitePool, events: Arc<dyn DawEvents>) -> Self {
        Self { pool, events }
    }

    /// Service reporting through `tracing`
    pub fn with_tracing(pool: SqlitePool) -> Self {
        Self::new(pool, Arc::new(TracingEvents))
    }

    /// Create an empty project for an existing user
    pub async fn create(&self, user_id: i64, name: &str) -> Result<DawProject> {
        let name = validate_name(name)?;

        let mut tx = db::begin_write(&self.pool).await?;
        if !users::user_exists(&mut *tx, user_id).await? {
            return Err(Error::not_found("User", user_id));
        }

        let daw = DawProject::new(user_id, name);
        daws::insert_root(&mut *tx, &daw).await?;
        tx.commit().await?;

        self.events.created(&daw.summary());
        Ok(daw)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<DawProject> {
        let mut conn = self.pool.acquire().await?;
        daws::load_daw(&mut *conn, id)
            .await?
            .ok_or_else(|| Error::not_found("DAW", id))
    }

    /// Summaries of a user's projects; NotFound for an unknown user
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<DawSummary>> {
        let mut conn = self.pool.acquire().await?;
        if !users::user_exists(&mut *conn, user_id).await? {
            return Err(Error::not_found("User", user_id));
        }

        daws::list_summaries_by_user(&mut *conn, user_id).await
    }

    /// Every project as a full tree
    pub async fn list_all(&self) -> Result<Vec<DawProject>> {
        let mut conn = self.pool.acquire().await?;
        let ids = daws::list_ids(&mut *conn).await?;

        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            // A project deleted between the two reads is skipped
            if let Some(daw) = daws::load_daw(&mut *conn, &id).await? {
                projects.push(daw);
            }
        }

        Ok(projects)
    }

    /// Merge a submitted snapshot into storage
    pub async fn save(&self, snapshot: DawSnapshot) -> Result<DawProject> {
        let target = snapshot.target_id().map(str::to_string);

        match self.save_snapshot(snapshot, target.as_deref()).await {
            Ok((daw, plan)) => {
                self.events.saved(&daw.summary(), plan.as_ref());
                Ok(daw)
            }
            Err(e) => {
                self.events.save_rejected(target.as_deref(), &e);
                Err(e)
            }
        }
    }

    async fn save_snapshot(
        &self,
        snapshot: DawSnapshot,
        target: Option<&str>,
    ) -> Result<(DawProject, Option<ReconcilePlan>)> {
        let name = validate_name(&snapshot.name)?.to_string();

        let mut tx = db::begin_write(&self.pool).await?;

        if !users::user_exists(&mut *tx, snapshot.user_id).await? {
            return Err(Error::not_found("User", snapshot.user_id));
        }

        let mut daw = match target {
            Some(id) => {
                let existing = daws::load_daw(&mut *tx, id)
                    .await?
                    .ok_or_else(|| Error::not_found("DAW", id))?;

                if existing.user_id != snapshot.user_id {
                    return Err(Error::InvalidInput(format!(
                        "DAW {} is owned by user {}, not user {}",
                        id, existing.user_id, snapshot.user_id
                    )));
                }

                let expected = snapshot.version.ok_or_else(|| {
                    Error::Conflict(format!("Saving DAW {} requires its current version", id))
                })?;
                let stale = || {
                    Error::Conflict(format!(
                        "DAW {} is at version {}, save was based on version {}",
                        id, existing.version, expected
                    ))
                };
                if expected != existing.version {
                    return Err(stale());
                }

                let version = daws::update_root(
                    &mut *tx,
                    id,
                    &name,
                    snapshot.description.as_deref(),
                    expected,
                )
                .await?
                .ok_or_else(stale)?;

                DawProject {
                    name,
                    description: snapshot.description,
                    version,
                    ..existing
                }
            }
            None => {
                let mut daw = DawProject::new(snapshot.user_id, name);
                daw.description = snapshot.description;
                daws::insert_root(&mut *tx, &daw).await?;
                daw
            }
        };

        let plan = match snapshot.configs {
            Some(mut incoming) => {
                let plan = reconcile::plan(&daw.configs, &incoming);
                plan.apply(&mut incoming);
                daw.replace_configs(incoming);
                daws::replace_subtree(&mut *tx, &daw.id, &mut daw.configs).await?;
                Some(plan)
            }
            None => None,
        };

        tx.commit().await?;

        Ok((daw, plan))
    }

    /// Delete a project and its subtree
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !daws::delete_daw(&self.pool, id).await? {
            return Err(Error::not_found("DAW", id));
        }

        self.events.deleted(id);
        Ok(())
    }

    /// Count one export of a project
    pub async fn record_export(&self, id: &str) -> Result<DawSummary> {
        let mut tx = db::begin_write(&self.pool).await?;
        if !daws::increment_export(&mut *tx, id).await? {
            return Err(Error::not_found("DAW", id));
        }

        let summary = daws::load_summary(&mut *tx, id)
            .await?
            .ok_or_else(|| Error::not_found("DAW", id))?;
        tx.commit().await?;

        self.events.exported(&summary);
        Ok(summary)
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("DAW name must not be blank".to_string()));
    }
    Ok(trimmed)
}
