//! DAW aggregate persistence
//!
//! Functions taking `&mut SqliteConnection` work both on a pooled connection
//! and inside a transaction (`&mut *tx`), so the service decides the
//! transaction boundary.

use super::read_position;
use crate::daw::model::{Component, Config, DawProject, DawSummary, Parameters, Settings};
use chrono::{DateTime, Utc};
use dawker_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;

const SUMMARY_COLUMNS: &str =
    "id, user_id, name, description, created_at, export_count, version";

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid stored timestamp '{}': {}", text, e)))
}

fn summary_from_row(row: &SqliteRow) -> Result<DawSummary> {
    let created_at: String = row.try_get("created_at")?;

    Ok(DawSummary {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: parse_timestamp(&created_at)?,
        export_count: row.try_get("export_count")?,
        version: row.try_get("version")?,
    })
}

/// Load the root row only
pub async fn load_summary(conn: &mut SqliteConnection, id: &str) -> Result<Option<DawSummary>> {
    let row = sqlx::query(&format!("SELECT {} FROM daws WHERE id = ?", SUMMARY_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(summary_from_row).transpose()
}

/// Load a full aggregate, configs and components in position order
pub async fn load_daw(conn: &mut SqliteConnection, id: &str) -> Result<Option<DawProject>> {
    let summary = match load_summary(conn, id).await? {
        Some(summary) => summary,
        None => return Ok(None),
    };

    let configs = load_configs(conn, id).await?;

    Ok(Some(DawProject {
        id: summary.id,
        user_id: summary.user_id,
        name: summary.name,
        description: summary.description,
        created_at: summary.created_at,
        export_count: summary.export_count,
        version: summary.version,
        configs,
    }))
}

/// Load the config subtree of one project
pub async fn load_configs(conn: &mut SqliteConnection, daw_id: &str) -> Result<Vec<Config>> {
    let config_rows = sqlx::query(
        "SELECT id, name, position FROM daw_configs WHERE daw_id = ? ORDER BY position",
    )
    .bind(daw_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut configs = Vec::with_capacity(config_rows.len());
    let mut index_by_id = HashMap::with_capacity(config_rows.len());
    for row in &config_rows {
        let id: i64 = row.try_get("id")?;
        index_by_id.insert(id, configs.len());
        configs.push(Config {
            id: Some(id),
            name: row.try_get("name")?,
            position: read_position(row, "position")?,
            components: Vec::new(),
        });
    }

    let component_rows = sqlx::query(
        r#"
        SELECT c.id, c.config_id, c.instance_id, c.name, c.component_type, c.position,
               s.id AS settings_id, s.technology, s.export_name, s.parameters
        FROM daw_components c
        JOIN daw_configs g ON g.id = c.config_id
        JOIN component_settings s ON s.component_id = c.id
        WHERE g.daw_id = ?
        ORDER BY g.position, c.position
        "#,
    )
    .bind(daw_id)
    .fetch_all(&mut *conn)
    .await?;

    for row in &component_rows {
        let config_id: i64 = row.try_get("config_id")?;
        let parameters: Json<Parameters> = row.try_get("parameters")?;

        let component = Component {
            id: Some(row.try_get("id")?),
            instance_id: row.try_get("instance_id")?,
            name: row.try_get("name")?,
            component_type: row.try_get("component_type")?,
            position: read_position(row, "position")?,
            settings: Settings {
                id: Some(row.try_get("settings_id")?),
                technology: row.try_get("technology")?,
                export_name: row.try_get("export_name")?,
                parameters: parameters.0,
            },
        };

        let index = index_by_id.get(&config_id).copied().ok_or_else(|| {
            Error::Internal(format!("Component references unknown config {}", config_id))
        })?;
        configs[index].components.push(component);
    }

    Ok(configs)
}

/// Summaries of every project owned by a user, oldest first
pub async fn list_summaries_by_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<DawSummary>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM daws WHERE user_id = ? ORDER BY created_at, id",
        SUMMARY_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(summary_from_row).collect()
}

/// Ids of every project, oldest first
pub async fn list_ids(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar("SELECT id FROM daws ORDER BY created_at, id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(ids)
}

/// Insert a new root row
pub async fn insert_root(conn: &mut SqliteConnection, daw: &DawProject) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO daws (id, user_id, name, description, created_at, export_count, version)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&daw.id)
    .bind(daw.user_id)
    .bind(&daw.name)
    .bind(&daw.description)
    .bind(daw.created_at.to_rfc3339())
    .bind(daw.export_count)
    .bind(daw.version)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Update root fields if the stored version still matches
///
/// Returns the new version, or `None` when the row is gone or was changed
/// by someone else in the meantime.
pub async fn update_root(
    conn: &mut SqliteConnection,
    id: &str,
    name: &str,
    description: Option<&str>,
    expected_version: i64,
) -> Result<Option<i64>> {
    let result = sqlx::query(
        r#"
        UPDATE daws
        SET name = ?, description = ?, version = version + 1
        WHERE id = ? AND version = ?
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(id)
    .bind(expected_version)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        Ok(Some(expected_version + 1))
    } else {
        Ok(None)
    }
}

/// Delete the stored subtree and insert `configs` in its place
///
/// Nodes carrying an id are inserted under that id; the rest receive a
/// fresh one, written back into `configs`.
pub async fn replace_subtree(
    conn: &mut SqliteConnection,
    daw_id: &str,
    configs: &mut [Config],
) -> Result<()> {
    // Cascades to components and settings
    sqlx::query("DELETE FROM daw_configs WHERE daw_id = ?")
        .bind(daw_id)
        .execute(&mut *conn)
        .await?;

    for config in configs.iter_mut() {
        let config_id = sqlx::query(
            "INSERT INTO daw_configs (id, daw_id, name, position) VALUES (?, ?, ?, ?)",
        )
        .bind(config.id)
        .bind(daw_id)
        .bind(&config.name)
        .bind(i64::from(config.position))
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
        config.id = Some(config_id);

        for component in config.components.iter_mut() {
            insert_component(conn, config_id, component).await?;
        }
    }

    Ok(())
}

async fn insert_component(
    conn: &mut SqliteConnection,
    config_id: i64,
    component: &mut Component,
) -> Result<()> {
    let component_id = sqlx::query(
        r#"
        INSERT INTO daw_components (id, config_id, instance_id, name, component_type, position)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(component.id)
    .bind(config_id)
    .bind(&component.instance_id)
    .bind(&component.name)
    .bind(&component.component_type)
    .bind(i64::from(component.position))
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    component.id = Some(component_id);

    let settings = &mut component.settings;
    let settings_id = sqlx::query(
        r#"
        INSERT INTO component_settings (id, component_id, technology, export_name, parameters)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(settings.id)
    .bind(component_id)
    .bind(&settings.technology)
    .bind(&settings.export_name)
    .bind(Json(&settings.parameters))
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    settings.id = Some(settings_id);

    Ok(())
}

/// Increment the export counter and version
///
/// Returns false if the project does not exist.
pub async fn increment_export(conn: &mut SqliteConnection, id: &str) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE daws SET export_count = export_count + 1, version = version + 1 WHERE id = ?",
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Delete a project and its subtree
///
/// Returns false if the project does not exist.
pub async fn delete_daw(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM daws WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}
