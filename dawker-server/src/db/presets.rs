//! Gear catalog and preset persistence

use super::read_position;
use crate::presets::{GearItem, GearSlot, GearUsage, Preset, PresetGear};
use dawker_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

fn gear_item_from_row(row: &SqliteRow) -> Result<GearItem> {
    Ok(GearItem {
        id: row.try_get("id")?,
        model_name: row.try_get("model_name")?,
        gear_type: row.try_get("gear_type")?,
    })
}

pub async fn insert_gear_item(
    conn: &mut SqliteConnection,
    model_name: &str,
    gear_type: &str,
) -> Result<GearItem> {
    let id = sqlx::query("INSERT INTO gear_items (model_name, gear_type) VALUES (?, ?)")
        .bind(model_name)
        .bind(gear_type)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

    Ok(GearItem {
        id,
        model_name: model_name.to_string(),
        gear_type: gear_type.to_string(),
    })
}

pub async fn list_gear_items(pool: &SqlitePool) -> Result<Vec<GearItem>> {
    let rows = sqlx::query("SELECT id, model_name, gear_type FROM gear_items ORDER BY id")
        .fetch_all(pool)
        .await?;

    rows.iter().map(gear_item_from_row).collect()
}

/// First gear id in `slots` that is not in the catalog
pub async fn find_missing_gear(
    conn: &mut SqliteConnection,
    slots: &[GearSlot],
) -> Result<Option<i64>> {
    for slot in slots {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM gear_items WHERE id = ?)")
                .bind(slot.gear_item_id)
                .fetch_one(&mut *conn)
                .await?;
        if !exists {
            return Ok(Some(slot.gear_item_id));
        }
    }

    Ok(None)
}

pub async fn insert_preset(conn: &mut SqliteConnection, user_id: i64, name: &str) -> Result<i64> {
    let id = sqlx::query("INSERT INTO presets (user_id, name) VALUES (?, ?)")
        .bind(user_id)
        .bind(name)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

    Ok(id)
}

/// Load a preset with its chain in position order
pub async fn load_preset(conn: &mut SqliteConnection, id: i64) -> Result<Option<Preset>> {
    let row = sqlx::query("SELECT id, user_id, name, created_at FROM presets WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    let row = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let gear_rows = sqlx::query(
        r#"
        SELECT pg.id, pg.gear_item_id, g.model_name, g.gear_type,
               pg.gain_value, pg.tone_value, pg.position
        FROM preset_gear pg
        JOIN gear_items g ON g.id = pg.gear_item_id
        WHERE pg.preset_id = ?
        ORDER BY pg.position
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let gear = gear_rows
        .iter()
        .map(|row| {
            Ok(PresetGear {
                id: row.try_get("id")?,
                gear_item_id: row.try_get("gear_item_id")?,
                model_name: row.try_get("model_name")?,
                gear_type: row.try_get("gear_type")?,
                gain_value: row.try_get("gain_value")?,
                tone_value: row.try_get("tone_value")?,
                position: read_position(row, "position")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(Preset {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        gear,
    }))
}

pub async fn list_preset_ids_by_user(conn: &mut SqliteConnection, user_id: i64) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar("SELECT id FROM presets WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(ids)
}

pub async fn rename_preset(conn: &mut SqliteConnection, id: i64, name: &str) -> Result<()> {
    sqlx::query("UPDATE presets SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Replace the whole chain; slot `i` is stored at position `i`
pub async fn replace_chain(
    conn: &mut SqliteConnection,
    preset_id: i64,
    slots: &[GearSlot],
) -> Result<()> {
    sqlx::query("DELETE FROM preset_gear WHERE preset_id = ?")
        .bind(preset_id)
        .execute(&mut *conn)
        .await?;

    for (position, slot) in (0i64..).zip(slots) {
        sqlx::query(
            r#"
            INSERT INTO preset_gear (preset_id, gear_item_id, gain_value, tone_value, position)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(preset_id)
        .bind(slot.gear_item_id)
        .bind(slot.gain_value)
        .bind(slot.tone_value)
        .bind(position)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Returns false if the preset does not exist.
pub async fn delete_preset(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM presets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Gear items by number of chain slots using them, most used first
pub async fn most_used_gear(pool: &SqlitePool, limit: i64) -> Result<Vec<GearUsage>> {
    let rows = sqlx::query(
        r#"
        SELECT g.id AS gear_item_id, g.model_name, COUNT(pg.id) AS usage_count
        FROM preset_gear pg
        JOIN gear_items g ON g.id = pg.gear_item_id
        GROUP BY g.id, g.model_name
        ORDER BY usage_count DESC, g.id
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(GearUsage {
                gear_item_id: row.try_get("gear_item_id")?,
                model_name: row.try_get("model_name")?,
                usage_count: row.try_get("usage_count")?,
            })
        })
        .collect()
}
