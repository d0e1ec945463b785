//! Gear catalog and user presets
//!
//! A preset is an ordered chain of gear slots. Chain order is list order:
//! every write renumbers the slots `0..n`, so the stored `position` always
//! matches what the caller sent.

use crate::db::{self, presets as store, users};
use dawker_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

/// Number of entries returned by the popularity ranking by default
pub const DEFAULT_POPULAR_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearItem {
    pub id: i64,
    pub model_name: String,
    pub gear_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGearItem {
    pub model_name: String,
    pub gear_type: String,
}

/// Stored chain slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetGear {
    pub id: i64,
    pub gear_item_id: i64,
    pub model_name: String,
    pub gear_type: String,
    pub gain_value: Option<f64>,
    pub tone_value: Option<f64>,
    pub position: u32,
}

/// Chain slot as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearSlot {
    pub gear_item_id: i64,
    #[serde(default)]
    pub gain_value: Option<f64>,
    #[serde(default)]
    pub tone_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: String,
    pub gear: Vec<PresetGear>,
}

/// Create or update request. `gear: None` keeps the stored chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetInput {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub gear: Option<Vec<GearSlot>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearUsage {
    pub gear_item_id: i64,
    pub model_name: String,
    pub usage_count: i64,
}

#[derive(Clone)]
pub struct PresetService {
    pool: SqlitePool,
}

impl PresetService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a catalog entry; Conflict if the model name is taken
    pub async fn add_gear_item(&self, item: NewGearItem) -> Result<GearItem> {
        let model_name = non_blank(&item.model_name, "Gear model name")?;
        let gear_type = non_blank(&item.gear_type, "Gear type")?.to_uppercase();

        let mut conn = self.pool.acquire().await?;
        let gear = store::insert_gear_item(&mut *conn, model_name, &gear_type)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    Error::Conflict(format!("Gear item '{}' already exists", model_name))
                } else {
                    e
                }
            })?;

        info!(gear_item_id = gear.id, "Added gear item '{}'", gear.model_name);
        Ok(gear)
    }

    pub async fn list_gear_items(&self) -> Result<Vec<GearItem>> {
        store::list_gear_items(&self.pool).await
    }

    pub async fn create(&self, input: PresetInput) -> Result<Preset> {
        let name = non_blank(&input.name, "Preset name")?;

        let mut tx = db::begin_write(&self.pool).await?;
        if !users::user_exists(&mut *tx, input.user_id).await? {
            return Err(Error::not_found("User", input.user_id));
        }

        let id = store::insert_preset(&mut *tx, input.user_id, name)
            .await
            .map_err(duplicate_name(name))?;

        if let Some(slots) = &input.gear {
            write_chain(&mut tx, id, slots).await?;
        }

        let preset = store::load_preset(&mut *tx, id)
            .await?
            .ok_or_else(|| Error::not_found("Preset", id))?;
        tx.commit().await?;

        info!(preset_id = id, user_id = input.user_id, "Created preset '{}'", preset.name);
        Ok(preset)
    }

    pub async fn get(&self, id: i64) -> Result<Preset> {
        let mut conn = self.pool.acquire().await?;
        store::load_preset(&mut *conn, id)
            .await?
            .ok_or_else(|| Error::not_found("Preset", id))
    }

    /// A user's presets, oldest first; NotFound for an unknown user
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Preset>> {
        let mut conn = self.pool.acquire().await?;
        if !users::user_exists(&mut *conn, user_id).await? {
            return Err(Error::not_found("User", user_id));
        }

        let ids = store::list_preset_ids_by_user(&mut *conn, user_id).await?;
        let mut presets = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(preset) = store::load_preset(&mut *conn, id).await? {
                presets.push(preset);
            }
        }

        Ok(presets)
    }

    /// Rename a preset and, when `gear` is given, replace its chain
    pub async fn update(&self, id: i64, input: PresetInput) -> Result<Preset> {
        let name = non_blank(&input.name, "Preset name")?;

        let mut tx = db::begin_write(&self.pool).await?;
        let existing = store::load_preset(&mut *tx, id)
            .await?
            .ok_or_else(|| Error::not_found("Preset", id))?;

        if existing.user_id != input.user_id {
            return Err(Error::InvalidInput(format!(
                "Preset {} is owned by user {}, not user {}",
                id, existing.user_id, input.user_id
            )));
        }

        store::rename_preset(&mut *tx, id, name)
            .await
            .map_err(duplicate_name(name))?;

        if let Some(slots) = &input.gear {
            write_chain(&mut tx, id, slots).await?;
        }

        let preset = store::load_preset(&mut *tx, id)
            .await?
            .ok_or_else(|| Error::not_found("Preset", id))?;
        tx.commit().await?;

        info!(preset_id = id, slots = preset.gear.len(), "Updated preset '{}'", preset.name);
        Ok(preset)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !store::delete_preset(&self.pool, id).await? {
            return Err(Error::not_found("Preset", id));
        }

        info!(preset_id = id, "Deleted preset");
        Ok(())
    }

    /// The `limit` most used gear items across every preset chain
    pub async fn most_popular_gear(&self, limit: i64) -> Result<Vec<GearUsage>> {
        if limit <= 0 {
            return Err(Error::InvalidInput(format!(
                "Limit must be greater than 0, got {}",
                limit
            )));
        }

        store::most_used_gear(&self.pool, limit).await
    }
}

async fn write_chain(
    tx: &mut sqlx::Transaction<'static, sqlx::Sqlite>,
    preset_id: i64,
    slots: &[GearSlot],
) -> Result<()> {
    if let Some(missing) = store::find_missing_gear(&mut **tx, slots).await? {
        return Err(Error::not_found("Gear item", missing));
    }

    store::replace_chain(&mut **tx, preset_id, slots).await
}

fn duplicate_name(name: &str) -> impl FnOnce(Error) -> Error + '_ {
    move |e| {
        if e.is_unique_violation() {
            Error::Conflict(format!("This user already has a preset named '{}'", name))
        } else {
            e
        }
    }
}

fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be blank", what)));
    }
    Ok(trimmed)
}
