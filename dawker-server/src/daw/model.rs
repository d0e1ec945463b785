//! DAW aggregate: project -> configs -> components -> settings
//!
//! The same types serve as the JSON tree returned to clients and as the
//! snapshot clients submit back. Identifiers are `None` until persisted.
//! `position` is always rewritten from list order, so a client never has to
//! keep it consistent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One parameter value. Not schema-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Parameter name -> value, kept sorted for stable output
pub type Parameters = BTreeMap<String, ParamValue>;

/// Leaf payload of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub id: Option<i64>,
    pub technology: String,
    pub export_name: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl Settings {
    pub fn new(technology: impl Into<String>, export_name: impl Into<String>) -> Self {
        Self {
            id: None,
            technology: technology.into(),
            export_name: export_name.into(),
            parameters: Parameters::new(),
        }
    }

    /// Builder-style parameter insert
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// One processing unit in a signal chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default)]
    pub id: Option<i64>,
    /// Client-generated, not unique server-side
    pub instance_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub position: u32,
    pub settings: Settings,
}

impl Component {
    pub fn new(
        name: impl Into<String>,
        component_type: impl Into<String>,
        instance_id: impl Into<String>,
        settings: Settings,
    ) -> Self {
        Self {
            id: None,
            instance_id: instance_id.into(),
            name: name.into(),
            component_type: component_type.into(),
            position: 0,
            settings,
        }
    }

    /// Replace the whole settings value, returning the previous one
    pub fn replace_settings(&mut self, settings: Settings) -> Settings {
        std::mem::replace(&mut self.settings, settings)
    }
}

/// A named signal chain. Component order is chain order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            position: 0,
            components: Vec::new(),
        }
    }

    /// Swap in a new component chain, returning the detached old chain
    pub fn replace_components(&mut self, components: Vec<Component>) -> Vec<Component> {
        let old = std::mem::replace(&mut self.components, components);
        self.renumber();
        old
    }

    /// Rewrite `position` from list order
    pub(crate) fn renumber(&mut self) {
        for (index, component) in self.components.iter_mut().enumerate() {
            component.position = index as u32;
        }
    }
}

/// Aggregate root of a user's rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DawProject {
    pub id: String,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub export_count: i64,
    /// Optimistic concurrency token
    pub version: i64,
    pub configs: Vec<Config>,
}

impl DawProject {
    /// Empty project with a fresh identity
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name: name.into(),
            description: None,
            created_at: Utc::now(),
            export_count: 0,
            version: 1,
            configs: Vec::new(),
        }
    }

    /// Swap in a new config list, returning the detached old list
    pub fn replace_configs(&mut self, configs: Vec<Config>) -> Vec<Config> {
        let old = std::mem::replace(&mut self.configs, configs);
        for (index, config) in self.configs.iter_mut().enumerate() {
            config.position = index as u32;
            config.renumber();
        }
        old
    }

    pub fn summary(&self) -> DawSummary {
        DawSummary {
            id: self.id.clone(),
            user_id: self.user_id,
            name: self.name.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            export_count: self.export_count,
            version: self.version,
        }
    }
}

/// Shallow projection used for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DawSummary {
    pub id: String,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub export_count: i64,
    pub version: i64,
}

/// Full tree submitted by a client for saving
///
/// An empty or absent `id` creates a new project. `configs: null` (or an
/// absent key) leaves the stored subtree alone; `configs: []` clears it.
/// Read-only fields of a fetched tree (`createdAt`, `exportCount`) are
/// accepted and ignored, so a fetched tree can be saved back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DawSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub configs: Option<Vec<Config>>,
}

impl DawSnapshot {
    /// Target id, treating a blank id as absent
    pub fn target_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl From<DawProject> for DawSnapshot {
    fn from(daw: DawProject) -> Self {
        Self {
            id: Some(daw.id),
            user_id: daw.user_id,
            name: daw.name,
            description: daw.description,
            version: Some(daw.version),
            configs: Some(daw.configs),
        }
    }
}

/// Request body for creating an empty project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDawRequest {
    pub user_id: i64,
    pub name: String,
}
