//! Identifier reconciliation for a subtree save
//!
//! A save always rebuilds the whole config subtree. Before rebuilding, the
//! incoming tree is compared against the stored one: an incoming node keeps
//! its id only when that id belonged to the stored tree of the same project
//! and has not already been claimed earlier in the incoming tree. Every other
//! incoming node is created with a fresh id, and stored ids nobody claimed
//! are deleted.

use super::model::Config;
use std::collections::BTreeSet;

/// Node ids of a config subtree, per level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIds {
    pub configs: BTreeSet<i64>,
    pub components: BTreeSet<i64>,
    pub settings: BTreeSet<i64>,
}

impl NodeIds {
    /// Collect every assigned id in a subtree
    pub fn of(configs: &[Config]) -> Self {
        let mut ids = Self::default();
        for config in configs {
            ids.configs.extend(config.id);
            for component in &config.components {
                ids.components.extend(component.id);
                ids.settings.extend(component.settings.id);
            }
        }
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty() && self.components.is_empty() && self.settings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.configs.len() + self.components.len() + self.settings.len()
    }
}

/// Number of fresh nodes per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCounts {
    pub configs: usize,
    pub components: usize,
    pub settings: usize,
}

impl NodeCounts {
    pub fn total(&self) -> usize {
        self.configs + self.components + self.settings
    }
}

/// Outcome of comparing a stored subtree with an incoming one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Incoming ids that stay attached to their node
    pub retained: NodeIds,
    /// Incoming nodes that get a fresh id
    pub created: NodeCounts,
    /// Stored ids that disappear with this save
    pub deleted: NodeIds,
}

impl ReconcilePlan {
    /// Strip every id the plan does not retain
    ///
    /// Walks the tree in the same order as [`plan`], so a duplicated id keeps
    /// its first occurrence only.
    pub fn apply(&self, incoming: &mut [Config]) {
        let mut claimed = NodeIds::default();

        for config in incoming.iter_mut() {
            config.id = keep(config.id, &self.retained.configs, &mut claimed.configs);
            for component in config.components.iter_mut() {
                component.id = keep(
                    component.id,
                    &self.retained.components,
                    &mut claimed.components,
                );
                component.settings.id = keep(
                    component.settings.id,
                    &self.retained.settings,
                    &mut claimed.settings,
                );
            }
        }
    }
}

/// Compare a stored subtree with an incoming one
pub fn plan(existing: &[Config], incoming: &[Config]) -> ReconcilePlan {
    let known = NodeIds::of(existing);
    let mut retained = NodeIds::default();
    let mut created = NodeCounts::default();

    for config in incoming {
        if !claim(config.id, &known.configs, &mut retained.configs) {
            created.configs += 1;
        }
        for component in &config.components {
            if !claim(component.id, &known.components, &mut retained.components) {
                created.components += 1;
            }
            if !claim(component.settings.id, &known.settings, &mut retained.settings) {
                created.settings += 1;
            }
        }
    }

    let deleted = NodeIds {
        configs: known.configs.difference(&retained.configs).copied().collect(),
        components: known
            .components
            .difference(&retained.components)
            .copied()
            .collect(),
        settings: known.settings.difference(&retained.settings).copied().collect(),
    };

    ReconcilePlan {
        retained,
        created,
        deleted,
    }
}

fn claim(id: Option<i64>, known: &BTreeSet<i64>, claimed: &mut BTreeSet<i64>) -> bool {
    match id {
        Some(id) if known.contains(&id) => claimed.insert(id),
        _ => false,
    }
}

fn keep(id: Option<i64>, retained: &BTreeSet<i64>, claimed: &mut BTreeSet<i64>) -> Option<i64> {
    id.filter(|id| retained.contains(id) && claimed.insert(*id))
}
