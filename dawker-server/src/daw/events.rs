//! Observer for DAW lifecycle events
//!
//! The service reports what happened; implementations decide what to do with
//! it. [`TracingEvents`] is the production implementation.

use super::model::DawSummary;
use super::reconcile::ReconcilePlan;
use tracing::{debug, info, warn};

pub trait DawEvents: Send + Sync {
    fn created(&self, daw: &DawSummary);

    /// A save committed. `plan` is the id reconciliation that was applied,
    /// or `None` when the snapshot left the subtree untouched.
    fn saved(&self, daw: &DawSummary, plan: Option<&ReconcilePlan>);

    /// A save was refused before anything was written
    fn save_rejected(&self, daw_id: Option<&str>, reason: &dawker_common::Error);

    fn deleted(&self, daw_id: &str);

    fn exported(&self, daw: &DawSummary);
}

/// Emits every event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl DawEvents for TracingEvents {
    fn created(&self, daw: &DawSummary) {
        info!(daw_id = %daw.id, user_id = daw.user_id, "Created DAW '{}'", daw.name);
    }

    fn saved(&self, daw: &DawSummary, plan: Option<&ReconcilePlan>) {
        match plan {
            Some(plan) => {
                info!(
                    daw_id = %daw.id,
                    version = daw.version,
                    retained = plan.retained.len(),
                    created = plan.created.total(),
                    deleted = plan.deleted.len(),
                    "Saved DAW '{}'",
                    daw.name
                );
                debug!(daw_id = %daw.id, ?plan, "Subtree reconciliation");
            }
            None => {
                info!(daw_id = %daw.id, version = daw.version, "Saved DAW '{}' (subtree unchanged)", daw.name);
            }
        }
    }

    fn save_rejected(&self, daw_id: Option<&str>, reason: &dawker_common::Error) {
        warn!(daw_id = daw_id.unwrap_or("<new>"), "Rejected DAW save: {}", reason);
    }

    fn deleted(&self, daw_id: &str) {
        info!(daw_id = %daw_id, "Deleted DAW");
    }

    fn exported(&self, daw: &DawSummary) {
        info!(daw_id = %daw.id, export_count = daw.export_count, "Recorded DAW export");
    }
}
