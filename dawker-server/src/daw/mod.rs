//! The DAW aggregate and its merge-on-save service

pub mod events;
pub mod model;
pub mod reconcile;
pub mod service;

pub use events::{DawEvents, TracingEvents};
pub use model::{
    Component, Config, CreateDawRequest, DawProject, DawSnapshot, DawSummary, ParamValue,
    Parameters, Settings,
};
pub use reconcile::{plan, NodeCounts, NodeIds, ReconcilePlan};
pub use service::DawService;
