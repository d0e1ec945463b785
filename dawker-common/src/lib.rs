//! # Dawker Common Library
//!
//! Shared code for the Dawker backend:
//! - Error type used by every layer
//! - Data folder and server configuration loading
//! - Database initialization and schema
//! - Password hashing
//! - Per-level log file pipeline

pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
