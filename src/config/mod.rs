//! Add-on configuration
//!
//! This module provides:
//! - The serde data model for the add-on's settings file
//! - Range validation for numeric settings
//! - A JSON file store with a backup-on-write, verify-after-write protocol

pub mod models;
pub mod store;

pub use models::*;
pub use store::{ConfigError, ConfigStore};
