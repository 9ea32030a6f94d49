//! Configuration and storage for `SnipShelf`
//!
//! This module provides the `ConfigManager` for loading and saving the
//! category, snippet and tag collections (JSON) and application settings
//! (TOML).

mod manager;
pub mod settings;

pub use manager::{ConfigManager, CATEGORY_STORAGE_KEY};
pub use settings::{AppSettings, LoggingSettings, ViewMode, ViewSettings};
