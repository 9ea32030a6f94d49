//! Tag management module
//!
//! This module provides the `TagManager` for tags with case-insensitive
//! unique names.

mod manager;

pub use manager::TagManager;
