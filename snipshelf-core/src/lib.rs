//! `SnipShelf` Core Library
//!
//! This crate provides the core functionality for the `SnipShelf` snippet
//! organizer: the category tree, snippet and tag collections, local storage
//! and view settings.

pub mod category;
pub mod config;
pub mod error;
pub mod models;
pub mod snippet;
pub mod tag;
pub mod text;

pub use category::{CategoryManager, CreateOutcome, MutationOutcome};
pub use config::{AppSettings, ConfigManager, ViewMode, ViewSettings};
pub use error::{ConfigError, ConfigResult, SnipShelfError, SnippetError, SnippetResult};
pub use models::{Category, CategoryNode, Snippet, SnippetDraft, SnippetPatch, SnippetType, Tag};
pub use snippet::SnippetManager;
pub use tag::TagManager;
