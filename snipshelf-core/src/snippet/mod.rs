//! Snippet management module
//!
//! This module provides the `SnippetManager` for CRUD operations on snippets,
//! with category/tag filtering, text search and pinning.

mod manager;

pub use manager::SnippetManager;
