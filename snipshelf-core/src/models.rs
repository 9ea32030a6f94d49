//! Core data models for `SnipShelf`
//!
//! This module defines the primary data structures: categories and their
//! derived tree view, snippets, and tags.

mod category;
mod snippet;
mod tag;

pub use category::{Category, CategoryNode};
pub use snippet::{Snippet, SnippetDraft, SnippetPatch, SnippetType};
pub use tag::Tag;
