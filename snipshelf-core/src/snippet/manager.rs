//! Snippet manager for CRUD operations
//!
//! This module provides the `SnippetManager` which handles creating, reading,
//! updating, and deleting snippets with persistence through `ConfigManager`.

use std::collections::HashSet;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::category::CategoryManager;
use crate::config::ConfigManager;
use crate::error::{SnippetError, SnippetResult};
use crate::models::{Snippet, SnippetDraft, SnippetPatch};

/// Manager for snippet CRUD operations
///
/// Every mutation is written through to storage. When the write fails the
/// in-memory change is rolled back and the error returned.
///
/// Snippets are kept newest first. Category references are not validated and
/// deleting a category does not touch the snippets that point at it; use
/// [`orphaned`](Self::orphaned) to find them.
#[derive(Debug)]
pub struct SnippetManager {
    /// In-memory snippet storage, newest first
    snippets: Vec<Snippet>,
    /// Configuration manager for persistence
    config_manager: ConfigManager,
}

impl SnippetManager {
    /// Creates a new `SnippetManager` with the given `ConfigManager`
    ///
    /// Loads existing snippets from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if loading from storage fails.
    pub fn new(config_manager: ConfigManager) -> SnippetResult<Self> {
        let snippets = config_manager.load_snippets()?;
        for (index, error) in ConfigManager::validate_snippets(&snippets) {
            warn!(index, %error, "Loaded invalid snippet");
        }

        Ok(Self {
            snippets,
            config_manager,
        })
    }

    // ========== Snippet CRUD Operations ==========

    /// Creates a new snippet and persists it
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or persistence fails.
    pub fn create_snippet(&mut self, draft: SnippetDraft) -> SnippetResult<Uuid> {
        let snippet = Snippet::from_draft(draft);
        ConfigManager::validate_snippet(&snippet)
            .map_err(|e| SnippetError::Invalid(e.to_string()))?;

        let id = snippet.id;
        self.snippets.insert(0, snippet);
        if let Err(e) = self.persist_snippets() {
            self.snippets.remove(0);
            return Err(e);
        }
        debug!(%id, "Created snippet");

        Ok(id)
    }

    /// Applies a partial update to a snippet
    ///
    /// # Errors
    ///
    /// Returns an error if the snippet doesn't exist, the result is invalid,
    /// or persistence fails.
    pub fn update_snippet(&mut self, id: Uuid, patch: SnippetPatch) -> SnippetResult<()> {
        let snippet = self
            .snippets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SnippetError::NotFound(id))?;

        let mut updated = snippet.clone();
        updated.apply(patch);
        ConfigManager::validate_snippet(&updated)
            .map_err(|e| SnippetError::Invalid(e.to_string()))?;
        let previous = std::mem::replace(snippet, updated);

        if let Err(e) = self.persist_snippets() {
            if let Some(snippet) = self.snippets.iter_mut().find(|s| s.id == id) {
                *snippet = previous;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Deletes a snippet by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the snippet doesn't exist or persistence fails.
    pub fn delete_snippet(&mut self, id: Uuid) -> SnippetResult<()> {
        let index = self
            .snippets
            .iter()
            .position(|s| s.id == id)
            .ok_or(SnippetError::NotFound(id))?;
        let removed = self.snippets.remove(index);

        if let Err(e) = self.persist_snippets() {
            self.snippets.insert(index, removed);
            return Err(e);
        }
        debug!(%id, "Deleted snippet");
        Ok(())
    }

    /// Flips the pinned flag and returns the new value
    ///
    /// # Errors
    ///
    /// Returns an error if the snippet doesn't exist or persistence fails.
    pub fn toggle_pin(&mut self, id: Uuid) -> SnippetResult<bool> {
        let snippet = self
            .snippets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SnippetError::NotFound(id))?;

        snippet.is_pinned = !snippet.is_pinned;
        let pinned = snippet.is_pinned;

        if let Err(e) = self.persist_snippets() {
            if let Some(snippet) = self.snippets.iter_mut().find(|s| s.id == id) {
                snippet.is_pinned = !pinned;
            }
            return Err(e);
        }
        Ok(pinned)
    }

    /// Gets a snippet by ID
    #[must_use]
    pub fn get_snippet(&self, id: Uuid) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// Lists all snippets, newest first
    #[must_use]
    pub fn list_snippets(&self) -> Vec<&Snippet> {
        self.snippets.iter().collect()
    }

    /// Returns the total number of snippets
    #[must_use]
    pub fn snippet_count(&self) -> usize {
        self.snippets.len()
    }

    // ========== Filters ==========

    /// Gets snippets in a category (`None` for uncategorized)
    #[must_use]
    pub fn get_by_category(&self, category_id: Option<Uuid>) -> Vec<&Snippet> {
        self.snippets
            .iter()
            .filter(|s| s.category_id == category_id)
            .collect()
    }

    /// Gets snippets carrying a tag
    #[must_use]
    pub fn get_by_tag(&self, tag_id: Uuid) -> Vec<&Snippet> {
        self.snippets
            .iter()
            .filter(|s| s.tags.contains(&tag_id))
            .collect()
    }

    /// Gets pinned snippets
    #[must_use]
    pub fn get_pinned(&self) -> Vec<&Snippet> {
        self.snippets.iter().filter(|s| s.is_pinned).collect()
    }

    /// Counts snippets carrying a tag
    #[must_use]
    pub fn tag_count(&self, tag_id: Uuid) -> usize {
        self.snippets
            .iter()
            .filter(|s| s.tags.contains(&tag_id))
            .count()
    }

    /// Searches snippets by query string
    ///
    /// Case-insensitive substring match against title and content.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Snippet> {
        let query_lower = query.to_lowercase();

        self.snippets
            .iter()
            .filter(|snippet| {
                snippet.title.to_lowercase().contains(&query_lower)
                    || snippet.content.to_lowercase().contains(&query_lower)
            })
            .collect()
    }

    /// Gets snippets whose category no longer exists
    #[must_use]
    pub fn orphaned(&self, categories: &CategoryManager) -> Vec<&Snippet> {
        let known: HashSet<Uuid> = categories.categories().iter().map(|c| c.id).collect();

        self.snippets
            .iter()
            .filter(|s| s.category_id.is_some_and(|id| !known.contains(&id)))
            .collect()
    }

    // ========== Persistence ==========

    /// Persists all snippets to storage
    fn persist_snippets(&self) -> SnippetResult<()> {
        self.config_manager.save_snippets(&self.snippets)?;
        Ok(())
    }

    /// Reloads snippets from storage
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn reload(&mut self) -> SnippetResult<()> {
        self.snippets = self.config_manager.load_snippets()?;
        Ok(())
    }
}
