//! Category manager for CRUD operations over the category forest
//!
//! This module provides the `CategoryManager` which creates, renames, moves
//! and deletes categories with write-through persistence through
//! `ConfigManager`, and builds tree, flat and path views over them.

use std::cmp::Ordering;
use std::collections::HashSet;

use icu_collator::{Collator, CollatorOptions, Strength};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ConfigManager;
use crate::error::{ConfigError, ConfigResult};
use crate::models::{Category, CategoryNode};

use super::outcome::{CreateOutcome, MutationOutcome};

thread_local! {
    // Root locale at tertiary strength: accents sort with their base letter
    // and lowercase comes before uppercase
    static COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);
        match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(e) => {
                warn!(error = ?e, "Collation data unavailable, sorting by case-folded code points");
                None
            }
        }
    };
}

/// Orders display names alphabetically using Unicode collation
///
/// Accented letters sort next to their base letter. Names that differ only
/// in case put the lowercase form first.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| collator.as_ref().map(|c| c.compare(a, b)))
        .unwrap_or_else(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn sort_by_name(categories: &mut [&Category]) {
    categories.sort_by(|a, b| compare_names(&a.name, &b.name));
}

/// Keeps the first category for each case-insensitive name
fn dedup_by_name<'a>(categories: impl Iterator<Item = &'a Category>) -> Vec<&'a Category> {
    let mut seen = HashSet::new();
    categories.filter(|c| seen.insert(c.name_key())).collect()
}

/// Drops stored records whose ID was already seen, keeping the first
fn dedup_ids(categories: Vec<Category>) -> Vec<Category> {
    let before = categories.len();
    let mut seen = HashSet::new();
    let categories: Vec<Category> = categories
        .into_iter()
        .filter(|c| seen.insert(c.id))
        .collect();

    if categories.len() < before {
        warn!(
            dropped = before - categories.len(),
            "Ignored stored categories with duplicate IDs"
        );
    }
    categories
}

/// Manager for the category forest
///
/// Categories are kept in insertion order: where two siblings share a
/// case-insensitive name, the earlier one wins in every derived view.
///
/// Mutations never fail. They report a [`MutationOutcome`] or
/// [`CreateOutcome`] and, when autosave is on, write the whole collection
/// through to storage. A failed write does not undo the in-memory change; it
/// is logged and kept until the next successful write, see
/// [`last_persist_error`](Self::last_persist_error).
#[derive(Debug)]
pub struct CategoryManager {
    /// Flat category storage in insertion order
    categories: Vec<Category>,
    /// Configuration manager for persistence
    config_manager: ConfigManager,
    /// Write through after every applied mutation
    autosave: bool,
    /// In-memory state differs from the last successful write
    dirty: bool,
    /// Error from the most recent failed write-through
    last_persist_error: Option<ConfigError>,
}

impl CategoryManager {
    /// Creates a new `CategoryManager`, rehydrating categories from storage
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file exists but cannot be read.
    pub fn new(config_manager: ConfigManager) -> ConfigResult<Self> {
        let categories = dedup_ids(config_manager.load_categories()?);
        debug!(count = categories.len(), "Loaded categories");

        Ok(Self {
            categories,
            config_manager,
            autosave: true,
            dirty: false,
            last_persist_error: None,
        })
    }

    /// Enables or disables write-through after each mutation
    ///
    /// With autosave off, changes accumulate until [`flush`](Self::flush).
    pub fn set_autosave(&mut self, autosave: bool) {
        self.autosave = autosave;
    }

    /// Returns true if there are changes not yet written to storage
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Error from the most recent failed write-through, if any
    #[must_use]
    pub const fn last_persist_error(&self) -> Option<&ConfigError> {
        self.last_persist_error.as_ref()
    }

    // ========== Mutations ==========

    /// Creates a category under `parent_id`, or returns the existing sibling
    ///
    /// The name is trimmed. If a sibling with the same parent already has the
    /// name (ignoring case), its ID is returned and nothing changes. The
    /// parent is not checked for existence; a blank name is accepted.
    pub fn create_category(&mut self, name: &str, parent_id: Option<Uuid>) -> CreateOutcome {
        let name = name.trim();
        if let Some(existing) = self.find_sibling(name, parent_id, None) {
            return CreateOutcome::AlreadyExists(existing.id);
        }

        let category = match parent_id {
            Some(parent_id) => Category::with_parent(name.to_string(), parent_id),
            None => Category::new(name.to_string()),
        };
        let id = category.id;
        self.categories.push(category);
        debug!(%id, name, ?parent_id, "Created category");
        self.commit();

        CreateOutcome::Created(id)
    }

    /// Renames a category
    ///
    /// The new name is trimmed. Renaming is refused if another category with
    /// the same parent already has the name, ignoring case.
    pub fn rename_category(&mut self, id: Uuid, new_name: &str) -> MutationOutcome {
        let new_name = new_name.trim();
        let Some(parent_id) = self.get_category(id).map(|c| c.parent_id) else {
            return MutationOutcome::NotFound;
        };

        if self.find_sibling(new_name, parent_id, Some(id)).is_some() {
            return MutationOutcome::RejectedDuplicate;
        }

        let Some(category) = self.categories.iter_mut().find(|c| c.id == id) else {
            return MutationOutcome::NotFound;
        };
        if category.name == new_name {
            return MutationOutcome::Unchanged;
        }

        category.name = new_name.to_string();
        debug!(%id, name = new_name, "Renamed category");
        self.commit();
        MutationOutcome::Applied
    }

    /// Deletes a category together with all of its descendants
    pub fn delete_category(&mut self, id: Uuid) -> MutationOutcome {
        if self.get_category(id).is_none() {
            return MutationOutcome::NotFound;
        }

        let to_delete: HashSet<Uuid> = self.descendant_ids(id).into_iter().collect();
        self.categories.retain(|c| !to_delete.contains(&c.id));
        debug!(%id, removed = to_delete.len(), "Deleted category subtree");
        self.commit();
        MutationOutcome::Applied
    }

    /// Moves a category under `new_parent_id` (None for root level)
    ///
    /// Refused if the new parent is the category itself or one of its
    /// descendants. The new parent is not checked for existence.
    pub fn move_category(&mut self, id: Uuid, new_parent_id: Option<Uuid>) -> MutationOutcome {
        if new_parent_id == Some(id) {
            return MutationOutcome::RejectedCycle;
        }

        let Some(current_parent) = self.get_category(id).map(|c| c.parent_id) else {
            return MutationOutcome::NotFound;
        };

        if let Some(parent_id) = new_parent_id {
            if self.descendant_ids(id).contains(&parent_id) {
                warn!(%id, %parent_id, "Refused move that would create a cycle");
                return MutationOutcome::RejectedCycle;
            }
        }

        if current_parent == new_parent_id {
            return MutationOutcome::Unchanged;
        }

        if let Some(category) = self.categories.iter_mut().find(|c| c.id == id) {
            category.parent_id = new_parent_id;
        }
        debug!(%id, ?new_parent_id, "Moved category");
        self.commit();
        MutationOutcome::Applied
    }

    // ========== Queries ==========

    /// Gets a category by ID; `None` input yields `None`
    #[must_use]
    pub fn get_category(&self, id: impl Into<Option<Uuid>>) -> Option<&Category> {
        let id = id.into()?;
        self.categories.iter().find(|c| c.id == id)
    }

    /// Builds the category forest
    ///
    /// At each level, categories sharing a case-insensitive name are collapsed
    /// to the first one and the rest are sorted alphabetically.
    #[must_use]
    pub fn get_root_categories(&self) -> Vec<CategoryNode> {
        let mut roots = dedup_by_name(self.categories.iter().filter(|c| c.is_root()));
        sort_by_name(&mut roots);
        self.build_tree(&roots, &mut HashSet::new())
    }

    /// Lists all categories without children
    ///
    /// Categories with the same case-insensitive name and the same parent are
    /// collapsed to the first one. Sorted alphabetically.
    #[must_use]
    pub fn get_all_categories(&self) -> Vec<&Category> {
        let mut seen = HashSet::new();
        let mut all: Vec<&Category> = self
            .categories
            .iter()
            .filter(|c| seen.insert((c.name_key(), c.parent_id)))
            .collect();
        sort_by_name(&mut all);
        all
    }

    /// Returns the chain of categories from the root down to `id`
    ///
    /// Stops at the first parent reference that does not resolve.
    #[must_use]
    pub fn get_category_path(&self, id: impl Into<Option<Uuid>>) -> Vec<&Category> {
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current_id = id.into();

        while let Some(id) = current_id {
            if !visited.insert(id) {
                break;
            }
            let Some(category) = self.get_category(id) else {
                break;
            };
            path.push(category);
            current_id = category.parent_id;
        }

        path.reverse();
        path
    }

    /// Gets the full path of a category as a string (e.g. "Work/Reports")
    #[must_use]
    pub fn get_category_path_string(&self, id: Uuid) -> Option<String> {
        let path = self.get_category_path(id);
        if path.is_empty() {
            return None;
        }
        Some(
            path.iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }

    /// Gets the direct children of a category (or the roots for `None`)
    #[must_use]
    pub fn get_child_categories(&self, parent_id: Option<Uuid>) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.parent_id == parent_id)
            .collect()
    }

    /// Collects `id` and the IDs of all of its descendants
    ///
    /// The requested ID is always first, even if no such category exists.
    #[must_use]
    pub fn descendant_ids(&self, id: Uuid) -> Vec<Uuid> {
        let mut result = vec![id];
        let mut to_process = vec![id];

        while let Some(current_id) = to_process.pop() {
            for category in &self.categories {
                if category.parent_id == Some(current_id) && !result.contains(&category.id) {
                    result.push(category.id);
                    to_process.push(category.id);
                }
            }
        }

        result
    }

    /// All stored categories in insertion order
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Returns the total number of stored categories
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if there are no categories
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Validates that IDs are unique and the stored parent links are acyclic
    #[must_use]
    pub fn validate_hierarchy(&self) -> bool {
        let mut ids = HashSet::new();
        if !self.categories.iter().all(|c| ids.insert(c.id)) {
            return false;
        }

        for category in &self.categories {
            let mut visited = HashSet::new();
            let mut current_id = Some(category.id);

            while let Some(id) = current_id {
                if !visited.insert(id) {
                    return false;
                }
                current_id = self.get_category(id).and_then(|c| c.parent_id);
            }
        }

        true
    }

    /// Builds nodes for one level; an ID already placed in the tree is skipped
    fn build_tree(&self, level: &[&Category], placed: &mut HashSet<Uuid>) -> Vec<CategoryNode> {
        let mut nodes = Vec::with_capacity(level.len());
        for category in level {
            if !placed.insert(category.id) {
                continue;
            }

            let mut children = dedup_by_name(
                self.categories
                    .iter()
                    .filter(|c| c.parent_id == Some(category.id)),
            );
            sort_by_name(&mut children);

            nodes.push(CategoryNode {
                category: (*category).clone(),
                children: self.build_tree(&children, placed),
            });
        }
        nodes
    }

    fn find_sibling(
        &self,
        name: &str,
        parent_id: Option<Uuid>,
        exclude: Option<Uuid>,
    ) -> Option<&Category> {
        let key = name.to_lowercase();
        self.categories.iter().find(|c| {
            Some(c.id) != exclude && c.parent_id == parent_id && c.name_key() == key
        })
    }

    // ========== Persistence ==========

    fn commit(&mut self) {
        self.dirty = true;
        if !self.autosave {
            return;
        }

        if let Err(e) = self.flush() {
            warn!(error = %e, "Failed to persist categories");
            self.last_persist_error = Some(e);
        }
    }

    /// Writes all categories to storage
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file cannot be written.
    pub fn flush(&mut self) -> ConfigResult<()> {
        self.config_manager.save_categories(&self.categories)?;
        self.dirty = false;
        self.last_persist_error = None;
        Ok(())
    }

    /// Reloads categories from storage, discarding unsaved changes
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn reload(&mut self) -> ConfigResult<()> {
        self.categories = dedup_ids(self.config_manager.load_categories()?);
        self.dirty = false;
        Ok(())
    }
}
