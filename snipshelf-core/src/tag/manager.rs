//! Tag manager for CRUD operations

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::category::{compare_names, CreateOutcome, MutationOutcome};
use crate::config::ConfigManager;
use crate::error::{ConfigError, ConfigResult};
use crate::models::Tag;

/// Manager for tags
///
/// Names are trimmed and unique across all tags, ignoring case.
#[derive(Debug)]
pub struct TagManager {
    /// Tags in insertion order
    tags: Vec<Tag>,
    /// Configuration manager for persistence
    config_manager: ConfigManager,
}

impl TagManager {
    /// Creates a new `TagManager`, loading tags from storage
    ///
    /// # Errors
    ///
    /// Returns an error if loading from storage fails.
    pub fn new(config_manager: ConfigManager) -> ConfigResult<Self> {
        let tags = config_manager.load_tags()?;
        Ok(Self {
            tags,
            config_manager,
        })
    }

    /// Adds a tag, or returns the existing tag with the same name
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or persistence fails.
    pub fn add_tag(&mut self, name: &str, color: &str) -> ConfigResult<CreateOutcome> {
        let name = name.trim();
        if let Some(existing) = self.find_by_name(name, None) {
            return Ok(CreateOutcome::AlreadyExists(existing.id));
        }

        let tag = Tag::new(name.to_string(), color.to_string());
        ConfigManager::validate_tag(&tag)?;

        let id = tag.id;
        self.tags.push(tag);
        self.persist_tags()?;
        debug!(%id, name, "Created tag");

        Ok(CreateOutcome::Created(id))
    }

    /// Updates a tag's name and/or color
    ///
    /// A new name that another tag already uses (ignoring case) rejects the
    /// whole update.
    ///
    /// # Errors
    ///
    /// Returns an error if the new name is blank or persistence fails.
    pub fn update_tag(
        &mut self,
        id: Uuid,
        name: Option<&str>,
        color: Option<&str>,
    ) -> ConfigResult<MutationOutcome> {
        let name = name.map(str::trim);
        if let Some(name) = name {
            if name.is_empty() {
                return Err(ConfigError::Validation {
                    field: "name".to_string(),
                    reason: "Tag name cannot be empty".to_string(),
                });
            }
            if self.find_by_name(name, Some(id)).is_some() {
                return Ok(MutationOutcome::RejectedDuplicate);
            }
        }

        let Some(tag) = self.tags.iter_mut().find(|t| t.id == id) else {
            return Ok(MutationOutcome::NotFound);
        };

        let mut changed = false;
        if let Some(name) = name {
            if tag.name != name {
                tag.name = name.to_string();
                changed = true;
            }
        }
        if let Some(color) = color {
            if tag.color != color {
                tag.color = color.to_string();
                changed = true;
            }
        }

        if !changed {
            return Ok(MutationOutcome::Unchanged);
        }

        self.persist_tags()?;
        Ok(MutationOutcome::Applied)
    }

    /// Deletes a tag
    ///
    /// Snippets referencing the tag keep the dangling ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn delete_tag(&mut self, id: Uuid) -> ConfigResult<MutationOutcome> {
        let before = self.tags.len();
        self.tags.retain(|t| t.id != id);
        if self.tags.len() == before {
            return Ok(MutationOutcome::NotFound);
        }

        self.persist_tags()?;
        Ok(MutationOutcome::Applied)
    }

    /// Gets a tag by ID
    #[must_use]
    pub fn get_tag(&self, id: Uuid) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    /// Gets a tag by name, ignoring case and surrounding whitespace
    #[must_use]
    pub fn get_tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.find_by_name(name.trim(), None)
    }

    /// Lists all tags sorted by name
    #[must_use]
    pub fn get_all_tags(&self) -> Vec<&Tag> {
        let mut tags: Vec<&Tag> = self.tags.iter().collect();
        tags.sort_by(|a, b| compare_names(&a.name, &b.name));
        tags
    }

    /// Resolves IDs to tags
    ///
    /// Keeps the first occurrence of each ID in the given order and drops
    /// unknown IDs.
    #[must_use]
    pub fn get_tags_by_ids(&self, ids: &[Uuid]) -> Vec<&Tag> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.get_tag(*id))
            .collect()
    }

    /// Returns the total number of tags
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    fn find_by_name(&self, name: &str, exclude: Option<Uuid>) -> Option<&Tag> {
        let key = name.to_lowercase();
        self.tags
            .iter()
            .find(|t| Some(t.id) != exclude && t.name.to_lowercase() == key)
    }

    fn persist_tags(&self) -> ConfigResult<()> {
        self.config_manager.save_tags(&self.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager() -> (TagManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_manager = ConfigManager::with_config_dir(temp_dir.path().to_path_buf());
        let manager = TagManager::new(config_manager).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_add_tag_is_idempotent() {
        let (mut manager, _temp) = create_test_manager();

        let first = manager.add_tag("Rust", "#dea584").unwrap();
        let second = manager.add_tag(" rust ", "#000000").unwrap();

        assert!(first.is_created());
        assert_eq!(second, CreateOutcome::AlreadyExists(first.id()));
        assert_eq!(manager.tag_count(), 1);
        assert_eq!(manager.get_tag(first.id()).unwrap().color, "#dea584");
    }

    #[test]
    fn test_add_blank_tag_fails() {
        let (mut manager, _temp) = create_test_manager();
        assert!(manager.add_tag("  ", "#fff").is_err());
    }

    #[test]
    fn test_update_tag() {
        let (mut manager, _temp) = create_test_manager();

        let id = manager.add_tag("rust", "#fff").unwrap().id();
        let outcome = manager.update_tag(id, Some(" Rust "), Some("#000")).unwrap();

        assert_eq!(outcome, MutationOutcome::Applied);
        let tag = manager.get_tag(id).unwrap();
        assert_eq!(tag.name, "Rust");
        assert_eq!(tag.color, "#000");
        assert_eq!(
            manager.update_tag(id, None, Some("#000")).unwrap(),
            MutationOutcome::Unchanged
        );
    }

    #[test]
    fn test_update_tag_duplicate_name() {
        let (mut manager, _temp) = create_test_manager();

        let rust = manager.add_tag("rust", "#fff").unwrap().id();
        manager.add_tag("go", "#fff").unwrap();

        assert_eq!(
            manager.update_tag(rust, Some("GO"), Some("#123")).unwrap(),
            MutationOutcome::RejectedDuplicate
        );
        let tag = manager.get_tag(rust).unwrap();
        assert_eq!(tag.name, "rust");
        assert_eq!(tag.color, "#fff");
    }

    #[test]
    fn test_delete_tag() {
        let (mut manager, _temp) = create_test_manager();

        let id = manager.add_tag("rust", "#fff").unwrap().id();
        assert_eq!(manager.delete_tag(id).unwrap(), MutationOutcome::Applied);
        assert_eq!(manager.delete_tag(id).unwrap(), MutationOutcome::NotFound);
    }

    #[test]
    fn test_get_all_tags_sorted() {
        let (mut manager, _temp) = create_test_manager();

        manager.add_tag("zig", "#fff").unwrap();
        manager.add_tag("Ada", "#fff").unwrap();
        manager.add_tag("go", "#fff").unwrap();
        manager.add_tag("élan", "#fff").unwrap();

        let names: Vec<&str> = manager
            .get_all_tags()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ada", "élan", "go", "zig"]);
    }

    #[test]
    fn test_get_tags_by_ids() {
        let (mut manager, _temp) = create_test_manager();

        let a = manager.add_tag("a", "#fff").unwrap().id();
        let b = manager.add_tag("b", "#fff").unwrap().id();

        let tags = manager.get_tags_by_ids(&[b, Uuid::new_v4(), a, b]);
        let ids: Vec<Uuid> = tags.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn test_tags_persist() {
        let (mut manager, temp) = create_test_manager();
        let id = manager.add_tag("rust", "#fff").unwrap().id();

        let config = ConfigManager::with_config_dir(temp.path().to_path_buf());
        let reloaded = TagManager::new(config).unwrap();
        assert_eq!(reloaded.get_tag_by_name("RUST").unwrap().id, id);
    }
}
