//! Configuration manager for storage file operations
//!
//! This module provides the `ConfigManager` which handles loading and saving
//! the category, snippet and tag collections and application settings.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::models::{Category, Snippet, Tag};

use super::settings::AppSettings;

/// Storage key under which the category collection is persisted
pub const CATEGORY_STORAGE_KEY: &str = "category-storage";

/// Schema version written alongside the category collection
const CATEGORY_STORAGE_VERSION: u32 = 0;

/// File names for storage files
const SNIPPETS_FILE: &str = "snippets.json";
const TAGS_FILE: &str = "tags.json";
const SETTINGS_FILE: &str = "settings.toml";

/// Persisted category state: `{ "state": { "categories": [...] }, "version": 0 }`
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct CategoryStorageFile {
    #[serde(default)]
    state: CategoryState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct CategoryState {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Wrapper for serializing a list of snippets
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct SnippetsFile {
    #[serde(default)]
    snippets: Vec<Snippet>,
}

/// Wrapper for serializing a list of tags
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct TagsFile {
    #[serde(default)]
    tags: Vec<Tag>,
}

/// Configuration manager for `SnipShelf`
///
/// Handles loading and saving storage files. Data is stored in
/// `~/.local/share/snipshelf/` (platform data dir) by default.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Base directory for storage files
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new `ConfigManager` with the default data directory
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::data_dir()
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from("~/.local/share")))?
            .join("snipshelf");
        Ok(Self { config_dir })
    }

    /// Creates a new `ConfigManager` with a custom directory
    ///
    /// This is useful for testing or non-standard locations.
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Returns the storage directory path
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the category storage file
    #[must_use]
    pub fn categories_path(&self) -> PathBuf {
        self.config_dir.join(format!("{CATEGORY_STORAGE_KEY}.json"))
    }

    /// Ensures the storage directory exists
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> ConfigResult<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).map_err(|e| {
                ConfigError::Write(format!(
                    "Failed to create config directory {}: {}",
                    self.config_dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    // ========== Categories ==========

    /// Loads categories from the category storage file
    ///
    /// Returns an empty vector if the file doesn't exist. Derived `children`
    /// arrays written by older clients are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_categories(&self) -> ConfigResult<Vec<Category>> {
        let file = Self::load_json_file::<CategoryStorageFile>(&self.categories_path())?;
        if file.version > CATEGORY_STORAGE_VERSION {
            tracing::warn!(
                version = file.version,
                "Category storage written by a newer version; loading anyway"
            );
        }
        Ok(file.state.categories)
    }

    /// Saves categories to the category storage file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_categories(&self, categories: &[Category]) -> ConfigResult<()> {
        self.ensure_config_dir()?;
        let file = CategoryStorageFile {
            state: CategoryState {
                categories: categories.to_vec(),
            },
            version: CATEGORY_STORAGE_VERSION,
        };
        Self::save_json_file(&self.categories_path(), &file)
    }

    // ========== Snippets ==========

    /// Loads snippets from the storage file
    ///
    /// Returns an empty vector if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_snippets(&self) -> ConfigResult<Vec<Snippet>> {
        let path = self.config_dir.join(SNIPPETS_FILE);
        Self::load_json_file::<SnippetsFile>(&path).map(|f| f.snippets)
    }

    /// Saves snippets to the storage file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_snippets(&self, snippets: &[Snippet]) -> ConfigResult<()> {
        self.ensure_config_dir()?;
        let path = self.config_dir.join(SNIPPETS_FILE);
        let file = SnippetsFile {
            snippets: snippets.to_vec(),
        };
        Self::save_json_file(&path, &file)
    }

    // ========== Tags ==========

    /// Loads tags from the storage file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_tags(&self) -> ConfigResult<Vec<Tag>> {
        let path = self.config_dir.join(TAGS_FILE);
        Self::load_json_file::<TagsFile>(&path).map(|f| f.tags)
    }

    /// Saves tags to the storage file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_tags(&self, tags: &[Tag]) -> ConfigResult<()> {
        self.ensure_config_dir()?;
        let path = self.config_dir.join(TAGS_FILE);
        let file = TagsFile {
            tags: tags.to_vec(),
        };
        Self::save_json_file(&path, &file)
    }

    // ========== Application Settings ==========

    /// Loads application settings
    ///
    /// Returns default settings if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        let path = self.config_dir.join(SETTINGS_FILE);
        Self::load_toml_file(&path)
    }

    /// Saves application settings
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_settings(&self, settings: &AppSettings) -> ConfigResult<()> {
        self.ensure_config_dir()?;
        let path = self.config_dir.join(SETTINGS_FILE);
        Self::save_toml_file(&path, settings)
    }

    // ========== Generic File Operations ==========

    fn read_file(path: &Path) -> ConfigResult<String> {
        fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn write_file(path: &Path, content: &str) -> ConfigResult<()> {
        fs::write(path, content)
            .map_err(|e| ConfigError::Write(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Loads and parses a JSON file, returning the default if it doesn't exist
    fn load_json_file<T>(path: &Path) -> ConfigResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = Self::read_file(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ConfigError::Deserialize(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Saves data to a JSON file
    fn save_json_file<T>(path: &Path, data: &T) -> ConfigResult<()>
    where
        T: serde::Serialize,
    {
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize: {e}")))?;
        Self::write_file(path, &content)
    }

    /// Loads and parses a TOML file, returning the default if it doesn't exist
    fn load_toml_file<T>(path: &Path) -> ConfigResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = Self::read_file(path)?;
        toml::from_str(&content).map_err(|e| {
            ConfigError::Deserialize(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Saves data to a TOML file
    fn save_toml_file<T>(path: &Path, data: &T) -> ConfigResult<()>
    where
        T: serde::Serialize,
    {
        let content = toml::to_string_pretty(data)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize: {e}")))?;
        Self::write_file(path, &content)
    }

    // ========== Validation ==========

    /// Validates a snippet
    ///
    /// # Errors
    ///
    /// Returns an error if the snippet title is blank.
    pub fn validate_snippet(snippet: &Snippet) -> ConfigResult<()> {
        if snippet.title.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "title".to_string(),
                reason: "Snippet title cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Validates a tag
    ///
    /// # Errors
    ///
    /// Returns an error if the tag name is blank.
    pub fn validate_tag(tag: &Tag) -> ConfigResult<()> {
        if tag.name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "name".to_string(),
                reason: "Tag name cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Validates all snippets and returns errors for invalid ones
    #[must_use]
    pub fn validate_snippets(snippets: &[Snippet]) -> Vec<(usize, ConfigError)> {
        snippets
            .iter()
            .enumerate()
            .filter_map(|(i, snippet)| Self::validate_snippet(snippet).err().map(|e| (i, e)))
            .collect()
    }
}
