//! Application settings model
//!
//! This module defines the application-wide settings stored in settings.toml,
//! including the persisted view state (theme, sidebar, layout and the current
//! category/tag filter).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application-wide settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// View state
    #[serde(default)]
    pub view: ViewSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Layout used to display the snippet list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Card grid
    #[default]
    Grid,
    /// Compact list
    List,
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

/// Persisted view state
///
/// At most one of `selected_category_id` and `selected_tag_id` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Dark theme enabled
    #[serde(default)]
    pub dark_mode: bool,
    /// Sidebar visible
    #[serde(default = "default_true")]
    pub sidebar_open: bool,
    /// Snippet list layout
    #[serde(default)]
    pub view_mode: ViewMode,
    /// Category filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_category_id: Option<Uuid>,
    /// Tag filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_tag_id: Option<Uuid>,
}

const fn default_true() -> bool {
    true
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            sidebar_open: true,
            view_mode: ViewMode::default(),
            selected_category_id: None,
            selected_tag_id: None,
        }
    }
}

impl ViewSettings {
    /// Sets the theme
    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }

    /// Flips the theme
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Shows or hides the sidebar
    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    /// Flips sidebar visibility
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Sets the list layout
    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    /// Filters by category, clearing any tag filter
    pub fn select_category(&mut self, id: Option<Uuid>) {
        self.selected_category_id = id;
        self.selected_tag_id = None;
    }

    /// Filters by tag, clearing any category filter
    pub fn select_tag(&mut self, id: Option<Uuid>) {
        self.selected_tag_id = id;
        self.selected_category_id = None;
    }

    /// Clears both filters
    pub fn clear_filters(&mut self) {
        self.selected_category_id = None;
        self.selected_tag_id = None;
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_is_exclusive() {
        let mut view = ViewSettings::default();
        let category = Uuid::new_v4();
        let tag = Uuid::new_v4();

        view.select_category(Some(category));
        assert_eq!(view.selected_category_id, Some(category));

        view.select_tag(Some(tag));
        assert_eq!(view.selected_tag_id, Some(tag));
        assert!(view.selected_category_id.is_none());

        view.clear_filters();
        assert!(view.selected_tag_id.is_none());
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let settings: AppSettings = toml::from_str("").unwrap();
        assert!(settings.view.sidebar_open);
        assert!(!settings.view.dark_mode);
        assert_eq!(settings.view.view_mode, ViewMode::Grid);
        assert_eq!(settings.logging.level, "warn");
    }

    #[test]
    fn test_toggles() {
        let mut view = ViewSettings::default();
        view.toggle_dark_mode();
        view.toggle_sidebar();
        assert!(view.dark_mode);
        assert!(!view.sidebar_open);
    }
}
