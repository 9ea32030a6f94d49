//! Tag model for cross-cutting snippet labels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A colored label attached to snippets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier for the tag
    pub id: Uuid,
    /// Name, unique case-insensitively across all tags
    pub name: String,
    /// CSS color string
    pub color: String,
}

impl Tag {
    /// Creates a new tag
    #[must_use]
    pub fn new(name: String, color: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            color,
        }
    }
}
