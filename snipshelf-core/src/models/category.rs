//! Category model for hierarchical organization of snippets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named node in the category forest
///
/// Only the flat record is stored. Children are derived on demand by the
/// tree-building queries of [`CategoryManager`](crate::category::CategoryManager)
/// and carried by [`CategoryNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier for the category
    pub id: Uuid,
    /// Display name, trimmed on create and rename
    pub name: String,
    /// Parent category ID (None for root-level categories)
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

impl Category {
    /// Creates a new root-level category
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            parent_id: None,
        }
    }

    /// Creates a new category under `parent_id`
    #[must_use]
    pub fn with_parent(name: String, parent_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            parent_id: Some(parent_id),
        }
    }

    /// Returns true if this is a root-level category
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Case-insensitive name used for sibling uniqueness
    #[must_use]
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// A category together with its derived, ordered children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    /// The stored category record
    #[serde(flatten)]
    pub category: Category,
    /// Children, deduplicated by name and sorted alphabetically
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Category ID of this node
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.category.id
    }

    /// Category name of this node
    #[must_use]
    pub fn name(&self) -> &str {
        &self.category.name
    }

    /// Number of nodes in this subtree, including this node
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}
