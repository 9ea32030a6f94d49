//! Snippet model for stored text, code, markdown and links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of content held by a snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetType {
    /// Plain text
    #[default]
    Text,
    /// Source code, optionally with a language
    Code,
    /// Markdown document
    Markdown,
    /// URL
    Link,
}

impl SnippetType {
    /// Lowercase identifier used in storage and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Link => "link",
        }
    }
}

impl std::fmt::Display for SnippetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SnippetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "code" => Ok(Self::Code),
            "markdown" | "md" => Ok(Self::Markdown),
            "link" | "url" => Ok(Self::Link),
            other => Err(format!("unknown snippet type: {other}")),
        }
    }
}

/// A stored snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Unique identifier for the snippet
    pub id: Uuid,
    /// Human-readable title
    pub title: String,
    /// Snippet body
    pub content: String,
    /// Kind of content
    #[serde(rename = "type", default)]
    pub kind: SnippetType,
    /// Category reference (None for uncategorized)
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Tag IDs
    #[serde(default)]
    pub tags: Vec<Uuid>,
    /// Timestamp when the snippet was created
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last modification
    pub updated_at: DateTime<Utc>,
    /// Whether the snippet is pinned to the top
    #[serde(default)]
    pub is_pinned: bool,
    /// Language for code snippets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Snippet {
    /// Creates a new unpinned snippet from a draft
    #[must_use]
    pub fn from_draft(draft: SnippetDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            kind: draft.kind,
            category_id: draft.category_id,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
            is_pinned: false,
            language: draft.language,
        }
    }

    /// Updates the `updated_at` timestamp to now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Applies the set fields of `patch`
    pub fn apply(&mut self, patch: SnippetPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        self.touch();
    }
}

/// Form data for creating a snippet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetDraft {
    /// Title
    pub title: String,
    /// Body
    pub content: String,
    /// Kind of content
    pub kind: SnippetType,
    /// Category reference
    pub category_id: Option<Uuid>,
    /// Tag IDs
    pub tags: Vec<Uuid>,
    /// Language for code snippets
    pub language: Option<String>,
}

impl SnippetDraft {
    /// Creates a draft with the given title and content
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Sets the kind of content
    #[must_use]
    pub const fn with_kind(mut self, kind: SnippetType) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the category
    #[must_use]
    pub const fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets the tags
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<Uuid>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Partial update for a snippet
///
/// `None` leaves a field untouched. The nested options for `category_id` and
/// `language` allow clearing the value with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetPatch {
    /// New title
    pub title: Option<String>,
    /// New body
    pub content: Option<String>,
    /// New kind
    pub kind: Option<SnippetType>,
    /// New category reference
    pub category_id: Option<Option<Uuid>>,
    /// New tag list
    pub tags: Option<Vec<Uuid>>,
    /// New language
    pub language: Option<Option<String>>,
}
