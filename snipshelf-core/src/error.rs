//! Error types for `SnipShelf`
//!
//! This module defines the error types used by the storage layer and the
//! snippet/tag collections. Category tree mutations do not fail; they report
//! a [`MutationOutcome`](crate::category::MutationOutcome) instead.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for `SnipShelf` operations
#[derive(Debug, Error)]
pub enum SnipShelfError {
    /// Configuration and storage errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snippet collection errors
    #[error("Snippet error: {0}")]
    Snippet(#[from] SnippetError),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to storage file operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse a storage file
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid value
    #[error("Invalid configuration value for {field}: {reason}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// The reason for validation failure
        reason: String,
    },

    /// Storage location could not be resolved
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to write a storage file
    #[error("Failed to write configuration: {0}")]
    Write(String),

    /// Failed to serialize state
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Failed to deserialize state
    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(String),
}

/// Errors related to snippet operations
#[derive(Debug, Error)]
pub enum SnippetError {
    /// Snippet does not exist
    #[error("Snippet not found: {0}")]
    NotFound(Uuid),

    /// Snippet failed validation
    #[error("Invalid snippet: {0}")]
    Invalid(String),

    /// Underlying storage failure
    #[error(transparent)]
    Storage(#[from] ConfigError),
}

/// Result type alias for `SnipShelf` operations
pub type Result<T> = std::result::Result<T, SnipShelfError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for snippet operations
pub type SnippetResult<T> = std::result::Result<T, SnippetError>;
