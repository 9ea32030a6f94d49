//! Outcomes reported by category and tag mutations.

use uuid::Uuid;

/// Result of an idempotent create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new record was appended
    Created(Uuid),
    /// A record with the same normalized name already existed; nothing changed
    AlreadyExists(Uuid),
}

impl CreateOutcome {
    /// ID of the created or pre-existing record
    #[must_use]
    pub const fn id(self) -> Uuid {
        match self {
            Self::Created(id) | Self::AlreadyExists(id) => id,
        }
    }

    /// Returns true if a new record was appended
    #[must_use]
    pub const fn is_created(self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Result of a rename, move or delete
///
/// Only `Applied` changes state. Every other variant leaves the collection
/// exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The change was made
    Applied,
    /// The record already had the requested value
    Unchanged,
    /// No record with the given ID
    NotFound,
    /// A sibling already uses the requested name
    RejectedDuplicate,
    /// The new parent is the record itself or one of its descendants
    RejectedCycle,
}

impl MutationOutcome {
    /// Returns true if state changed
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Returns true if the request was refused
    #[must_use]
    pub const fn is_rejected(self) -> bool {
        matches!(self, Self::RejectedDuplicate | Self::RejectedCycle)
    }
}

impl std::fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::NotFound => "not found",
            Self::RejectedDuplicate => "a sibling already has that name",
            Self::RejectedCycle => "target is the category itself or one of its descendants",
        };
        f.write_str(text)
    }
}
