//! Category tree management
//!
//! This module provides the `CategoryManager`, which owns the flat category
//! collection, enforces sibling-name uniqueness and acyclicity on mutation,
//! and derives tree, flat and path views on demand.

mod manager;
mod outcome;

pub use manager::{compare_names, CategoryManager};
pub use outcome::{CreateOutcome, MutationOutcome};
