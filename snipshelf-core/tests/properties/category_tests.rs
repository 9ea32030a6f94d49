//! Property-based tests for the category tree
//!
//! Covers idempotent create, acyclicity under arbitrary moves, cascade
//! delete counts, path shape and ordering of the derived tree.

use std::cmp::Ordering;
use std::collections::HashSet;

use proptest::prelude::*;
use snipshelf_core::category::compare_names;
use snipshelf_core::{CategoryManager, CategoryNode, ConfigManager, MutationOutcome};
use tempfile::TempDir;
use uuid::Uuid;

fn create_test_manager() -> (CategoryManager, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config_manager = ConfigManager::with_config_dir(temp_dir.path().to_path_buf());
    let mut manager = CategoryManager::new(config_manager).unwrap();
    // Persistence is covered by unit tests; keep property runs in memory
    manager.set_autosave(false);
    (manager, temp_dir)
}

// ========== Generators ==========

// Strategy for generating category names (non-empty, may vary in case)
fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 _-]{0,15}".prop_map(|s| s)
}

// Strategy for a forest: each entry names its parent by index into earlier entries
fn arb_forest() -> impl Strategy<Value = Vec<(String, Option<prop::sample::Index>)>> {
    prop::collection::vec(
        (arb_name(), prop::option::weighted(0.7, any::<prop::sample::Index>())),
        1..20,
    )
}

/// Creates the forest and returns the IDs in creation order
fn build_forest(
    manager: &mut CategoryManager,
    entries: &[(String, Option<prop::sample::Index>)],
) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = Vec::new();
    for (name, parent) in entries {
        let parent_id = match parent {
            Some(index) if !ids.is_empty() => Some(ids[index.index(ids.len())]),
            _ => None,
        };
        let id = manager.create_category(name, parent_id).id();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[derive(Debug, Clone)]
enum Op {
    Create(String, Option<prop::sample::Index>),
    Rename(prop::sample::Index, String),
    Move(prop::sample::Index, Option<prop::sample::Index>),
    Delete(prop::sample::Index),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (arb_name(), prop::option::of(any::<prop::sample::Index>()))
            .prop_map(|(n, p)| Op::Create(n, p)),
        (any::<prop::sample::Index>(), arb_name()).prop_map(|(i, n)| Op::Rename(i, n)),
        (
            any::<prop::sample::Index>(),
            prop::option::of(any::<prop::sample::Index>())
        )
            .prop_map(|(i, p)| Op::Move(i, p)),
        any::<prop::sample::Index>().prop_map(Op::Delete),
    ]
}

fn pick(manager: &CategoryManager, index: &prop::sample::Index) -> Option<Uuid> {
    let categories = manager.categories();
    if categories.is_empty() {
        None
    } else {
        Some(categories[index.index(categories.len())].id)
    }
}

fn apply(manager: &mut CategoryManager, op: &Op) {
    match op {
        Op::Create(name, parent) => {
            let parent_id = parent.as_ref().and_then(|p| pick(manager, p));
            manager.create_category(name, parent_id);
        }
        Op::Rename(index, name) => {
            if let Some(id) = pick(manager, index) {
                manager.rename_category(id, name);
            }
        }
        Op::Move(index, parent) => {
            if let Some(id) = pick(manager, index) {
                let parent_id = parent.as_ref().and_then(|p| pick(manager, p));
                manager.move_category(id, parent_id);
            }
        }
        Op::Delete(index) => {
            if let Some(id) = pick(manager, index) {
                manager.delete_category(id);
            }
        }
    }
}

fn assert_level_sorted_and_unique(nodes: &[CategoryNode]) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for node in nodes {
        prop_assert!(
            seen.insert(node.name().to_lowercase()),
            "Sibling names in the tree should be unique: {}",
            node.name()
        );
    }
    for pair in nodes.windows(2) {
        prop_assert_ne!(
            compare_names(pair[0].name(), pair[1].name()),
            Ordering::Greater,
            "Siblings should be sorted alphabetically"
        );
    }
    for node in nodes {
        assert_level_sorted_and_unique(&node.children)?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Creating the same name twice under the same parent, with different
    /// case and padding, yields one record and the same ID.
    #[test]
    fn create_is_idempotent(
        name in arb_name(),
        left_pad in " {0,3}",
        right_pad in " {0,3}",
        upper in any::<bool>(),
    ) {
        let (mut manager, _temp) = create_test_manager();

        let first = manager.create_category(&name, None);
        let variant = if upper { name.to_uppercase() } else { name.to_lowercase() };
        let second = manager.create_category(&format!("{left_pad}{variant}{right_pad}"), None);

        prop_assert!(first.is_created());
        prop_assert_eq!(first.id(), second.id());
        prop_assert_eq!(manager.category_count(), 1);
    }

    /// No sequence of operations makes a category its own ancestor.
    #[test]
    fn hierarchy_stays_acyclic(
        forest in arb_forest(),
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let (mut manager, _temp) = create_test_manager();
        build_forest(&mut manager, &forest);

        for op in &ops {
            apply(&mut manager, op);
            prop_assert!(manager.validate_hierarchy(), "Hierarchy should stay acyclic after {:?}", op);
        }
    }

    /// Moving A under B and then B under A rejects the second move.
    #[test]
    fn reverse_move_is_rejected(
        forest in arb_forest(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let (mut manager, _temp) = create_test_manager();
        let ids = build_forest(&mut manager, &forest);
        let a = ids[a.index(ids.len())];
        let b = ids[b.index(ids.len())];
        prop_assume!(a != b);

        let first = manager.move_category(a, Some(b));
        if first.is_applied() || first == MutationOutcome::Unchanged {
            let b_parent = manager.get_category(b).unwrap().parent_id;
            prop_assert_eq!(manager.move_category(b, Some(a)), MutationOutcome::RejectedCycle);
            prop_assert_eq!(manager.get_category(a).unwrap().parent_id, Some(b));
            prop_assert_eq!(manager.get_category(b).unwrap().parent_id, b_parent);
        } else {
            // a could not move because b is already below a
            prop_assert_eq!(first, MutationOutcome::RejectedCycle);
        }
    }

    /// Deleting a category with N descendants removes exactly N + 1 records
    /// and leaves every category outside that subtree in place.
    #[test]
    fn delete_removes_exactly_the_subtree(
        forest in arb_forest(),
        target in any::<prop::sample::Index>(),
    ) {
        let (mut manager, _temp) = create_test_manager();
        let ids = build_forest(&mut manager, &forest);
        let target = ids[target.index(ids.len())];

        let subtree: HashSet<Uuid> = manager.descendant_ids(target).into_iter().collect();
        let before = manager.category_count();
        let outside: Vec<_> = manager
            .categories()
            .iter()
            .filter(|c| !subtree.contains(&c.id))
            .cloned()
            .collect();

        prop_assert_eq!(manager.delete_category(target), MutationOutcome::Applied);

        prop_assert_eq!(manager.category_count(), before - subtree.len());
        prop_assert_eq!(manager.categories(), outside.as_slice());
    }

    /// A path runs from a root down to the requested category along parent links.
    #[test]
    fn path_runs_root_to_leaf(
        forest in arb_forest(),
        target in any::<prop::sample::Index>(),
    ) {
        let (mut manager, _temp) = create_test_manager();
        let ids = build_forest(&mut manager, &forest);
        let target = ids[target.index(ids.len())];

        let path = manager.get_category_path(target);

        prop_assert!(!path.is_empty());
        prop_assert!(path[0].is_root());
        prop_assert_eq!(path[path.len() - 1].id, target);
        for pair in path.windows(2) {
            prop_assert_eq!(pair[1].parent_id, Some(pair[0].id));
        }
    }

    /// Every level of the derived tree is sorted and free of case-variant duplicates,
    /// and without duplicates the tree covers every category.
    #[test]
    fn tree_levels_sorted_and_complete(forest in arb_forest()) {
        let (mut manager, _temp) = create_test_manager();
        build_forest(&mut manager, &forest);

        let roots = manager.get_root_categories();
        assert_level_sorted_and_unique(&roots)?;

        let total: usize = roots.iter().map(CategoryNode::subtree_len).sum();
        prop_assert_eq!(total, manager.category_count());
        prop_assert_eq!(manager.get_all_categories().len(), manager.category_count());
    }

    /// Renaming to a name a sibling already uses keeps the original name.
    #[test]
    fn rename_to_sibling_name_is_noop(a_name in arb_name(), b_name in arb_name()) {
        prop_assume!(a_name.trim().to_lowercase() != b_name.trim().to_lowercase());
        let (mut manager, _temp) = create_test_manager();

        let a = manager.create_category(&a_name, None).id();
        manager.create_category(&b_name, None);

        prop_assert_eq!(
            manager.rename_category(a, &b_name.to_uppercase()),
            MutationOutcome::RejectedDuplicate
        );
        prop_assert_eq!(&manager.get_category(a).unwrap().name, a_name.trim());
    }
}
