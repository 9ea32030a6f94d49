//! Property-based tests for tags

use std::collections::HashSet;

use proptest::prelude::*;
use snipshelf_core::{ConfigManager, MutationOutcome, TagManager};
use tempfile::TempDir;

fn create_test_manager() -> (TagManager, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config_manager = ConfigManager::with_config_dir(temp_dir.path().to_path_buf());
    let manager = TagManager::new(config_manager).unwrap();
    (manager, temp_dir)
}

fn arb_tag_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9-]{0,10}".prop_map(|s| s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Tag names stay unique ignoring case, whatever gets added
    #[test]
    fn tag_names_unique(names in prop::collection::vec(arb_tag_name(), 0..20)) {
        let (mut manager, _temp) = create_test_manager();

        for name in &names {
            manager.add_tag(name, "#888888").unwrap();
        }

        let expected: HashSet<String> = names.iter().map(|n| n.to_lowercase()).collect();
        let actual: HashSet<String> = manager
            .get_all_tags()
            .iter()
            .map(|t| t.name.to_lowercase())
            .collect();

        prop_assert_eq!(manager.tag_count(), expected.len());
        prop_assert_eq!(actual, expected);
    }

    /// Renaming onto another tag's name leaves both tags untouched
    #[test]
    fn rename_collision_rejected(a in arb_tag_name(), b in arb_tag_name()) {
        prop_assume!(a.to_lowercase() != b.to_lowercase());
        let (mut manager, _temp) = create_test_manager();

        let a_id = manager.add_tag(&a, "#111111").unwrap().id();
        let b_id = manager.add_tag(&b, "#222222").unwrap().id();

        let outcome = manager
            .update_tag(a_id, Some(&b.to_uppercase()), None)
            .unwrap();

        prop_assert_eq!(outcome, MutationOutcome::RejectedDuplicate);
        prop_assert_eq!(&manager.get_tag(a_id).unwrap().name, &a);
        prop_assert_eq!(&manager.get_tag(b_id).unwrap().name, &b);
    }
}
