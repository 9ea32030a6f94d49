//! Property-based tests for snippet storage and filters

use proptest::prelude::*;
use snipshelf_core::text::{snippet_preview, truncate_text};
use snipshelf_core::{ConfigManager, SnippetDraft, SnippetManager, SnippetPatch};
use tempfile::TempDir;
use uuid::Uuid;

fn create_test_manager() -> (SnippetManager, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config_manager = ConfigManager::with_config_dir(temp_dir.path().to_path_buf());
    let manager = SnippetManager::new(config_manager).unwrap();
    (manager, temp_dir)
}

// ========== Generators ==========

fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,20}".prop_map(|s| s)
}

fn arb_content() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,\n]{0,200}".prop_map(|s| s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Snippets written to disk come back identical
    #[test]
    fn snippets_survive_reload(
        entries in prop::collection::vec((arb_title(), arb_content(), any::<bool>()), 1..8),
    ) {
        let (mut manager, temp) = create_test_manager();
        let category = Uuid::new_v4();

        for (title, content, categorized) in &entries {
            let mut draft = SnippetDraft::new(title.clone(), content.clone());
            if *categorized {
                draft = draft.with_category(category);
            }
            manager.create_snippet(draft).unwrap();
        }

        let config = ConfigManager::with_config_dir(temp.path().to_path_buf());
        let reloaded = SnippetManager::new(config).unwrap();

        prop_assert_eq!(reloaded.list_snippets(), manager.list_snippets());
    }

    /// Category filtering partitions the collection
    #[test]
    fn category_filter_partitions(
        assignments in prop::collection::vec(prop::option::of(0usize..3), 0..12),
    ) {
        let (mut manager, _temp) = create_test_manager();
        let categories = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        for (i, assignment) in assignments.iter().enumerate() {
            let mut draft = SnippetDraft::new(format!("Snippet {i}"), "");
            if let Some(index) = assignment {
                draft = draft.with_category(categories[*index]);
            }
            manager.create_snippet(draft).unwrap();
        }

        let total = manager.get_by_category(None).len()
            + categories
                .iter()
                .map(|c| manager.get_by_category(Some(*c)).len())
                .sum::<usize>();
        prop_assert_eq!(total, manager.snippet_count());
    }

    /// Search matches regardless of the query's case
    #[test]
    fn search_ignores_case(title in arb_title(), content in arb_content()) {
        let (mut manager, _temp) = create_test_manager();
        let id = manager
            .create_snippet(SnippetDraft::new(title.clone(), content))
            .unwrap();

        let upper = manager.search(&title.to_uppercase());
        let lower = manager.search(&title.to_lowercase());

        prop_assert!(upper.iter().any(|s| s.id == id));
        prop_assert!(lower.iter().any(|s| s.id == id));
    }

    /// Toggling the pin twice restores the original state
    #[test]
    fn toggle_pin_twice_is_identity(title in arb_title()) {
        let (mut manager, _temp) = create_test_manager();
        let id = manager.create_snippet(SnippetDraft::new(title, "")).unwrap();

        prop_assert!(manager.toggle_pin(id).unwrap());
        prop_assert!(!manager.toggle_pin(id).unwrap());
        prop_assert!(manager.get_pinned().is_empty());
    }

    /// A blank title never gets stored, on create or on update
    #[test]
    fn blank_title_rejected(blank in "[ \t]{0,5}", title in arb_title()) {
        let (mut manager, _temp) = create_test_manager();

        prop_assert!(manager.create_snippet(SnippetDraft::new(blank.clone(), "body")).is_err());

        let id = manager.create_snippet(SnippetDraft::new(title.clone(), "body")).unwrap();
        let patch = SnippetPatch {
            title: Some(blank),
            ..SnippetPatch::default()
        };
        prop_assert!(manager.update_snippet(id, patch).is_err());
        prop_assert_eq!(&manager.get_snippet(id).unwrap().title, &title);
    }

    /// Truncation never yields more than the limit plus the ellipsis
    #[test]
    fn truncate_respects_limit(text in "\\PC{0,300}", max_len in 0usize..150) {
        let truncated = truncate_text(&text, max_len);
        let count = text.chars().count();

        if count <= max_len {
            prop_assert_eq!(truncated, text);
        } else {
            prop_assert_eq!(truncated.chars().count(), max_len + 3);
            prop_assert!(truncated.ends_with("..."));
        }
    }

    /// Previews of plain text are just trimmed and truncated
    #[test]
    fn preview_of_plain_text(content in "[a-zA-Z0-9 ,.]{0,200}") {
        prop_assert_eq!(snippet_preview(&content, 50), truncate_text(content.trim(), 50));
    }
}
