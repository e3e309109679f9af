use proptest::prelude::*;
use std::collections::HashSet;
use tick_core::model::{FALLBACK_CATEGORY_ID, SCHEMA_VERSION, StatusFilter};
use tick_core::normalize::{normalize, normalize_with_report};

use generators::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn normalization_is_idempotent(state in arb_state(), later in arb_timestamp()) {
        let once = normalize(&state, base_time());
        let (twice, repairs) = normalize_with_report(&once, later);
        prop_assert_eq!(&once, &twice);
        prop_assert!(repairs.is_clean());
    }

    #[test]
    fn normalized_state_satisfies_invariants(state in arb_state()) {
        let s = normalize(&state, base_time());

        let fallback = s.categories.iter().filter(|c| c.id == FALLBACK_CATEGORY_ID).count();
        prop_assert_eq!(fallback, 1);

        let category_ids: HashSet<&str> = s.categories.iter().map(|c| c.id.as_str()).collect();
        prop_assert_eq!(category_ids.len(), s.categories.len());
        for todo in &s.todos {
            prop_assert!(category_ids.contains(todo.category_id.as_str()));
        }
        if let Some(id) = s.filter.category_id.category_id() {
            prop_assert!(category_ids.contains(id));
        }
        if let Some(id) = s.ui.editing_todo_id.as_deref() {
            prop_assert!(s.todos.iter().any(|t| t.id == id));
        }
        let todo_ids: HashSet<&str> = s.todos.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(todo_ids.len(), s.todos.len());
        prop_assert_eq!(s.meta.schema_version, SCHEMA_VERSION);
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn fallback_category_survives_any_command_sequence(
        cmds in prop::collection::vec(arb_cmd(), 0..40),
    ) {
        let (mut store, _, _) = test_store();
        for cmd in &cmds {
            apply(&mut store, cmd);
            prop_assert!(store.categories().iter().any(|c| c.id == FALLBACK_CATEGORY_ID));
        }
        let before = store.categories().len();
        prop_assert!(!store.delete_category(FALLBACK_CATEGORY_ID));
        prop_assert_eq!(store.categories().len(), before);
    }

    #[test]
    fn undo_then_redo_restores_exact_states(
        setup in prop::collection::vec(arb_cmd(), 0..20),
        cmd in arb_domain_cmd(),
    ) {
        let (mut store, _, _) = test_store();
        for c in &setup {
            apply(&mut store, c);
        }

        let before = store.snapshot();
        let redo_before = store.can_redo();
        if apply(&mut store, &cmd) {
            let after = store.snapshot();
            if after.todos != before.todos || after.categories != before.categories {
                prop_assert!(store.can_undo());
                prop_assert!(!store.can_redo());

                prop_assert!(store.undo());
                prop_assert_eq!(store.state(), &*before);

                prop_assert!(store.redo());
                prop_assert_eq!(store.state(), &*after);
            }
        } else {
            prop_assert_eq!(store.state(), &*before);
            prop_assert_eq!(store.can_redo(), redo_before);
        }
    }

    #[test]
    fn view_only_commands_never_touch_history(
        setup in prop::collection::vec(arb_cmd(), 0..20),
        view_cmds in prop::collection::vec(arb_view_cmd(), 1..10),
    ) {
        let (mut store, _, _) = test_store();
        for c in &setup {
            apply(&mut store, c);
        }
        let flags = (store.can_undo(), store.can_redo(), store.history_len());
        let todos = store.todos().to_vec();
        for c in &view_cmds {
            prop_assert!(c.is_view_only());
            apply(&mut store, c);
            prop_assert_eq!((store.can_undo(), store.can_redo(), store.history_len()), flags);
        }
        prop_assert_eq!(store.todos(), todos.as_slice());
    }

    #[test]
    fn reorder_never_moves_hidden_todos(from in 0usize..3, to in 0usize..3) {
        let (mut store, _, _) = test_store();
        for title in ["eee", "ddd", "ccc", "bbb", "aaa"] {
            store.add_todo(title, FALLBACK_CATEGORY_ID).expect("added");
        }
        let hidden = [store.todos()[1].id.clone(), store.todos()[3].id.clone()];
        for id in &hidden {
            prop_assert!(store.toggle_todo(id));
        }
        prop_assert!(store.set_filter_status(StatusFilter::Active));

        let ids_before: HashSet<String> = store.todos().iter().map(|t| t.id.clone()).collect();
        let visible = store.visible_ids();
        prop_assert_eq!(visible.len(), 3);

        let moved = store.reorder_todos(&visible, from, to);
        prop_assert_eq!(moved, from != to);
        prop_assert_eq!(&store.todos()[1].id, &hidden[0]);
        prop_assert_eq!(&store.todos()[3].id, &hidden[1]);

        let ids_after: HashSet<String> = store.todos().iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(ids_before, ids_after);
    }
}
