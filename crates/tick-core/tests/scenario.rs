//! End-to-end store scenarios: command sequences, history limits, and
//! persistence across store instances.

use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use tick_core::config::StoreConfig;
use tick_core::model::{FALLBACK_CATEGORY_ID, StatusFilter};
use tick_core::notify::{ChangeKind, ChannelObserver};
use tick_core::persist::{JsonFileBackend, MemoryBackend, PersistenceBackend};
use tick_core::store::Store;

use generators::test_store;

#[test]
fn add_reject_toggle_undo_and_protected_fallback() {
    let (mut store, _, _) = test_store();
    assert!(store.todos().is_empty());

    let id = store
        .add_todo("Buy milk", FALLBACK_CATEGORY_ID)
        .expect("title is long enough");
    let visible = store.filtered_todos();
    assert_eq!(visible.len(), 1);
    assert!(!visible[0].completed);
    assert_eq!(visible[0].category_id, FALLBACK_CATEGORY_ID);

    assert!(store.add_todo("x", FALLBACK_CATEGORY_ID).is_none());
    assert_eq!(store.todos().len(), 1);

    assert!(store.toggle_todo(&id));
    assert!(store.todo(&id).expect("todo").completed);
    assert!(store.undo());
    assert!(!store.todo(&id).expect("todo").completed);

    let categories = store.categories().len();
    assert!(!store.delete_category(FALLBACK_CATEGORY_ID));
    assert_eq!(store.categories().len(), categories);
}

#[test]
fn undo_restores_exact_state_and_redo_reapplies() {
    let (mut store, _, _) = test_store();
    let work = store.add_category("Work").expect("category");
    let id = store.add_todo("Write report", &work).expect("todo");

    let before = store.snapshot();
    assert!(store.delete_todo(&id));
    let after = store.snapshot();

    assert!(store.undo());
    assert_eq!(*store.state(), *before);
    assert!(store.redo());
    assert_eq!(*store.state(), *after);
}

#[test]
fn history_keeps_only_the_newest_fifty_states() {
    let (mut store, _, _) = test_store();
    for n in 0..60 {
        store
            .add_todo(&format!("todo number {n}"), FALLBACK_CATEGORY_ID)
            .expect("added");
    }
    assert_eq!(store.history_len(), 50);

    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert_eq!(undone, 50);
    // The ten oldest additions are no longer reachable.
    assert_eq!(store.todos().len(), 10);
    assert!(!store.can_undo());
}

#[test]
fn history_limit_comes_from_config() {
    let config = StoreConfig {
        history_limit: 3,
        persist_debounce_ms: 60_000,
        ..StoreConfig::default()
    };
    let mut store = Store::open(MemoryBackend::new(), config).expect("open");
    for title in ["one!", "two!", "three", "four!"] {
        store.add_todo(title, FALLBACK_CATEGORY_ID).expect("added");
    }
    assert_eq!(store.history_len(), 3);
}

#[test]
fn derived_views_track_the_present() {
    let (mut store, _, _) = test_store();
    let home = store.add_category("Home").expect("category");
    let a = store.add_todo("Paint fence", &home).expect("todo");
    store.add_todo("Pay invoices", FALLBACK_CATEGORY_ID).expect("todo");
    store.add_todo("Plant tulips", &home).expect("todo");
    assert!(store.toggle_todo(&a));

    let counts = store.counts();
    assert_eq!((counts.total, counts.active, counts.completed), (3, 2, 1));

    assert!(store.set_filter_category(home.as_str()));
    assert_eq!(store.active_category_name(), Some("Home"));
    assert_eq!(store.filtered_todos().len(), 2);

    assert!(store.set_filter_status(StatusFilter::Active));
    assert!(store.set_search("TULIP"));
    let titles: Vec<&str> = store
        .filtered_todos()
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, ["Plant tulips"]);
    // Counts always cover the full collection.
    assert_eq!(store.counts().total, 3);
}

#[test]
fn state_survives_reopen_through_json_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("state.json");

    {
        let mut store =
            Store::open(JsonFileBackend::new(&path), StoreConfig::default()).expect("open");
        let id = store.add_todo("Renew passport", FALLBACK_CATEGORY_ID).expect("todo");
        assert!(store.toggle_todo(&id));
        assert!(store.set_search("pass"));
        store.close().expect("close");
    }

    let store = Store::open(JsonFileBackend::new(&path), StoreConfig::default()).expect("reopen");
    assert_eq!(store.todos().len(), 1);
    assert!(store.todos()[0].completed);
    assert_eq!(store.filter_state().search, "pass");
    // History is session-scoped.
    assert!(!store.can_undo());
}

#[test]
fn persisted_payload_uses_documented_shape() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("state.json");
    let mut store = Store::open(JsonFileBackend::new(&path), StoreConfig::default()).expect("open");
    store.add_todo("Check shape", FALLBACK_CATEGORY_ID).expect("todo");
    store.flush().expect("flush");

    let raw = std::fs::read_to_string(&path).expect("read");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["todos"][0]["categoryId"], FALLBACK_CATEGORY_ID);
    assert_eq!(json["meta"]["schemaVersion"], 1);
    assert_eq!(json["filter"]["categoryId"], "all");
    assert!(json["ui"]["editingTodoId"].is_null());
}

#[test]
fn burst_of_commands_is_written_once() {
    let backend = MemoryBackend::new();
    let config = StoreConfig {
        persist_debounce_ms: 40,
        ..StoreConfig::default()
    };
    let mut store = Store::builder(backend.clone())
        .config(config)
        .open()
        .expect("open");

    for term in ["m", "mi", "mil", "milk"] {
        assert!(store.set_search(term));
    }
    std::thread::sleep(Duration::from_millis(400));
    assert_eq!(backend.saves(), 1);
    let saved = backend.load().expect("load").expect("state");
    assert_eq!(saved.filter.search, "milk");
}

#[test]
fn reset_all_clears_storage_and_history() {
    let (mut store, backend, _) = test_store();
    store.add_todo("Temporary", FALLBACK_CATEGORY_ID).expect("todo");
    store.flush().expect("flush");
    assert!(backend.raw().is_some());

    store.add_todo("Also temporary", FALLBACK_CATEGORY_ID).expect("todo");
    store.reset_all();
    store.flush().expect("flush");

    assert!(backend.raw().is_none());
    assert!(store.todos().is_empty());
    assert_eq!(store.categories().len(), 1);
    assert!(!store.can_undo());
    assert!(!store.can_redo());
}

#[test]
fn channel_observer_receives_snapshots() {
    let (tx, rx) = mpsc::channel();
    let mut store = Store::builder(MemoryBackend::new())
        .observer(ChannelObserver::new(tx))
        .open()
        .expect("open");

    let id = store.add_todo("Observe me", FALLBACK_CATEGORY_ID).expect("todo");
    assert!(store.start_editing(&id));

    let (state, change) = rx.recv().expect("first change");
    assert_eq!(change.command, "add_todo");
    assert_eq!(change.kind, ChangeKind::Recorded);
    assert_eq!(state.todos.len(), 1);

    let (state, change) = rx.recv().expect("second change");
    assert_eq!(change.kind, ChangeKind::Transient);
    assert_eq!(state.ui.editing_todo_id.as_deref(), Some(id.as_str()));
    assert!(Arc::ptr_eq(&state, &store.snapshot()));
}

#[test]
fn backend_trait_objects_are_interchangeable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let backends: Vec<Arc<dyn PersistenceBackend>> = vec![
        Arc::new(MemoryBackend::new()),
        Arc::new(JsonFileBackend::new(dir.path().join("state.json"))),
    ];
    for backend in backends {
        let mut store = Store::builder_shared(Arc::clone(&backend))
            .open()
            .expect("open");
        store.add_todo("Shared backend", FALLBACK_CATEGORY_ID).expect("todo");
        store.close().expect("close");
        let loaded = backend.load().expect("load").expect("state");
        assert_eq!(loaded.todos.len(), 1);
    }
}
