//! Repair pass that makes any candidate [`AppState`] satisfy the store's
//! referential and schema invariants.
//!
//! After [`normalize`]:
//!
//! 1. The fallback category exists exactly once (inserted at index 0 when
//!    missing). Later duplicates of any category id are dropped.
//! 2. Every todo references an existing category; dangling references are
//!    rewritten to the fallback category and `updated_at` is refreshed.
//! 3. `filter.category_id` is `all` or an existing category.
//! 4. `ui.editing_todo_id` is `None` or an existing todo.
//! 5. `meta.schema_version` equals [`SCHEMA_VERSION`].
//!
//! Duplicate todo ids are dropped after their first occurrence so the todo
//! sequence is always a set of unique ids.
//!
//! The pass never mutates its input and is idempotent: a second pass over
//! its own output finds nothing to repair.

use std::collections::HashSet;

use crate::model::{
    AppState, Category, CategoryFilter, FALLBACK_CATEGORY_ID, SCHEMA_VERSION, Timestamp,
};

/// What a normalization pass had to fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Repairs {
    pub inserted_fallback: bool,
    pub dropped_categories: usize,
    pub dropped_todos: usize,
    pub reassigned_todos: usize,
    pub reset_filter: bool,
    pub cleared_editing: bool,
    pub restamped_version: bool,
}

impl Repairs {
    /// Returns true when the input already satisfied every invariant.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        !self.inserted_fallback
            && self.dropped_categories == 0
            && self.dropped_todos == 0
            && self.reassigned_todos == 0
            && !self.reset_filter
            && !self.cleared_editing
            && !self.restamped_version
    }
}

/// Normalize `state`, stamping any refreshed timestamps with `now`.
#[must_use]
pub fn normalize(state: &AppState, now: Timestamp) -> AppState {
    normalize_with_report(state, now).0
}

/// Normalize `state` and report what was repaired.
#[must_use]
pub fn normalize_with_report(state: &AppState, now: Timestamp) -> (AppState, Repairs) {
    let mut repairs = Repairs::default();

    let mut seen = HashSet::with_capacity(state.categories.len() + 1);
    let mut categories: Vec<Category> = Vec::with_capacity(state.categories.len() + 1);
    for category in &state.categories {
        if seen.insert(category.id.as_str()) {
            categories.push(category.clone());
        } else {
            repairs.dropped_categories += 1;
        }
    }
    if !seen.contains(FALLBACK_CATEGORY_ID) {
        categories.insert(0, Category::fallback(now));
        repairs.inserted_fallback = true;
    }
    let category_ids: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();

    let mut todo_ids = HashSet::with_capacity(state.todos.len());
    let mut todos = Vec::with_capacity(state.todos.len());
    for todo in &state.todos {
        if !todo_ids.insert(todo.id.as_str()) {
            repairs.dropped_todos += 1;
            continue;
        }
        let mut todo = todo.clone();
        if !category_ids.contains(todo.category_id.as_str()) {
            todo.category_id = FALLBACK_CATEGORY_ID.to_string();
            todo.updated_at = now;
            repairs.reassigned_todos += 1;
        }
        todos.push(todo);
    }

    let mut filter = state.filter.clone();
    if let Some(id) = filter.category_id.category_id()
        && !category_ids.contains(id)
    {
        filter.category_id = CategoryFilter::All;
        repairs.reset_filter = true;
    }

    let mut ui = state.ui.clone();
    if let Some(id) = ui.editing_todo_id.as_deref()
        && !todo_ids.contains(id)
    {
        ui.editing_todo_id = None;
        repairs.cleared_editing = true;
    }

    let mut meta = state.meta;
    if meta.schema_version != SCHEMA_VERSION {
        meta.schema_version = SCHEMA_VERSION;
        repairs.restamped_version = true;
    }

    let normalized = AppState {
        todos,
        categories,
        filter,
        ui,
        meta,
    };
    (normalized, repairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StatusFilter, Todo, create_initial_state};
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn todo(id: &str, category: &str) -> Todo {
        Todo::new(id.into(), format!("todo {id}"), category.into(), t0())
    }

    #[test]
    fn empty_state_gains_fallback_and_version() {
        let (state, repairs) = normalize_with_report(&AppState::default(), t0());
        assert_eq!(state.categories.len(), 1);
        assert_eq!(state.categories[0].id, FALLBACK_CATEGORY_ID);
        assert_eq!(state.meta.schema_version, SCHEMA_VERSION);
        assert!(repairs.inserted_fallback);
        assert!(repairs.restamped_version);
    }

    #[test]
    fn missing_fallback_is_inserted_first() {
        let mut state = create_initial_state(t0());
        state.categories = vec![Category::new("c-work".into(), "Work".into(), t0())];
        let state = normalize(&state, t0());
        assert_eq!(state.categories[0].id, FALLBACK_CATEGORY_ID);
        assert_eq!(state.categories[1].id, "c-work");
    }

    #[test]
    fn fallback_kept_in_place_and_deduplicated() {
        let mut state = create_initial_state(t0());
        state.categories = vec![
            Category::new("c-work".into(), "Work".into(), t0()),
            Category::fallback(t0()),
            Category::fallback(t0()),
        ];
        let (state, repairs) = normalize_with_report(&state, t0());
        let ids: Vec<_> = state.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c-work", FALLBACK_CATEGORY_ID]);
        assert_eq!(repairs.dropped_categories, 1);
        assert!(!repairs.inserted_fallback);
    }

    #[test]
    fn dangling_category_reference_moves_to_fallback() {
        let later = t0() + Duration::minutes(5);
        let mut state = create_initial_state(t0());
        state.todos = vec![todo("t-1", "c-gone"), todo("t-2", FALLBACK_CATEGORY_ID)];
        let (state, repairs) = normalize_with_report(&state, later);

        assert_eq!(state.todos[0].category_id, FALLBACK_CATEGORY_ID);
        assert_eq!(state.todos[0].updated_at, later);
        assert_eq!(state.todos[1].updated_at, t0());
        assert_eq!(repairs.reassigned_todos, 1);
    }

    #[test]
    fn filter_pointing_at_missing_category_resets() {
        let mut state = create_initial_state(t0());
        state.filter.category_id = CategoryFilter::Category("c-gone".into());
        state.filter.status = StatusFilter::Active;
        let state = normalize(&state, t0());
        assert_eq!(state.filter.category_id, CategoryFilter::All);
        assert_eq!(state.filter.status, StatusFilter::Active);
    }

    #[test]
    fn stale_editing_id_is_cleared() {
        let mut state = create_initial_state(t0());
        state.ui.editing_todo_id = Some("t-missing".into());
        let state = normalize(&state, t0());
        assert!(state.ui.editing_todo_id.is_none());
    }

    #[test]
    fn duplicate_todo_ids_keep_first() {
        let mut state = create_initial_state(t0());
        let mut dup = todo("t-1", FALLBACK_CATEGORY_ID);
        dup.title = "second copy".into();
        state.todos = vec![todo("t-1", FALLBACK_CATEGORY_ID), dup];
        let (state, repairs) = normalize_with_report(&state, t0());
        assert_eq!(state.todos.len(), 1);
        assert_eq!(state.todos[0].title, "todo t-1");
        assert_eq!(repairs.dropped_todos, 1);
    }

    #[test]
    fn input_is_not_mutated() {
        let mut state = AppState::default();
        state.todos.push(todo("t-1", "c-gone"));
        let before = state.clone();
        let _ = normalize(&state, t0());
        assert_eq!(state, before);
    }

    #[test]
    fn second_pass_is_clean() {
        let mut state = AppState::default();
        state.todos.push(todo("t-1", "c-gone"));
        state.filter.category_id = CategoryFilter::Category("c-gone".into());
        let once = normalize(&state, t0());
        let (twice, repairs) = normalize_with_report(&once, t0() + Duration::hours(1));
        assert_eq!(once, twice);
        assert!(repairs.is_clean());
    }
}
