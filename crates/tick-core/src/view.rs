//! Derived read views over an [`AppState`]. All pure, recomputed on read.

use serde::Serialize;
use std::collections::HashMap;

use crate::model::{AppState, Category, FilterState, Todo};

/// Totals over the full todo collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Todos passing the status, category, and search predicates, in order.
///
/// All three predicates are applied to every item and AND-combined; search
/// is a case-insensitive substring match on the trimmed term.
#[must_use]
pub fn filter_todos<'a>(todos: &'a [Todo], filter: &FilterState) -> Vec<&'a Todo> {
    let needle = filter.search.trim().to_lowercase();
    todos
        .iter()
        .filter(|todo| filter.status.admits(todo.completed))
        .filter(|todo| filter.category_id.admits(&todo.category_id))
        .filter(|todo| todo.title_contains(&needle))
        .collect()
}

/// Single-pass totals.
#[must_use]
pub fn counts(todos: &[Todo]) -> Counts {
    todos.iter().fold(Counts::default(), |mut acc, todo| {
        acc.total += 1;
        if todo.completed {
            acc.completed += 1;
        } else {
            acc.active += 1;
        }
        acc
    })
}

#[must_use]
pub fn category_map(categories: &[Category]) -> HashMap<&str, &Category> {
    categories.iter().map(|c| (c.id.as_str(), c)).collect()
}

/// Name of the category the filter points at, or `None` for "all".
#[must_use]
pub fn active_category_name(state: &AppState) -> Option<&str> {
    let id = state.filter.category_id.category_id()?;
    state.category(id).map(|c| c.name.as_str())
}

/// Ids of the visible todos, in display order. This is what the drag layer
/// reports indices against.
#[must_use]
pub fn visible_ids(state: &AppState) -> Vec<String> {
    filter_todos(&state.todos, &state.filter)
        .into_iter()
        .map(|todo| todo.id.clone())
        .collect()
}
