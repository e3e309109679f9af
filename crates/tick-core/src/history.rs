//! Bounded past/present/future history over opaque snapshots.

use std::collections::VecDeque;

/// Default number of archived states kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Three-stack undo/redo container.
///
/// `past` is ordered oldest-first and evicts from the front once it holds
/// more than `limit` entries. `future` is ordered nearest-first and is
/// cleared by every recorded commit.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    limit: usize,
}

impl<T> History<T> {
    #[must_use]
    pub fn new(present: T) -> Self {
        Self::with_limit(present, DEFAULT_HISTORY_LIMIT)
    }

    #[must_use]
    pub fn with_limit(present: T, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
            limit,
        }
    }

    #[must_use]
    pub const fn present(&self) -> &T {
        &self.present
    }

    /// Archive the current present and make `next` the present.
    pub fn commit_with_history(&mut self, next: T) {
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push_back(previous);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Replace the present without touching `past` or `future`.
    pub fn replace_present(&mut self, next: T) {
        self.present = next;
    }

    /// Step back one entry. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Step forward one entry. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        true
    }

    /// Drop all archived entries and install a new present.
    pub fn reset(&mut self, present: T) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}
