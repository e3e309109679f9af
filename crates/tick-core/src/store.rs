//! The state store: sole owner of the present [`AppState`].
//!
//! Every command computes a candidate next state from a copy of the present
//! and funnels it through a single `commit` step, which normalizes it, records (or
//! skips) history, schedules a debounced write, and notifies observers.
//! Rejected input turns a command into a no-op; commands never fail.
//!
//! # Lifecycle
//!
//! construct ([`Store::builder`]) → load from the backend → normalize → ready.
//! Dropping the store flushes any pending write.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::PersistError;
use crate::history::History;
use crate::ids::{IdKind, IdSource, RandomIds};
use crate::model::{
    AppState, Category, CategoryFilter, FALLBACK_CATEGORY_ID, FilterState, StatusFilter,
    Timestamp, Todo, create_initial_state, is_fallback_category,
};
use crate::normalize::{normalize, normalize_with_report};
use crate::notify::{Change, ChangeKind, ChangeObserver};
use crate::persist::{DebouncedWriter, PersistenceBackend};
use crate::reorder::reorder_visible;
use crate::view::{self, Counts};

const MAX_ID_ATTEMPTS: usize = 16;

/// Collaborators and settings for a [`Store`], assembled before loading.
pub struct StoreBuilder {
    backend: Arc<dyn PersistenceBackend>,
    config: StoreConfig,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
    observers: Vec<Box<dyn ChangeObserver>>,
}

impl StoreBuilder {
    #[must_use]
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: impl ChangeObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Load the persisted snapshot (if any), normalize it, and start the
    /// persistence writer.
    ///
    /// A backend read or decode failure is logged and the store starts from
    /// the fresh initial state.
    ///
    /// # Errors
    ///
    /// Fails only if the persistence writer thread cannot be started.
    pub fn open(self) -> Result<Store, PersistError> {
        let now = self.clock.now();
        let loaded = match self.backend.load() {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(code = %err.code(), error = %err, "could not load persisted state; starting fresh");
                None
            }
        };

        let initial = match loaded {
            Some(persisted) => {
                let (state, repairs) = normalize_with_report(&persisted, now);
                if !repairs.is_clean() {
                    warn!(?repairs, "persisted state needed repairs");
                }
                state
            }
            None => normalize(&create_initial_state(now), now),
        };

        let writer =
            DebouncedWriter::spawn(Arc::clone(&self.backend), self.config.persist_debounce())?;
        debug!(
            todos = initial.todos.len(),
            categories = initial.categories.len(),
            "store ready"
        );

        Ok(Store {
            history: History::with_limit(Arc::new(initial), self.config.history_limit),
            backend: self.backend,
            writer,
            clock: self.clock,
            ids: self.ids,
            observers: self.observers,
            config: self.config,
        })
    }
}

/// Single-writer, undoable todo store.
pub struct Store {
    history: History<Arc<AppState>>,
    backend: Arc<dyn PersistenceBackend>,
    writer: DebouncedWriter,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
    observers: Vec<Box<dyn ChangeObserver>>,
    config: StoreConfig,
}

impl Store {
    /// Start assembling a store over `backend` with default collaborators.
    #[must_use]
    pub fn builder(backend: impl PersistenceBackend + 'static) -> StoreBuilder {
        Self::builder_shared(Arc::new(backend))
    }

    /// Like [`Store::builder`] for a backend the caller keeps a handle to.
    #[must_use]
    pub fn builder_shared(backend: Arc<dyn PersistenceBackend>) -> StoreBuilder {
        StoreBuilder {
            backend,
            config: StoreConfig::default(),
            clock: Box::new(SystemClock),
            ids: Box::new(RandomIds),
            observers: Vec::new(),
        }
    }

    /// Open a store with the system clock and random ids.
    ///
    /// # Errors
    ///
    /// See [`StoreBuilder::open`].
    pub fn open(
        backend: impl PersistenceBackend + 'static,
        config: StoreConfig,
    ) -> Result<Self, PersistError> {
        Self::builder(backend).config(config).open()
    }

    pub fn subscribe(&mut self, observer: impl ChangeObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> &AppState {
        self.history.present()
    }

    /// Shared handle to the present state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(self.history.present())
    }

    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.state().todos
    }

    #[must_use]
    pub fn todo(&self, id: &str) -> Option<&Todo> {
        self.state().todo(id)
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.state().categories
    }

    #[must_use]
    pub fn filter_state(&self) -> &FilterState {
        &self.state().filter
    }

    #[must_use]
    pub fn editing_todo_id(&self) -> Option<&str> {
        self.state().ui.editing_todo_id.as_deref()
    }

    #[must_use]
    pub fn category_map(&self) -> HashMap<&str, &Category> {
        view::category_map(self.categories())
    }

    #[must_use]
    pub fn filtered_todos(&self) -> Vec<&Todo> {
        view::filter_todos(self.todos(), self.filter_state())
    }

    /// Ids of [`Store::filtered_todos`], the list reorder indices refer to.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<String> {
        view::visible_ids(self.state())
    }

    #[must_use]
    pub fn counts(&self) -> Counts {
        view::counts(self.todos())
    }

    #[must_use]
    pub fn active_category_name(&self) -> Option<&str> {
        view::active_category_name(self.state())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of states reachable through [`Store::undo`].
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.past_len()
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Domain commands (recorded in history)
    // -----------------------------------------------------------------------

    /// Add a todo at the top of the list. Returns its id.
    pub fn add_todo(&mut self, title: &str, category_id: &str) -> Option<String> {
        let title = self.accept_title(title)?;
        let id = self.fresh_id(IdKind::Todo)?;
        let new_id = id.clone();
        let accepted = self.apply("add_todo", true, |state, now| {
            state
                .todos
                .insert(0, Todo::new(id, title, category_id.to_string(), now));
            true
        });
        accepted.then_some(new_id)
    }

    /// Change a todo's title and leave edit mode.
    ///
    /// An unchanged title only leaves edit mode, which is not recorded.
    pub fn edit_todo_title(&mut self, id: &str, title: &str) -> bool {
        let Some(title) = self.accept_title(title) else {
            return false;
        };
        let Some(current) = self.todo(id) else {
            return false;
        };
        if current.title == title {
            return self.cancel_editing();
        }
        self.apply("edit_todo_title", true, |state, now| {
            let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            todo.title = title;
            todo.updated_at = now;
            state.ui.editing_todo_id = None;
            true
        })
    }

    pub fn toggle_todo(&mut self, id: &str) -> bool {
        self.apply("toggle_todo", true, |state, now| {
            let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            todo.completed = !todo.completed;
            todo.updated_at = now;
            true
        })
    }

    /// File a todo under an existing category.
    pub fn assign_category(&mut self, id: &str, category_id: &str) -> bool {
        self.apply("assign_category", true, |state, now| {
            if !state.has_category(category_id) {
                return false;
            }
            let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            if todo.category_id == category_id {
                return false;
            }
            todo.category_id = category_id.to_string();
            todo.updated_at = now;
            true
        })
    }

    pub fn delete_todo(&mut self, id: &str) -> bool {
        self.apply("delete_todo", true, |state, _| {
            let before = state.todos.len();
            state.todos.retain(|t| t.id != id);
            if state.todos.len() == before {
                return false;
            }
            state.ui.editing_todo_id = None;
            true
        })
    }

    /// Append a category. Returns its id.
    pub fn add_category(&mut self, name: &str) -> Option<String> {
        let name = accept_name(name)?;
        let id = self.fresh_id(IdKind::Category)?;
        let new_id = id.clone();
        let accepted = self.apply("add_category", true, |state, now| {
            state.categories.push(Category::new(id, name, now));
            true
        });
        accepted.then_some(new_id)
    }

    pub fn rename_category(&mut self, id: &str, name: &str) -> bool {
        let Some(name) = accept_name(name) else {
            return false;
        };
        self.apply("rename_category", true, |state, now| {
            let Some(category) = state.categories.iter_mut().find(|c| c.id == id) else {
                return false;
            };
            if category.name == name {
                return false;
            }
            category.name = name;
            category.updated_at = now;
            true
        })
    }

    /// Remove a category, moving its todos to the fallback category.
    ///
    /// The fallback category itself cannot be deleted.
    pub fn delete_category(&mut self, id: &str) -> bool {
        if is_fallback_category(id) {
            trace!(id, "refusing to delete fallback category");
            return false;
        }
        self.apply("delete_category", true, |state, now| {
            let before = state.categories.len();
            state.categories.retain(|c| c.id != id);
            if state.categories.len() == before {
                return false;
            }
            for todo in state.todos.iter_mut().filter(|t| t.category_id == id) {
                todo.category_id = FALLBACK_CATEGORY_ID.to_string();
                todo.updated_at = now;
            }
            if state.filter.category_id.category_id() == Some(id) {
                state.filter.category_id = CategoryFilter::All;
            }
            true
        })
    }

    /// Apply a drag move reported against the visible list.
    ///
    /// `visible_ids` is the visible list before the move; indices are local
    /// to it. Hidden todos keep their positions.
    pub fn reorder_todos(
        &mut self,
        visible_ids: &[String],
        previous_index: usize,
        current_index: usize,
    ) -> bool {
        self.apply("reorder_todos", true, |state, _| {
            let Some(next) = reorder_visible(
                &state.todos,
                visible_ids,
                previous_index,
                current_index,
                |todo: &Todo| todo.id.as_str(),
            ) else {
                return false;
            };
            state.todos = next;
            true
        })
    }

    // -----------------------------------------------------------------------
    // Filter and UI commands (never recorded)
    // -----------------------------------------------------------------------

    pub fn set_filter_status(&mut self, status: StatusFilter) -> bool {
        self.apply("set_filter_status", false, |state, _| {
            if state.filter.status == status {
                return false;
            }
            state.filter.status = status;
            true
        })
    }

    /// Restrict the visible list to one category, or to all. Unknown
    /// categories are rejected.
    pub fn set_filter_category(&mut self, filter: impl Into<CategoryFilter>) -> bool {
        let filter = filter.into();
        self.apply("set_filter_category", false, |state, _| {
            if filter.category_id().is_some_and(|id| !state.has_category(id)) {
                return false;
            }
            if state.filter.category_id == filter {
                return false;
            }
            state.filter.category_id = filter;
            true
        })
    }

    pub fn set_search(&mut self, search: &str) -> bool {
        self.apply("set_search", false, |state, _| {
            if state.filter.search == search {
                return false;
            }
            state.filter.search = search.to_string();
            true
        })
    }

    pub fn start_editing(&mut self, id: &str) -> bool {
        self.apply("start_editing", false, |state, _| {
            if state.todo(id).is_none() || state.ui.editing_todo_id.as_deref() == Some(id) {
                return false;
            }
            state.ui.editing_todo_id = Some(id.to_string());
            true
        })
    }

    pub fn cancel_editing(&mut self) -> bool {
        self.apply("cancel_editing", false, |state, _| {
            state.ui.editing_todo_id.take().is_some()
        })
    }

    // -----------------------------------------------------------------------
    // Time travel and reset
    // -----------------------------------------------------------------------

    /// Restore the previous archived state exactly, filter and UI included.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.publish("undo", ChangeKind::Undo);
        true
    }

    /// Re-apply the most recently undone state exactly.
    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.publish("redo", ChangeKind::Redo);
        true
    }

    /// Clear persisted data and history and return to the initial state.
    ///
    /// Bypasses the debouncer: any pending write is cancelled before the
    /// backend is cleared.
    pub fn reset_all(&mut self) {
        if let Err(err) = self.writer.cancel() {
            warn!(error = %err, "could not cancel pending write before reset");
        }
        if let Err(err) = self.backend.clear() {
            warn!(code = %err.code(), error = %err, "failed to clear persisted state");
        }
        let now = self.clock.now();
        self.history
            .reset(Arc::new(normalize(&create_initial_state(now), now)));
        info!("store reset to initial state");
        self.notify("reset_all", ChangeKind::Reset);
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write any pending snapshot now and wait for it.
    ///
    /// # Errors
    ///
    /// Fails if the persistence writer has stopped.
    pub fn flush(&self) -> Result<(), PersistError> {
        self.writer.flush()
    }

    /// Flush and shut down.
    ///
    /// # Errors
    ///
    /// See [`Store::flush`].
    pub fn close(self) -> Result<(), PersistError> {
        self.flush()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Run `edit` against a copy of the present; commit it if `edit` accepts.
    fn apply(
        &mut self,
        command: &'static str,
        record_history: bool,
        edit: impl FnOnce(&mut AppState, Timestamp) -> bool,
    ) -> bool {
        let now = self.clock.now();
        let mut candidate = AppState::clone(self.history.present());
        if !edit(&mut candidate, now) {
            trace!(command, "command was a no-op");
            return false;
        }
        self.commit(command, candidate, now, record_history);
        true
    }

    /// The single path by which a new present is installed.
    fn commit(
        &mut self,
        command: &'static str,
        candidate: AppState,
        now: Timestamp,
        record_history: bool,
    ) {
        let next = Arc::new(normalize(&candidate, now));
        let kind = if record_history {
            self.history.commit_with_history(next);
            ChangeKind::Recorded
        } else {
            self.history.replace_present(next);
            ChangeKind::Transient
        };
        self.publish(command, kind);
    }

    fn publish(&mut self, command: &'static str, kind: ChangeKind) {
        self.writer.schedule(self.snapshot());
        self.notify(command, kind);
    }

    fn notify(&mut self, command: &'static str, kind: ChangeKind) {
        debug!(
            command,
            ?kind,
            past = self.history.past_len(),
            future = self.history.future_len(),
            "state committed"
        );
        let present = self.snapshot();
        let change = Change { command, kind };
        for observer in &mut self.observers {
            observer.state_changed(&present, change);
        }
    }

    /// Draw an id that no existing todo or category uses.
    fn fresh_id(&mut self, kind: IdKind) -> Option<String> {
        let state = self.history.present();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id(kind);
            let taken = match kind {
                IdKind::Todo => state.todo(&id).is_some(),
                IdKind::Category => state.has_category(&id),
            };
            if !taken {
                return Some(id);
            }
            debug!(id = %id, ?kind, "generated id already in use");
        }
        warn!(?kind, attempts = MAX_ID_ATTEMPTS, "could not generate an unused id");
        None
    }

    fn accept_title(&self, title: &str) -> Option<String> {
        let trimmed = title.trim();
        (trimmed.chars().count() >= self.config.title_floor()).then(|| trimmed.to_string())
    }
}

fn accept_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
