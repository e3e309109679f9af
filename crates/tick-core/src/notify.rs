//! Change notification: how consumers learn that the present state moved.
//!
//! Pull-style consumers just read the store's views after each command.
//! Push-style consumers register a [`ChangeObserver`]; the store calls every
//! observer after each accepted command, once the new present is in place.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::model::AppState;

/// How the present state was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Domain edit archived in history.
    Recorded,
    /// Filter or UI change, not archived.
    Transient,
    Undo,
    Redo,
    Reset,
}

/// One notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    /// Name of the command that produced the change, e.g. `"add_todo"`.
    pub command: &'static str,
    pub kind: ChangeKind,
}

pub trait ChangeObserver: Send {
    fn state_changed(&mut self, state: &Arc<AppState>, change: Change);
}

impl<F> ChangeObserver for F
where
    F: FnMut(&Arc<AppState>, Change) + Send,
{
    fn state_changed(&mut self, state: &Arc<AppState>, change: Change) {
        self(state, change);
    }
}

/// Forwards every new present, with its change record, over a channel.
///
/// A disconnected receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: Sender<(Arc<AppState>, Change)>,
}

impl ChannelObserver {
    #[must_use]
    pub const fn new(tx: Sender<(Arc<AppState>, Change)>) -> Self {
        Self { tx }
    }
}

impl ChangeObserver for ChannelObserver {
    fn state_changed(&mut self, state: &Arc<AppState>, change: Change) {
        let _ = self.tx.send((Arc::clone(state), change));
    }
}
