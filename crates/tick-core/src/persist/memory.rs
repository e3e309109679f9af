use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::PersistenceBackend;
use crate::error::PersistError;
use crate::model::AppState;

#[derive(Debug, Default)]
struct Slot {
    blob: Option<String>,
    saves: usize,
    clears: usize,
}

/// Keeps the serialized state in memory. Clones share the same slot, so a
/// test can hand one clone to a store and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that already holds `state`.
    pub fn with_state(state: &AppState) -> Result<Self, PersistError> {
        Ok(Self::with_raw(serde_json::to_string(state)?))
    }

    /// A backend that already holds an arbitrary payload.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let backend = Self::default();
        backend.slot().blob = Some(raw.into());
        backend
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.slot().saves
    }

    #[must_use]
    pub fn clears(&self) -> usize {
        self.slot().clears
    }

    /// The raw payload currently held.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot().blob.clone()
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersistenceBackend for MemoryBackend {
    fn load(&self) -> Result<Option<AppState>, PersistError> {
        let raw = self.slot().blob.clone();
        raw.map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(PersistError::from)
    }

    fn save(&self, state: &AppState) -> Result<(), PersistError> {
        let raw = serde_json::to_string(state)?;
        let mut slot = self.slot();
        slot.blob = Some(raw);
        slot.saves += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        let mut slot = self.slot();
        slot.blob = None;
        slot.clears += 1;
        Ok(())
    }
}
