//! Durable storage for [`AppState`] snapshots.
//!
//! A backend is a key-value blob store for exactly one document: the
//! structurally serialized state. Writes are issued by the
//! [`DebouncedWriter`]; `clear` is issued synchronously by a reset.

pub mod debounce;
pub mod file;
pub mod lock;
pub mod memory;

pub use debounce::{Debounce, DebouncedWriter};
pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

use crate::error::PersistError;
use crate::model::AppState;

/// Where snapshots go.
pub trait PersistenceBackend: Send + Sync {
    /// The stored state, or `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<AppState>, PersistError>;

    fn save(&self, state: &AppState) -> Result<(), PersistError>;

    /// Remove the stored state. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), PersistError>;
}
