use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::PersistenceBackend;
use super::lock::StateLock;
use crate::error::PersistError;
use crate::model::AppState;

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// Stores the state as a single pretty-printed JSON document.
///
/// Writes land in a temporary sibling first and are renamed into place.
/// Every operation holds an exclusive advisory lock on `<file>.lock`.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
    lock_timeout: Duration,
}

impl JsonFileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("state.json"), OsString::from);
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn lock(&self) -> Result<StateLock, PersistError> {
        StateLock::acquire(&self.sibling(".lock"), self.lock_timeout)
    }

    fn write_err(&self, source: io::Error) -> PersistError {
        PersistError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersistenceBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<AppState>, PersistError> {
        let _lock = self.lock()?;
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        let state = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), "loaded state file");
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<(), PersistError> {
        let _lock = self.lock()?;
        let mut bytes = serde_json::to_vec_pretty(state)?;
        bytes.push(b'\n');

        let tmp = self.sibling(".tmp");
        let mut file = fs::File::create(&tmp).map_err(|e| self.write_err(e))?;
        file.write_all(&bytes).map_err(|e| self.write_err(e))?;
        file.sync_all().map_err(|e| self.write_err(e))?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(|e| self.write_err(e))?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "saved state file");
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        let _lock = self.lock()?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.write_err(source)),
        }
    }
}
