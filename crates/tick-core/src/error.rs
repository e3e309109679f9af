use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Machine-readable error codes for scripts and agents driving `tk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    StorageReadFailed,
    StorageDecodeFailed,
    StorageWriteFailed,
    LockContention,
    WriterStopped,
    TodoNotFound,
    CategoryNotFound,
    CommandRejected,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::TodoNotFound => "E2001",
            Self::CategoryNotFound => "E2002",
            Self::CommandRejected => "E2003",
            Self::StorageReadFailed => "E5001",
            Self::StorageDecodeFailed => "E5002",
            Self::StorageWriteFailed => "E5003",
            Self::LockContention => "E5004",
            Self::WriterStopped => "E5005",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::TodoNotFound => "Todo not found",
            Self::CategoryNotFound => "Category not found",
            Self::CommandRejected => "Command had no effect",
            Self::StorageReadFailed => "State file read failed",
            Self::StorageDecodeFailed => "State file is not valid JSON",
            Self::StorageWriteFailed => "State file write failed",
            Self::LockContention => "Lock contention",
            Self::WriterStopped => "Persistence writer stopped",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in ~/.config/tick/config.toml and retry."),
            Self::TodoNotFound => Some("Run `tk list` to see current todo ids."),
            Self::CategoryNotFound => Some("Run `tk category list` to see category ids."),
            Self::CommandRejected => {
                Some("Titles need at least 3 characters; the General category cannot be deleted.")
            }
            Self::StorageReadFailed | Self::StorageWriteFailed => {
                Some("Check disk space and permissions on the data file.")
            }
            Self::StorageDecodeFailed => {
                Some("Move the data file aside or run `tk reset` to start fresh.")
            }
            Self::LockContention => Some("Retry after the other `tk` process exits."),
            Self::WriterStopped => None,
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures surfaced by persistence backends.
///
/// The store never retries these; it logs them and carries on.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode persisted state: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lock timed out after {waited:?} at {path}")]
    LockTimeout { path: PathBuf, waited: Duration },
    #[error("persistence writer is no longer running")]
    WriterStopped,
    #[error("failed to start persistence writer: {0}")]
    WriterSpawn(#[source] std::io::Error),
}

impl PersistError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::StorageReadFailed,
            Self::Decode(_) => ErrorCode::StorageDecodeFailed,
            Self::Write { .. } => ErrorCode::StorageWriteFailed,
            Self::LockTimeout { .. } => ErrorCode::LockContention,
            Self::WriterStopped | Self::WriterSpawn(_) => ErrorCode::WriterStopped,
        }
    }

    /// Optional remediation hint for operators and agents.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
