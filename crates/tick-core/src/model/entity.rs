use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock timestamp stamped on entities (RFC 3339 on the wire).
pub type Timestamp = DateTime<Utc>;

/// Id of the reserved category that always exists and cannot be deleted.
pub const FALLBACK_CATEGORY_ID: &str = "general";

/// Display name the fallback category is created with.
pub const FALLBACK_CATEGORY_NAME: &str = "General";

/// Minimum trimmed length of a todo title.
pub const MIN_TITLE_LEN: usize = 3;

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "fallback_category_id")]
    pub category_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Todo {
    /// Create an open todo stamped with `now` for both timestamps.
    #[must_use]
    pub fn new(id: String, title: String, category_id: String, now: Timestamp) -> Self {
        Self {
            id,
            title,
            completed: false,
            category_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive substring match against the title.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn title_contains(&self, needle: &str) -> bool {
        needle.is_empty() || self.title.to_lowercase().contains(needle)
    }
}

/// A named bucket todos are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Category {
    #[must_use]
    pub fn new(id: String, name: String, now: Timestamp) -> Self {
        Self {
            id,
            name,
            created_at: now,
            updated_at: now,
        }
    }

    /// The reserved fallback category.
    #[must_use]
    pub fn fallback(now: Timestamp) -> Self {
        Self::new(
            FALLBACK_CATEGORY_ID.to_string(),
            FALLBACK_CATEGORY_NAME.to_string(),
            now,
        )
    }

    /// Returns true for the reserved fallback category.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.id == FALLBACK_CATEGORY_ID
    }
}

fn fallback_category_id() -> String {
    FALLBACK_CATEGORY_ID.to_string()
}

/// Returns true when a trimmed title is long enough to be stored.
#[must_use]
pub fn is_valid_title(title: &str) -> bool {
    title.trim().chars().count() >= MIN_TITLE_LEN
}
