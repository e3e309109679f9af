use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::entity::{Category, FALLBACK_CATEGORY_ID, Timestamp, Todo};

/// Current persisted schema version, stamped on every normalization pass.
pub const SCHEMA_VERSION: u32 = 1;

/// Wire value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "all";

/// Completion-status projection of the todo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Returns true when a todo with the given completion flag passes.
    #[must_use]
    pub const fn admits(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" | "open" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                expected: "status filter (all, active, completed)",
                got: s.to_string(),
            }),
        }
    }
}

/// Category projection: everything, or a single category id.
///
/// Serialized as the bare string `"all"` or the category id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Returns the referenced category id, if any.
    #[must_use]
    pub fn category_id(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Category(id) => Some(id),
        }
    }

    #[must_use]
    pub fn admits(&self, category_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => id == category_id,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(raw: String) -> Self {
        if raw == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(raw)
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL_CATEGORIES.to_string(),
            CategoryFilter::Category(id) => id,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Category(id) => f.write_str(id),
        }
    }
}

/// Criteria the visible list is projected through. Never archived in history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    pub status: StatusFilter,
    pub category_id: CategoryFilter,
    pub search: String,
}

/// Transient UI focus. Never archived in history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiState {
    pub editing_todo_id: Option<String>,
}

/// Payload metadata used to detect stale persisted snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetaState {
    pub schema_version: u32,
}

/// The whole application state: the unit of snapshotting, persistence, and undo.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub todos: Vec<Todo>,
    pub categories: Vec<Category>,
    pub filter: FilterState,
    pub ui: UiState,
    pub meta: MetaState,
}

impl AppState {
    #[must_use]
    pub fn todo(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    #[must_use]
    pub fn has_category(&self, id: &str) -> bool {
        self.category(id).is_some()
    }
}

/// Fresh state: no todos, only the fallback category, default filter.
#[must_use]
pub fn create_initial_state(now: Timestamp) -> AppState {
    AppState {
        todos: Vec::new(),
        categories: vec![Category::fallback(now)],
        filter: FilterState::default(),
        ui: UiState::default(),
        meta: MetaState {
            schema_version: SCHEMA_VERSION,
        },
    }
}

/// Returns true when `id` names the reserved fallback category.
#[must_use]
pub fn is_fallback_category(id: &str) -> bool {
    id == FALLBACK_CATEGORY_ID
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}
