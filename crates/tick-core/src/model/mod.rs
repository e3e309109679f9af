//! Entities and the aggregate application state.

pub mod entity;
pub mod state;

pub use entity::{
    Category, FALLBACK_CATEGORY_ID, FALLBACK_CATEGORY_NAME, MIN_TITLE_LEN, Timestamp, Todo,
    is_valid_title,
};
pub use state::{
    ALL_CATEGORIES, AppState, CategoryFilter, FilterState, MetaState, ParseEnumError,
    SCHEMA_VERSION, StatusFilter, UiState, create_initial_state, is_fallback_category,
};
