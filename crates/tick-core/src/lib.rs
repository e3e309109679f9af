//! tick-core library.
//!
//! A single-writer, undoable state store for a todo list: an immutable
//! [`model::AppState`] replaced wholesale by commands, a bounded
//! past/present/future [`history::History`], a [`normalize`] pass that
//! repairs references after every mutation or load, a [`reorder`] mapper
//! from filtered views onto the full list, and debounced write-back to a
//! [`persist::PersistenceBackend`].
//!
//! # Conventions
//!
//! - **Errors**: commands never fail; rejected input is a no-op. Persistence
//!   errors are [`error::PersistError`]; config loading uses `anyhow::Result`.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod ids;
pub mod model;
pub mod normalize;
pub mod notify;
pub mod persist;
pub mod reorder;
pub mod store;
pub mod view;

pub use store::{Store, StoreBuilder};
