//! `tk undo` / `tk redo`.
//!
//! History lives in memory, so outside `tk shell` there is never anything to
//! undo.

use tick_core::Store;

use super::{Ctx, rejected};
use crate::output::render_success;

pub fn run_undo(store: &mut Store, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    if !store.undo() {
        return Err(rejected("nothing to undo"));
    }
    render_success(ctx.output, &summary("Undid last change", store))?;
    Ok(())
}

pub fn run_redo(store: &mut Store, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    if !store.redo() {
        return Err(rejected("nothing to redo"));
    }
    render_success(ctx.output, &summary("Redid change", store))?;
    Ok(())
}

fn summary(action: &str, store: &Store) -> String {
    let counts = store.counts();
    format!(
        "{action} ({} todos, {} undo, {} redo left)",
        counts.total,
        if store.can_undo() { "more" } else { "no" },
        if store.can_redo() { "more" } else { "no" }
    )
}
