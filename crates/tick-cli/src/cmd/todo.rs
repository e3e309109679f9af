//! Single-todo commands: `tk toggle`, `tk assign`, `tk rm`.

use clap::Args;
use tick_core::Store;

use super::{Ctx, rejected, resolve_category, resolve_todo};
use crate::cmd::list::TodoRow;
use crate::output::{render_item, render_success};

/// A todo reference: visible position, id, or unique id prefix.
#[derive(Args, Debug)]
pub struct TodoRef {
    pub todo: String,
}

#[derive(Args, Debug)]
pub struct AssignArgs {
    pub todo: String,
    /// Category id or name.
    pub category: String,
}

pub fn run_toggle(store: &mut Store, args: &TodoRef, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let id = resolve_todo(store, &args.todo)?;
    if !store.toggle_todo(&id) {
        return Err(rejected(format!("could not toggle {id}")));
    }
    show(store, &id, ctx)
}

pub fn run_assign(store: &mut Store, args: &AssignArgs, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let id = resolve_todo(store, &args.todo)?;
    let category = resolve_category(store, &args.category)?;
    if !store.assign_category(&id, &category) {
        return Err(rejected(format!("{id} is already in {category}")));
    }
    show(store, &id, ctx)
}

pub fn run_delete(store: &mut Store, args: &TodoRef, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let id = resolve_todo(store, &args.todo)?;
    let title = store.todo(&id).map(|t| t.title.clone()).unwrap_or_default();
    if !store.delete_todo(&id) {
        return Err(rejected(format!("could not delete {id}")));
    }
    render_success(ctx.output, &format!("Deleted {id} ({title})"))?;
    Ok(())
}

/// Print the current row for `id`.
pub fn show(store: &Store, id: &str, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let row = TodoRow::lookup(store, id).ok_or_else(|| anyhow::anyhow!("todo {id} vanished"))?;
    render_item(&row, ctx.output)?;
    Ok(())
}
