//! `tk edit`, `tk start-edit`, `tk cancel-edit`.

use clap::Args;
use tick_core::Store;

use super::todo::{TodoRef, show};
use super::{Ctx, rejected, resolve_todo};
use crate::output::render_success;

#[derive(Args, Debug)]
pub struct EditArgs {
    pub todo: String,
    /// New title. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
}

pub fn run_edit(store: &mut Store, args: &EditArgs, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let id = resolve_todo(store, &args.todo)?;
    let title = args.title.join(" ");
    let unchanged = store.todo(&id).is_some_and(|t| t.title == title.trim());
    // An unchanged title only leaves edit mode, which may itself be a no-op.
    if !store.edit_todo_title(&id, &title) && !unchanged {
        let min = store.config().title_floor();
        return Err(rejected(format!("title must be at least {min} characters")));
    }
    show(store, &id, ctx)
}

pub fn run_start_edit(store: &mut Store, args: &TodoRef, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let id = resolve_todo(store, &args.todo)?;
    if !store.start_editing(&id) {
        return Err(rejected(format!("{id} is already being edited")));
    }
    show(store, &id, ctx)
}

pub fn run_cancel_edit(store: &mut Store, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    if !store.cancel_editing() {
        return Err(rejected("no todo is being edited"));
    }
    render_success(ctx.output, "Left edit mode")?;
    Ok(())
}
