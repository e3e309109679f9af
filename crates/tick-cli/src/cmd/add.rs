//! `tk add`: put a new todo at the top of the list.

use clap::Args;
use tick_core::Store;
use tick_core::model::FALLBACK_CATEGORY_ID;

use super::{Ctx, rejected, resolve_category};
use crate::cmd::list::TodoRow;
use crate::output::render_item;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Todo title. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,

    /// Category id or name. Defaults to the General category.
    #[arg(short, long)]
    pub category: Option<String>,
}

pub fn run_add(store: &mut Store, args: &AddArgs, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let category = match args.category.as_deref() {
        Some(token) => resolve_category(store, token)?,
        None => FALLBACK_CATEGORY_ID.to_string(),
    };
    let title = args.title.join(" ");
    let min = store.config().title_floor();
    let id = store.add_todo(&title, &category).ok_or_else(|| {
        rejected(format!("title must be at least {min} characters"))
    })?;
    let row = TodoRow::lookup(store, &id)
        .ok_or_else(|| anyhow::anyhow!("todo {id} vanished after add"))?;
    render_item(&row, ctx.output)?;
    Ok(())
}
