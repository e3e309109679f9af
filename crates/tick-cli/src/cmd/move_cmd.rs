//! `tk move`: drag a todo within the visible list.

use clap::Args;
use tick_core::Store;
use tick_core::error::ErrorCode;

use super::{Ctx, fail, rejected};
use crate::cmd::list::TodoRow;
use crate::output::render_list;

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Current 1-based position in the visible list.
    pub from: usize,
    /// Target 1-based position. Positions past the end mean "last".
    pub to: usize,
}

pub fn run_move(store: &mut Store, args: &MoveArgs, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let visible = store.visible_ids();
    let (Some(from), Some(to)) = (args.from.checked_sub(1), args.to.checked_sub(1)) else {
        return Err(rejected("positions start at 1"));
    };
    if from >= visible.len() {
        return Err(fail(
            ErrorCode::TodoNotFound,
            format!("no visible todo at position {}", args.from),
        ));
    }
    if !store.reorder_todos(&visible, from, to) {
        return Err(rejected("todo is already at that position"));
    }

    let rows: Vec<TodoRow> = store
        .filtered_todos()
        .into_iter()
        .enumerate()
        .map(|(i, todo)| TodoRow::new(store, todo, Some(i + 1)))
        .collect();
    render_list(&rows, ctx.output, "No todos.")?;
    Ok(())
}
