//! `tk reset`: wipe persisted data and history.

use clap::Args;
use tracing::info;
use tick_core::Store;

use super::{Ctx, rejected};
use crate::output::render_success;

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Confirm that every todo and category should be deleted.
    #[arg(long)]
    pub yes: bool,
}

pub fn run_reset(store: &mut Store, args: &ResetArgs, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    if !args.yes {
        return Err(rejected("refusing to reset without --yes"));
    }
    store.reset_all();
    info!(path = %ctx.data_path.display(), "data file cleared");
    render_success(ctx.output, "Reset to an empty list")?;
    Ok(())
}
