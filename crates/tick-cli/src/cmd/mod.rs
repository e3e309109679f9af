//! Subcommand handlers. Each handler drives one store command and renders
//! the outcome through [`crate::output`].

pub mod add;
pub mod category;
pub mod completions;
pub mod edit;
pub mod filter;
pub mod history;
pub mod list;
pub mod move_cmd;
pub mod reset;
pub mod shell;
pub mod status;
pub mod todo;

use std::fmt;
use std::path::Path;

use clap::Subcommand;
use tick_core::Store;
use tick_core::error::ErrorCode;

use crate::output::{CliError, OutputMode, render_error};

/// Per-invocation settings shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct Ctx<'a> {
    pub output: OutputMode,
    pub data_path: &'a Path,
}

/// Commands that act on the store. Shared by one-shot invocations and the
/// interactive shell.
#[derive(Subcommand, Debug)]
pub enum StoreCommand {
    #[command(
        next_help_heading = "Todos",
        about = "Add a todo at the top of the list",
        after_help = "EXAMPLES:\n    tk add Buy milk\n    tk add \"Call the plumber\" --category home"
    )]
    Add(add::AddArgs),

    #[command(
        next_help_heading = "Todos",
        about = "List visible todos",
        long_about = "List todos through the saved filter. Positions are 1-based and are what `tk move` refers to.",
        after_help = "EXAMPLES:\n    tk list\n    tk list --all --json"
    )]
    List(list::ListArgs),

    #[command(next_help_heading = "Todos", about = "Flip a todo between active and completed")]
    Toggle(todo::TodoRef),

    #[command(
        next_help_heading = "Todos",
        about = "Change a todo's title",
        after_help = "EXAMPLES:\n    tk edit 2 Buy oat milk"
    )]
    Edit(edit::EditArgs),

    #[command(next_help_heading = "Todos", about = "Mark a todo as being edited")]
    StartEdit(todo::TodoRef),

    #[command(next_help_heading = "Todos", about = "Leave edit mode")]
    CancelEdit,

    #[command(
        next_help_heading = "Todos",
        about = "File a todo under a category",
        after_help = "EXAMPLES:\n    tk assign 1 work"
    )]
    Assign(todo::AssignArgs),

    #[command(next_help_heading = "Todos", visible_alias = "delete", about = "Delete a todo")]
    Rm(todo::TodoRef),

    #[command(
        next_help_heading = "Todos",
        about = "Move a todo within the visible list",
        long_about = "Move the todo at one visible position to another. Todos hidden by the filter keep their places.",
        after_help = "EXAMPLES:\n    tk move 3 1"
    )]
    Move(move_cmd::MoveArgs),

    #[command(
        next_help_heading = "View",
        about = "Show or change the saved filter",
        after_help = "EXAMPLES:\n    tk filter --status active\n    tk filter --category work --search milk\n    tk filter --clear"
    )]
    Filter(filter::FilterArgs),

    #[command(next_help_heading = "Categories", about = "Manage categories")]
    Category {
        #[command(subcommand)]
        command: category::CategoryCommand,
    },

    #[command(next_help_heading = "History", about = "Undo the last change (session only)")]
    Undo,

    #[command(next_help_heading = "History", about = "Redo the last undone change")]
    Redo,

    #[command(next_help_heading = "View", about = "Show counts, filter, and history depth")]
    Status,

    #[command(
        next_help_heading = "Maintenance",
        about = "Delete all data and start over",
        after_help = "EXAMPLES:\n    tk reset --yes"
    )]
    Reset(reset::ResetArgs),
}

/// Run one store command.
///
/// # Errors
///
/// Returns a [`Failure`] when the input does not resolve or the store
/// rejects the command, and an I/O error when rendering fails.
pub fn execute(store: &mut Store, command: &StoreCommand, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    match command {
        StoreCommand::Add(args) => add::run_add(store, args, ctx),
        StoreCommand::List(args) => list::run_list(store, args, ctx),
        StoreCommand::Toggle(args) => todo::run_toggle(store, args, ctx),
        StoreCommand::Edit(args) => edit::run_edit(store, args, ctx),
        StoreCommand::StartEdit(args) => edit::run_start_edit(store, args, ctx),
        StoreCommand::CancelEdit => edit::run_cancel_edit(store, ctx),
        StoreCommand::Assign(args) => todo::run_assign(store, args, ctx),
        StoreCommand::Rm(args) => todo::run_delete(store, args, ctx),
        StoreCommand::Move(args) => move_cmd::run_move(store, args, ctx),
        StoreCommand::Filter(args) => filter::run_filter(store, args, ctx),
        StoreCommand::Category { command } => category::run_category(store, command, ctx),
        StoreCommand::Undo => history::run_undo(store, ctx),
        StoreCommand::Redo => history::run_redo(store, ctx),
        StoreCommand::Status => status::run_status(store, ctx),
        StoreCommand::Reset(args) => reset::run_reset(store, args, ctx),
    }
}

/// A command failure that carries its own structured rendering.
#[derive(Debug)]
pub struct Failure(pub CliError);

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.message)
    }
}

impl std::error::Error for Failure {}

pub fn fail(code: ErrorCode, message: impl Into<String>) -> anyhow::Error {
    Failure(CliError::coded(code, message)).into()
}

/// The store treated the command as a no-op.
pub fn rejected(message: impl Into<String>) -> anyhow::Error {
    fail(ErrorCode::CommandRejected, message)
}

/// Render any handler error to stderr.
pub fn report(output: OutputMode, err: &anyhow::Error) {
    let rendered = match err.downcast_ref::<Failure>() {
        Some(Failure(cli)) => render_error(output, cli),
        None => render_error(output, &CliError::new(format!("{err:#}"))),
    };
    if let Err(io) = rendered {
        tracing::warn!(error = %io, "could not write error output");
    }
}

/// Resolve a todo reference: a 1-based visible position, a full id, or a
/// unique id prefix (with or without the `t-` prefix).
pub fn resolve_todo(store: &Store, token: &str) -> anyhow::Result<String> {
    let token = token.trim();
    if let Ok(position) = token.parse::<usize>() {
        let visible = store.visible_ids();
        return position
            .checked_sub(1)
            .and_then(|index| visible.get(index).cloned())
            .ok_or_else(|| {
                fail(
                    ErrorCode::TodoNotFound,
                    format!("no visible todo at position {position}"),
                )
            });
    }
    if store.todo(token).is_some() {
        return Ok(token.to_string());
    }
    let matches: Vec<&str> = store
        .todos()
        .iter()
        .map(|t| t.id.as_str())
        .filter(|id| id.starts_with(token) || id.strip_prefix("t-").is_some_and(|s| s.starts_with(token)))
        .collect();
    unique(matches, token, ErrorCode::TodoNotFound, "todo")
}

/// Resolve a category reference: a full id, a case-insensitive name, or a
/// unique id prefix.
pub fn resolve_category(store: &Store, token: &str) -> anyhow::Result<String> {
    let token = token.trim();
    if store.state().has_category(token) {
        return Ok(token.to_string());
    }
    let by_name: Vec<&str> = store
        .categories()
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case(token))
        .map(|c| c.id.as_str())
        .collect();
    if !by_name.is_empty() {
        return unique(by_name, token, ErrorCode::CategoryNotFound, "category");
    }
    let by_prefix: Vec<&str> = store
        .categories()
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| id.starts_with(token))
        .collect();
    unique(by_prefix, token, ErrorCode::CategoryNotFound, "category")
}

fn unique(matches: Vec<&str>, token: &str, code: ErrorCode, noun: &str) -> anyhow::Result<String> {
    match matches.as_slice() {
        [one] => Ok((*one).to_string()),
        [] => Err(fail(code, format!("no {noun} matches '{token}'"))),
        many => Err(fail(
            code,
            format!("'{token}' is ambiguous: matches {}", many.join(", ")),
        )),
    }
}
