//! `tk list` and the todo row shared by every command that prints todos.

use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use tick_core::Store;
use tick_core::model::{CategoryFilter, StatusFilter, Todo};

use super::Ctx;
use crate::output::{OutputMode, Renderable, pretty_rule, render_list};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Ignore the saved filter and show every todo.
    #[arg(short, long)]
    pub all: bool,
}

/// One todo as shown to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRow {
    /// 1-based position in the visible list, when visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub category_id: String,
    pub category: String,
    pub editing: bool,
}

impl TodoRow {
    pub fn new(store: &Store, todo: &Todo, position: Option<usize>) -> Self {
        let category = store
            .state()
            .category(&todo.category_id)
            .map_or_else(|| todo.category_id.clone(), |c| c.name.clone());
        Self {
            position,
            id: todo.id.clone(),
            title: todo.title.clone(),
            completed: todo.completed,
            category_id: todo.category_id.clone(),
            category,
            editing: store.editing_todo_id() == Some(todo.id.as_str()),
        }
    }

    /// Row for the todo `id`, positioned against the visible list.
    pub fn lookup(store: &Store, id: &str) -> Option<Self> {
        let todo = store.todo(id)?;
        let position = store
            .visible_ids()
            .iter()
            .position(|v| v == id)
            .map(|i| i + 1);
        Some(Self::new(store, todo, position))
    }

    const fn check(&self) -> &'static str {
        if self.completed { "[x]" } else { "[ ]" }
    }
}

impl Renderable for TodoRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let position = self
            .position
            .map_or_else(|| "  -".to_string(), |p| format!("{p:>3}"));
        let marker = if self.editing { "  (editing)" } else { "" };
        writeln!(
            w,
            "{position}. {} {:<36} {:<12} {}{marker}",
            self.check(),
            self.title,
            self.category,
            self.id
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let position = self.position.map_or_else(String::new, |p| p.to_string());
        let state = if self.completed { "done" } else { "open" };
        writeln!(
            w,
            "{position}\t{}\t{state}\t{}\t{}",
            self.id, self.category_id, self.title
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["POS", "ID", "STATE", "CATEGORY", "TITLE"]
    }
}

pub fn run_list(store: &Store, args: &ListArgs, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let rows: Vec<TodoRow> = if args.all {
        let visible = store.visible_ids();
        store
            .todos()
            .iter()
            .map(|todo| {
                let position = visible.iter().position(|v| *v == todo.id).map(|i| i + 1);
                TodoRow::new(store, todo, position)
            })
            .collect()
    } else {
        store
            .filtered_todos()
            .into_iter()
            .enumerate()
            .map(|(i, todo)| TodoRow::new(store, todo, Some(i + 1)))
            .collect()
    };

    if ctx.output == OutputMode::Pretty {
        write_filter_banner(&mut io::stdout().lock(), store)?;
    }
    render_list(&rows, ctx.output, "No todos.")?;
    if ctx.output == OutputMode::Pretty && !rows.is_empty() {
        let counts = store.counts();
        let mut out = io::stdout().lock();
        pretty_rule(&mut out)?;
        writeln!(
            out,
            "{} active, {} completed, {} total",
            counts.active, counts.completed, counts.total
        )?;
    }
    Ok(())
}

/// One line describing the saved filter, or nothing when it shows all.
fn write_filter_banner(w: &mut dyn Write, store: &Store) -> io::Result<()> {
    let filter = store.filter_state();
    let mut parts = Vec::new();
    if filter.status != StatusFilter::All {
        parts.push(filter.status.to_string());
    }
    if filter.category_id != CategoryFilter::All {
        parts.push(
            store
                .active_category_name()
                .unwrap_or_default()
                .to_string(),
        );
    }
    if !filter.search.trim().is_empty() {
        parts.push(format!("\"{}\"", filter.search.trim()));
    }
    if parts.is_empty() {
        return Ok(());
    }
    writeln!(w, "Filter: {}", parts.join(" · "))
}
