//! `tk status`: counts, filter, edit state, and history depth.

use serde::Serialize;
use std::io::{self, Write};
use tick_core::Store;
use tick_core::view::Counts;

use super::Ctx;
use super::filter::FilterView;
use crate::output::{Renderable, pretty_kv, pretty_section, render_item};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub counts: Counts,
    pub categories: usize,
    pub filter: FilterView,
    pub editing_todo_id: Option<String>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub history_depth: usize,
    pub data_path: String,
}

impl StatusView {
    pub fn of(store: &Store, ctx: &Ctx<'_>) -> Self {
        Self {
            counts: store.counts(),
            categories: store.categories().len(),
            filter: FilterView::of(store),
            editing_todo_id: store.editing_todo_id().map(str::to_string),
            can_undo: store.can_undo(),
            can_redo: store.can_redo(),
            history_depth: store.history_len(),
            data_path: ctx.data_path.display().to_string(),
        }
    }
}

impl Renderable for StatusView {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_section(w, "Todos")?;
        pretty_kv(w, "Active", self.counts.active.to_string())?;
        pretty_kv(w, "Completed", self.counts.completed.to_string())?;
        pretty_kv(w, "Total", self.counts.total.to_string())?;
        pretty_kv(w, "Categories", self.categories.to_string())?;
        writeln!(w)?;
        pretty_section(w, "View")?;
        self.filter.render_human(w)?;
        pretty_kv(w, "Editing", self.editing_todo_id.as_deref().unwrap_or("-"))?;
        writeln!(w)?;
        pretty_section(w, "Session")?;
        pretty_kv(w, "Undo", format!("{} step(s)", self.history_depth))?;
        pretty_kv(w, "Redo", if self.can_redo { "available" } else { "-" })?;
        pretty_kv(w, "Data", &self.data_path)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.counts.total,
            self.counts.active,
            self.counts.completed,
            self.categories,
            self.history_depth,
            self.data_path
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["TOTAL", "ACTIVE", "COMPLETED", "CATEGORIES", "UNDO", "DATA"]
    }
}

pub fn run_status(store: &Store, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    render_item(&StatusView::of(store, ctx), ctx.output)?;
    Ok(())
}
