//! `tk filter`: inspect or change the saved filter.

use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use tick_core::Store;
use tick_core::model::{ALL_CATEGORIES, CategoryFilter, StatusFilter};

use super::{Ctx, resolve_category};
use crate::output::{Renderable, pretty_kv, render_item};

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Completion status to show: all, active, or completed.
    #[arg(short, long)]
    pub status: Option<StatusFilter>,

    /// Category id or name, or `all`.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Case-insensitive title search. An empty string clears it.
    #[arg(long)]
    pub search: Option<String>,

    /// Reset status, category, and search before applying other flags.
    #[arg(long)]
    pub clear: bool,
}

/// The saved filter, with the category resolved to its name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterView {
    pub status: StatusFilter,
    pub category_id: CategoryFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub search: String,
    pub visible: usize,
}

impl FilterView {
    pub fn of(store: &Store) -> Self {
        let filter = store.filter_state();
        Self {
            status: filter.status,
            category_id: filter.category_id.clone(),
            category: store.active_category_name().map(str::to_string),
            search: filter.search.clone(),
            visible: store.filtered_todos().len(),
        }
    }
}

impl Renderable for FilterView {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_kv(w, "Status", self.status.to_string())?;
        pretty_kv(w, "Category", self.category.as_deref().unwrap_or(ALL_CATEGORIES))?;
        pretty_kv(w, "Search", &self.search)?;
        pretty_kv(w, "Visible", self.visible.to_string())
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            self.status, self.category_id, self.search, self.visible
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["STATUS", "CATEGORY", "SEARCH", "VISIBLE"]
    }
}

/// Apply the requested changes. Unchanged values are not an error, so the
/// command is also the way to print the current filter.
pub fn run_filter(store: &mut Store, args: &FilterArgs, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    // Resolve before changing anything so a bad reference leaves no trace.
    let category = match args.category.as_deref().map(str::trim) {
        Some(ALL_CATEGORIES) => Some(CategoryFilter::All),
        Some(token) => Some(CategoryFilter::Category(resolve_category(store, token)?)),
        None => None,
    };

    if args.clear {
        store.set_filter_status(StatusFilter::All);
        store.set_filter_category(CategoryFilter::All);
        store.set_search("");
    }
    if let Some(status) = args.status {
        store.set_filter_status(status);
    }
    if let Some(category) = category {
        store.set_filter_category(category);
    }
    if let Some(search) = args.search.as_deref() {
        store.set_search(search);
    }

    render_item(&FilterView::of(store), ctx.output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing;
    use crate::output::OutputMode;
    use std::path::Path;

    fn ctx() -> Ctx<'static> {
        Ctx {
            output: OutputMode::Json,
            data_path: Path::new("unused.json"),
        }
    }

    #[test]
    fn unknown_category_changes_nothing() {
        let mut store = testing::store();
        let args = FilterArgs {
            status: Some(StatusFilter::Active),
            category: Some("nowhere".into()),
            search: None,
            clear: false,
        };
        assert!(run_filter(&mut store, &args, &ctx()).is_err());
        assert_eq!(store.filter_state().status, StatusFilter::All);
    }

    #[test]
    fn view_resolves_category_name() {
        let mut store = testing::store();
        let home = store.add_category("Home").expect("category");
        assert!(store.set_filter_category(home.as_str()));
        let view = FilterView::of(&store);
        assert_eq!(view.category.as_deref(), Some("Home"));
        let json = serde_json::to_value(&view).expect("json");
        assert_eq!(json["categoryId"], home.as_str());
        assert_eq!(json["status"], "all");
    }
}
