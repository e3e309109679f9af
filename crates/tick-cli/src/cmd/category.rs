//! `tk category {add,rename,rm,list}`.

use clap::Subcommand;
use serde::Serialize;
use std::io::{self, Write};
use tick_core::Store;
use tick_core::model::{Category, is_fallback_category};

use super::{Ctx, rejected, resolve_category};
use crate::output::{Renderable, render_item, render_list, render_success};

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Create a category.
    Add {
        /// Display name. Multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Rename a category.
    Rename {
        /// Category id or current name.
        category: String,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Delete a category; its todos move to General.
    #[command(visible_alias = "delete")]
    Rm { category: String },
    /// List categories with their todo counts.
    #[command(visible_alias = "ls")]
    List,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub todos: usize,
    pub fallback: bool,
}

impl CategoryRow {
    fn new(store: &Store, category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            todos: store
                .todos()
                .iter()
                .filter(|t| t.category_id == category.id)
                .count(),
            fallback: is_fallback_category(&category.id),
        }
    }

    fn lookup(store: &Store, id: &str) -> Option<Self> {
        store.state().category(id).map(|c| Self::new(store, c))
    }
}

impl Renderable for CategoryRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let note = if self.fallback { "  (default)" } else { "" };
        writeln!(w, "{:<20} {:>4}  {}{note}", self.name, self.todos, self.id)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}\t{}\t{}", self.id, self.todos, self.name)
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "TODOS", "NAME"]
    }
}

pub fn run_category(
    store: &mut Store,
    command: &CategoryCommand,
    ctx: &Ctx<'_>,
) -> anyhow::Result<()> {
    match command {
        CategoryCommand::Add { name } => {
            let id = store
                .add_category(&name.join(" "))
                .ok_or_else(|| rejected("category name must not be blank"))?;
            show(store, &id, ctx)
        }
        CategoryCommand::Rename { category, name } => {
            let id = resolve_category(store, category)?;
            if !store.rename_category(&id, &name.join(" ")) {
                return Err(rejected(format!(
                    "{id} already has that name, or the name is blank"
                )));
            }
            show(store, &id, ctx)
        }
        CategoryCommand::Rm { category } => {
            let id = resolve_category(store, category)?;
            if !store.delete_category(&id) {
                return Err(rejected(format!("category {id} cannot be deleted")));
            }
            render_success(ctx.output, &format!("Deleted category {id}"))?;
            Ok(())
        }
        CategoryCommand::List => {
            let rows: Vec<CategoryRow> = store
                .categories()
                .iter()
                .map(|c| CategoryRow::new(store, c))
                .collect();
            render_list(&rows, ctx.output, "No categories.")?;
            Ok(())
        }
    }
}

fn show(store: &Store, id: &str, ctx: &Ctx<'_>) -> anyhow::Result<()> {
    let row = CategoryRow::lookup(store, id)
        .ok_or_else(|| anyhow::anyhow!("category {id} vanished"))?;
    render_item(&row, ctx.output)?;
    Ok(())
}
