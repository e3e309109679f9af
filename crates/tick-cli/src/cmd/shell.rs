//! `tk shell`: an interactive session over one open store.
//!
//! Undo and redo history lives as long as the session. Each input line is
//! parsed with the same clap definitions as one-shot commands.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, IsTerminal, Write};
use tick_core::Store;
use tracing::debug;

use super::{Ctx, StoreCommand, execute, report};

const PROMPT: &str = "tick> ";

#[derive(Parser, Debug)]
#[command(
    name = "tick",
    no_binary_name = true,
    disable_version_flag = true
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    #[command(flatten)]
    Store(StoreCommand),
    /// Write pending changes to disk now.
    Save,
    /// Leave the shell.
    #[command(visible_alias = "exit")]
    Quit,
}

/// Run the read-eval loop until `quit` or end of input.
///
/// Command failures are reported and the loop continues.
pub fn run_shell(store: &mut Store, ctx: &Ctx<'_>, input: impl BufRead) -> anyhow::Result<()> {
    let interactive = io::stdin().is_terminal();
    let mut lines = input.lines();
    loop {
        if interactive {
            let mut out = io::stdout().lock();
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read shell input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let words = match split_words(line) {
            Ok(words) => words,
            Err(message) => {
                report(ctx.output, &super::rejected(message));
                continue;
            }
        };
        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(err) => {
                err.print()?;
                continue;
            }
        };

        debug!(line, "shell command");
        match parsed.command {
            ShellCommand::Quit => break,
            ShellCommand::Save => {
                if let Err(err) = store.flush() {
                    report(ctx.output, &super::fail(err.code(), err.to_string()));
                }
            }
            ShellCommand::Store(command) => {
                if let Err(err) = execute(store, &command, ctx) {
                    report(ctx.output, &err);
                }
            }
        }
    }
    Ok(())
}

/// Split a line into words, honoring single and double quotes and
/// backslash escapes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"') | None, '\\') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "dangling backslash at end of line".to_string())?;
                current.push(escaped);
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
