#![forbid(unsafe_code)]

mod cmd;
mod output;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tick_core::Store;
use tick_core::config::{load_user_config, resolve_data_path};
use tick_core::error::ErrorCode;
use tick_core::persist::JsonFileBackend;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tk: a small undoable todo list",
    long_about = None
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (same as `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// State file to use instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Store(cmd::StoreCommand),

    #[command(
        next_help_heading = "Session",
        about = "Start an interactive session",
        long_about = "Read commands from stdin against one open store. Undo and redo work across commands for the whole session.",
        after_help = "EXAMPLES:\n    tk shell\n    printf 'add Buy milk\\nundo\\n' | tk shell"
    )]
    Shell,

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    tk completions bash\n    tk completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TICK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "tick_core=debug,tk=debug,info"
        } else {
            "tick_core=info,tk=info,warn"
        })
    });

    let format = env::var("TICK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout belongs to command output.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store_command = match cli.command {
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Store(command) => Some(command),
        Commands::Shell => None,
    };

    let config = match load_user_config() {
        Ok(config) => config,
        Err(err) => {
            let output = resolve_output_mode(cli.format, cli.json, None);
            render_error(
                output,
                &CliError::coded(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };
    let output = resolve_output_mode(cli.format, cli.json, config.output.as_deref());
    let data_path = resolve_data_path(cli.data.as_deref(), &config);
    debug!(path = %data_path.display(), ?output, "resolved data file");

    let backend = JsonFileBackend::new(&data_path);
    let mut store = match Store::open(backend, config.store.clone()) {
        Ok(store) => store,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let ctx = cmd::Ctx {
        output,
        data_path: &data_path,
    };
    let result = match store_command {
        Some(command) => cmd::execute(&mut store, &command, &ctx),
        None => cmd::shell::run_shell(&mut store, &ctx, io::stdin().lock()),
    };

    let mut code = ExitCode::SUCCESS;
    if let Err(err) = &result {
        cmd::report(output, err);
        code = ExitCode::FAILURE;
    }
    if let Err(err) = store
        .close()
        .with_context(|| format!("failed to save {}", data_path.display()))
    {
        cmd::report(output, &err);
        code = ExitCode::FAILURE;
    }
    Ok(code)
}
