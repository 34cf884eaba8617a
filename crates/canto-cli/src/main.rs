use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;
mod write_lock;

/// Env var holding an `EnvFilter` directive that replaces the flag-derived level.
const LOG_ENV: &str = "CANTO_LOG";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("canto error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    ui::init(&flags);
    init_tracing(cli.quiet, cli.verbose, ui::prefs().progress)?;

    let project_root = context::resolve_project_root(flags.project.as_deref())?;
    let config = bootstrap::load_config(&project_root).await?;
    context::warn_unconfigured(&config);
    tracing::debug!(root = %project_root.display(), "resolved project root");

    let command = cli.command;
    let write_lock = if command_requires_write_lock(&command) {
        Some(
            write_lock::acquire_for_project(&project_root)
                .context("failed to lock project for generation")?,
        )
    } else {
        None
    };

    let ctx = context::AppContext::new(&project_root, config);
    let result = commands::dispatch::dispatch(command, &ctx, &flags).await;
    drop(write_lock);
    result
}

/// Per-entry `info` lines would tear the progress bars, so they are only shown
/// when no bar is drawn.
fn init_tracing(quiet: bool, verbose: bool, progress: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else if progress {
        "warn"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Only generation writes into the audio directories.
const fn command_requires_write_lock(command: &cli::Commands) -> bool {
    match command {
        cli::Commands::Generate(args) => !args.check,
        cli::Commands::Check | cli::Commands::Say(_) => false,
    }
}
