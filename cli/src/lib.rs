//! Command-line front end: argument parsing, logging and dispatch.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tidy_core::{Config, RunOptions, run_config};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Move stale files out of a directory into folders chosen by extension.
#[derive(Debug, Parser)]
#[command(name = "tidy", version, about)]
pub struct Cli {
    /// Path to the configuration file. Created with defaults if missing.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Run every settings block once and exit, whatever its mode.
    #[arg(long)]
    pub once: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Install the fmt subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let default_filter = format!(
        "tidy={level},tidy_cli={level},tidy_core={level},tidy_directory_watcher={level}"
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}

/// Load the configuration and run every settings block until they finish
/// or Ctrl-C is pressed.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    info!("Starting file organization...");

    let shutdown = CancellationToken::new();
    let ctrl_c = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, shutting down");
                    shutdown.cancel();
                }
                Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
            }
        })
    };

    let options = RunOptions {
        force_once: cli.once,
    };
    let result = run_config(&config, options, shutdown).await;
    ctrl_c.abort();

    let reports = result?;
    let moved: usize = reports.iter().map(|r| r.moved.len()).sum();
    info!("File organization finished: {moved} files moved");

    Ok(())
}
