// src/cli/mod.rs
//! CLI command handlers.

pub mod args;
pub mod handlers;

pub use args::{Cli, Commands, RangeArgs};

use crate::config::Config;
use crate::exit::CodestatsExit;
use anyhow::{Context, Result};

/// Loads the config, applies `--repo`/`--out` and runs the subcommand.
///
/// # Errors
/// Returns error from config loading or the handler.
pub fn dispatch(cli: &Cli) -> Result<CodestatsExit> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(repo) = &cli.repo {
        config.repo_dir.clone_from(repo);
    }
    if let Some(out) = &cli.out {
        config.output_root.clone_from(out);
    }

    match &cli.command {
        Commands::Client { range } => handlers::handle_client(&config, range),
        Commands::Dto { thresholds, range } => handlers::handle_dto(&config, *thresholds, range),
        Commands::Summary { report, top } => handlers::handle_summary(&config, *report, *top),
    }
}
