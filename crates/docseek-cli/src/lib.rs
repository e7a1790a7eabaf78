//! docseek CLI - build and query static documentation search indexes
//!
//! The binary in `main.rs` only hands control to [`run`]. Every command is
//! implemented in its own module under `commands`.

use anyhow::Result;
use clap::Parser;
use docseek_core::Config;
use tracing::debug;

mod cli;
mod commands;
mod output;
mod utils;

use crate::utils::initialize_logging;
use cli::{BuildArgs, Cli, Commands};

/// Execute the docseek CLI with the current process arguments.
///
/// # Errors
///
/// Returns an error if configuration loading or the command itself fails.
pub async fn run() -> Result<()> {
    // Exit quietly when stdout is closed early by a pipe
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe") || msg.contains("broken pipe") {
            std::process::exit(0);
        }
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let config = Config::load(cli.config.as_deref())?;
    match &config.source {
        Some(path) => debug!("Using configuration from {}", path.display()),
        None => debug!("No configuration file found, using defaults"),
    }

    execute_command(cli, config).await
}

async fn execute_command(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Some(Commands::Build(args)) => commands::build_index(config, &args)?,
        Some(Commands::Search(args)) => commands::search(&config, &args).await?,
        Some(Commands::Suggest(args)) => commands::suggest(&config, &args).await?,
        Some(Commands::Catalog(args)) => commands::generate_catalog(config, &args)?,
        None => {
            // Bare `docseek` builds with configured defaults
            commands::build_index(config, &BuildArgs::default())?;
        },
    }
    Ok(())
}
