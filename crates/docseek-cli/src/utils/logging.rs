//! Logging initialization and configuration.
//!
//! Sets up the tracing subscriber and color control from CLI flags and
//! environment variables.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Log level for the given flags.
///
/// Machine-readable output drops to errors only unless `--verbose` asks
/// for more.
pub fn log_level(cli: &Cli) -> Level {
    if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || machine_output(cli) {
        Level::ERROR
    } else {
        Level::WARN
    }
}

fn machine_output(cli: &Cli) -> bool {
    cli.command
        .as_ref()
        .and_then(|command| command.format())
        .is_some_and(|format| format.resolve().is_machine_readable())
}

/// Initialize the logging subsystem based on CLI flags.
///
/// Logs go to stderr so stdout carries only command output.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color || machine_output(cli) {
        color_control::set_override(false);
    }
    Ok(())
}
