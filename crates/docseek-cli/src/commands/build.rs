//! Build command implementation

use anyhow::Result;
use docseek_core::{Config, IndexBuilder};
use tracing::{info, warn};

use crate::cli::BuildArgs;
use crate::output::{JsonFormatter, OutputFormat, TextFormatter};

/// Build the search artifacts and print the report.
pub fn execute(mut config: Config, args: &BuildArgs) -> Result<()> {
    if let Some(root) = &args.content_root {
        config.build.content_root.clone_from(root);
    }
    if let Some(dir) = &args.output_dir {
        config.build.output_dir.clone_from(dir);
    }

    info!(
        "Building search index from {}",
        config.build.content_root.display()
    );
    let report = IndexBuilder::new(config.build).build()?;

    if !report.interactive_files.is_empty() {
        warn!(
            "{} interactive pages are only searchable through curated records",
            report.interactive_files.len()
        );
    }

    match args.format.resolve() {
        OutputFormat::Json => JsonFormatter::print(&report)?,
        OutputFormat::Text => TextFormatter::format_build_report(&report),
    }
    Ok(())
}
