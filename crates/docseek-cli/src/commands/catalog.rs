//! Catalog command implementation

use anyhow::{Context, Result};
use docseek_core::catalog::{category_counts, generate_post_catalog};
use docseek_core::{Config, Storage};
use tracing::info;

use crate::cli::CatalogArgs;
use crate::output::TextFormatter;

/// Regenerate the post catalog from the blog directory.
pub fn execute(mut config: Config, args: &CatalogArgs) -> Result<()> {
    if let Some(dir) = &args.blog_dir {
        config.catalog.blog_dir.clone_from(dir);
    }
    if let Some(output) = &args.output {
        config.catalog.output.clone_from(output);
    }

    let blog_dir = &config.catalog.blog_dir;
    let entries = generate_post_catalog(blog_dir, &config.build.route_prefix)
        .with_context(|| format!("failed to read posts from {}", blog_dir.display()))?;
    Storage::save_catalog(&config.catalog.output, &entries)?;

    info!(
        "Generated catalog with {} posts across {} categories",
        entries.len(),
        category_counts(&entries).len()
    );
    TextFormatter::format_catalog_summary(&config.catalog.output, &entries);
    Ok(())
}
