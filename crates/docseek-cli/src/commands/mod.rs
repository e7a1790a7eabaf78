//! Command implementations for the docseek CLI
//!
//! Each command lives in its own submodule and receives the loaded
//! [`Config`](docseek_core::Config) with CLI overrides still to apply.

mod build;
mod catalog;
mod search;
mod suggest;

pub use build::execute as build_index;
pub use catalog::execute as generate_catalog;
pub use search::execute as search;
pub use suggest::execute as suggest;

use docseek_core::{IndexSchema, SearchConfig, SearchOptions, SearchService, loader_for};

use crate::cli::QueryArgs;

/// Apply the query-shaping flags on top of configured defaults.
pub(crate) fn query_options(mut options: SearchOptions, args: &QueryArgs) -> SearchOptions {
    if let Some(limit) = args.limit {
        options.limit = limit;
    }
    if args.no_prefix {
        options.prefix = false;
    }
    if let Some(fuzzy) = args.fuzzy {
        options.fuzzy = fuzzy;
    }
    for (field, weight) in &args.boosts {
        options.boost.set(*field, *weight);
    }
    options
}

/// Service over the index named by `--index` or the configured location.
pub(crate) fn open_service(
    search: &SearchConfig,
    args: &QueryArgs,
) -> anyhow::Result<SearchService> {
    let location = args.index.as_deref().unwrap_or(&search.index_location);
    let loader = loader_for(location)?;
    Ok(SearchService::new(loader, IndexSchema::default()))
}
