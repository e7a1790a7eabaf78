//! Search command implementation

use anyhow::Result;
use docseek_core::{Config, EnhancedResult};
use serde::Serialize;
use tracing::debug;

use super::{open_service, query_options};
use crate::cli::SearchArgs;
use crate::output::{JsonFormatter, OutputFormat, TextFormatter};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchPayload<'a> {
    query: &'a str,
    total_results: usize,
    results: &'a [EnhancedResult],
}

/// Run a ranked query. An unreachable index yields no results, not an error.
pub async fn execute(config: &Config, args: &SearchArgs) -> Result<()> {
    let query = args.query.query_text();
    let options = query_options(config.search.search_options(), &args.query);
    debug!("search options: {:?}", options);

    let service = open_service(&config.search, &args.query)?;
    let results = service.search(&query, &options).await;

    match args.format.resolve() {
        OutputFormat::Json => JsonFormatter::print(&SearchPayload {
            query: &query,
            total_results: results.len(),
            results: &results,
        })?,
        OutputFormat::Text => TextFormatter::format_search_results(&query, &results),
    }
    Ok(())
}
