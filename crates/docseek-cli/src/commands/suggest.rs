//! Suggest command implementation

use anyhow::Result;
use docseek_core::{Config, Suggestion};
use serde::Serialize;

use super::{open_service, query_options};
use crate::cli::SuggestArgs;
use crate::output::{JsonFormatter, OutputFormat, TextFormatter};

#[derive(Serialize)]
struct SuggestPayload<'a> {
    query: &'a str,
    suggestions: &'a [Suggestion],
}

pub async fn execute(config: &Config, args: &SuggestArgs) -> Result<()> {
    let query = args.query.query_text();
    let options = query_options(config.search.suggest_options(), &args.query);

    let service = open_service(&config.search, &args.query)?;
    let suggestions = service.suggest(&query, &options).await;

    match args.format.resolve() {
        OutputFormat::Json => JsonFormatter::print(&SuggestPayload {
            query: &query,
            suggestions: &suggestions,
        })?,
        OutputFormat::Text => TextFormatter::format_suggestions(&query, &suggestions),
    }
    Ok(())
}
