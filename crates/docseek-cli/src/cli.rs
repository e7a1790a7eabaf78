//! # CLI Structure and Argument Parsing
//!
//! The `docseek` command builds a site's search artifacts and queries them.
//! The CLI is built using `clap` with derive macros.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Build the index (default command)
//! docseek
//! docseek build --format json
//!
//! # Query a local or published index
//! docseek search "quantum routing" --limit 5
//! docseek search routing --index https://example.com/search/index.json
//! docseek suggest "quant rou"
//!
//! # Regenerate the post catalog
//! docseek catalog --blog-dir src/docs/blog --output public/data/blogs.json
//! ```
//!
//! ## Output Formats
//!
//! - **text**: Human-readable output (default for terminals)
//! - **json**: Machine-readable JSON (default when piped)

use clap::{Args, Parser, Subcommand};
use docseek_core::Field;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Main CLI structure for the `docseek` command
#[derive(Parser, Clone, Debug)]
#[command(name = "docseek")]
#[command(version)]
#[command(about = "docseek - Build and query static documentation search indexes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Show debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to configuration file (overrides autodiscovery). Also via `DOCSEEK_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "DOCSEEK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands for the `docseek` CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Build `index.json` and `records.json` from the content tree
    Build(BuildArgs),

    /// Run a ranked query against a serialized index
    Search(SearchArgs),

    /// Complete a partial query
    Suggest(SuggestArgs),

    /// Generate the blog post catalog
    Catalog(CatalogArgs),
}

impl Commands {
    /// Output format requested by the command, if it prints any.
    pub fn format(&self) -> Option<&FormatArg> {
        match self {
            Self::Build(args) => Some(&args.format),
            Self::Search(args) => Some(&args.format),
            Self::Suggest(args) => Some(&args.format),
            Self::Catalog(_) => None,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
pub struct FormatArg {
    /// Output format (`text` or `json`); defaults to text on a terminal, JSON otherwise
    #[arg(short = 'f', long = "format", value_enum, env = "DOCSEEK_OUTPUT_FORMAT")]
    pub format: Option<OutputFormat>,
}

impl FormatArg {
    /// Effective format: the explicit flag, or one detected from stdout.
    #[must_use]
    pub fn resolve(&self) -> OutputFormat {
        self.format.unwrap_or_else(OutputFormat::detect)
    }
}

#[derive(Args, Clone, Debug, Default)]
pub struct BuildArgs {
    /// Content directory to index (overrides `build.content_root`)
    #[arg(long, value_name = "DIR")]
    pub content_root: Option<PathBuf>,

    /// Directory for `index.json` and `records.json` (overrides `build.output_dir`)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub format: FormatArg,
}

/// Query-shaping flags shared by `search` and `suggest`
#[derive(Args, Clone, Debug)]
pub struct QueryArgs {
    /// Query text; multiple words are joined with spaces
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Index path or `http(s)` URL (overrides `search.index_location`)
    #[arg(long, value_name = "PATH|URL", env = "DOCSEEK_INDEX")]
    pub index: Option<String>,

    /// Maximum number of results (at least 1)
    #[arg(short = 'n', long, value_name = "N", value_parser = parse_limit)]
    pub limit: Option<usize>,

    /// Match whole terms only
    #[arg(long)]
    pub no_prefix: bool,

    /// Typo tolerance: a fraction of term length below 1, an edit count otherwise
    #[arg(long, value_name = "F", value_parser = parse_fuzzy)]
    pub fuzzy: Option<f64>,

    /// Field weight, repeatable (e.g. `--boost title=3 --boost tags=0.5`)
    #[arg(long = "boost", value_name = "FIELD=WEIGHT", value_parser = parse_boost)]
    pub boosts: Vec<(Field, f64)>,
}

impl QueryArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Clone, Debug)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Clone, Debug, Default)]
pub struct CatalogArgs {
    /// Directory containing blog posts (overrides `catalog.blog_dir`)
    #[arg(long, value_name = "DIR")]
    pub blog_dir: Option<PathBuf>,

    /// Catalog file to write (overrides `catalog.output`)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

fn parse_boost(raw: &str) -> Result<(Field, f64), String> {
    let (field, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=WEIGHT, got '{raw}'"))?;
    let field: Field = field.parse().map_err(|e: docseek_core::Error| e.to_string())?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{weight}' for {field}"))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight for {field} must be a non-negative number"));
    }
    Ok((field, weight))
}

fn parse_limit(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(limit) => Ok(limit),
        Err(_) => Err(format!("invalid limit '{raw}'")),
    }
}

fn parse_fuzzy(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid fuzziness '{raw}'"))?;
    if !value.is_finite() || value < 0.0 {
        return Err("fuzziness must be a non-negative number".to_string());
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["docseek"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_search_flags() {
        let cli = Cli::try_parse_from([
            "docseek",
            "search",
            "quantum",
            "routing",
            "--limit",
            "3",
            "--no-prefix",
            "--fuzzy",
            "1",
            "--boost",
            "title=4",
            "--boost",
            "tags=0.5",
            "--format",
            "json",
        ])
        .unwrap();

        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.query.query_text(), "quantum routing");
        assert_eq!(args.query.limit, Some(3));
        assert!(args.query.no_prefix);
        assert_eq!(args.query.fuzzy, Some(1.0));
        assert_eq!(args.query.boosts, vec![(Field::Title, 4.0), (Field::Tags, 0.5)]);
        assert_eq!(args.format.resolve(), OutputFormat::Json);
    }

    #[test]
    fn test_boost_parsing_errors() {
        assert!(parse_boost("title").is_err());
        assert!(parse_boost("body=2").is_err());
        assert!(parse_boost("title=heavy").is_err());
        assert!(parse_boost("title=-1").is_err());
        assert_eq!(parse_boost("Description = 2").unwrap(), (Field::Description, 2.0));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert!(Cli::try_parse_from(["docseek", "search", "routing", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["docseek", "suggest", "rout", "-n", "0"]).is_err());
        assert!(parse_limit("many").is_err());
        assert_eq!(parse_limit("1").unwrap(), 1);
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["docseek", "search"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["docseek", "build", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(Cli::try_parse_from(["docseek", "-v", "-q"]).is_err());
    }
}
