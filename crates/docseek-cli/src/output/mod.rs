//! Output formatting for command results.
//!
//! Text output is meant for people at a terminal; JSON output for scripts.
//! When `--format` is not given, the format follows whether stdout is a
//! terminal.
//!
//! JSON format for `search`:
//! ```json
//! {
//!   "query": "routing",
//!   "totalResults": 1,
//!   "results": [{
//!     "id": "/docs/guide/routing",
//!     "score": 4.21,
//!     "terms": ["routing"],
//!     "match": {"routing": ["title"]},
//!     "slug": "/docs/guide/routing",
//!     "title": "Quantum Routing",
//!     "matchedHeadings": [],
//!     "matchedTags": []
//!   }]
//! }
//! ```

mod json;
mod text;

use clap::ValueEnum;
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Output format for CLI results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable formatted text (default for terminals).
    #[default]
    Text,
    /// JSON format for machine consumption (default for pipes).
    Json,
}

impl OutputFormat {
    /// Check if this format is machine-readable.
    #[must_use]
    pub const fn is_machine_readable(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Returns `Text` for interactive terminals, `Json` for pipes/redirects.
    #[must_use]
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Text
        } else {
            Self::Json
        }
    }
}
