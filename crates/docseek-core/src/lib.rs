//! # docseek-core
//!
//! Build-time indexing and run-time querying for static documentation site search.
//!
//! A build walks a content tree of MDX pages, extracts front matter and
//! headings, merges curated and external records, and writes a serialized
//! inverted index plus the flat record list. At run time a [`SearchService`]
//! loads that index once, lazily, and answers ranked queries with field
//! boosting, prefix matching and typo tolerance.
//!
//! ## Architecture
//!
//! - **Building**: [`IndexBuilder`] produces records and artifacts via [`Storage`]
//! - **Parsing**: [`MarkupParser`] reads YAML front matter and `#` headings
//! - **Indexing**: [`SearchIndex`] is a JSON-serializable BM25+ inverted index
//! - **Serving**: [`SearchService`] wraps an [`IndexLoader`] with fail-soft lazy loading
//! - **Catalog**: [`catalog`] turns a blog directory into a dated post list
//!
//! ## Quick Start
//!
//! ```rust
//! use docseek_core::{DocRecord, IndexSchema, SearchIndex, SearchOptions};
//!
//! let mut index = SearchIndex::new(IndexSchema::default());
//! index.add(&DocRecord {
//!     id: "/docs/guide/routing".to_string(),
//!     section: "Guide / Routing".to_string(),
//!     title: "Quantum Routing".to_string(),
//!     description: "How packets find their way".to_string(),
//!     headings: vec!["Getting Started".to_string()],
//!     tags: vec!["blog".to_string()],
//!     slug: "/docs/guide/routing".to_string(),
//! });
//!
//! let hits = index.search("quant", &SearchOptions::default());
//! assert_eq!(hits[0].id, "/docs/guide/routing");
//!
//! let json = index.to_json()?;
//! let reloaded = SearchIndex::from_json(&json, &IndexSchema::default())?;
//! assert_eq!(reloaded.len(), 1);
//! # Ok::<(), docseek_core::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, Error>`]. Problems in individual
//! inputs (bad front matter, malformed curated entries, an unreachable index)
//! are logged through `tracing` and recovered instead:
//!
//! ```rust
//! use docseek_core::{Error, IndexSchema, SearchIndex};
//!
//! match SearchIndex::from_json("{}", &IndexSchema::default()) {
//!     Ok(_) => println!("loaded"),
//!     Err(Error::Index(msg)) => eprintln!("unusable index: {msg}"),
//!     Err(e) => eprintln!("unexpected: {e}"),
//! }
//! ```

/// Index build pipeline and build report
pub mod builder;
/// Post catalog generation
pub mod catalog;
/// `docseek.toml` loading and defaults
pub mod config;
/// Error types and result aliases
pub mod error;
/// HTTP client for remote artifacts
pub mod fetcher;
/// YAML front matter
pub mod frontmatter;
/// Bounded edit distance
pub mod fuzzy;
/// Serializable inverted index
pub mod index;
/// Index artifact sources
pub mod loader;
/// Markup parsing
pub mod parser;
/// Lazily loaded query service
pub mod service;
/// Artifact persistence
pub mod storage;
/// Text normalization
pub mod text;
/// Core data structures
pub mod types;

pub use builder::{BuildReport, CollectedRecords, IndexBuilder};
pub use config::{BuildConfig, CatalogConfig, Config, SearchConfig};
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use index::{IndexSchema, SearchIndex};
pub use loader::{FileIndexLoader, HttpIndexLoader, IndexLoader, loader_for};
pub use parser::{MarkupParser, ParsedMarkup};
pub use service::{SearchService, ServiceState};
pub use storage::Storage;
pub use types::*;
