//! Error types and handling for docseek-core operations.
//!
//! A single error enum covers every failure the library can surface. Most
//! problems met while building or querying are *recovered* (logged and
//! skipped) rather than returned; what reaches a caller is either an I/O
//! failure during a build or a load failure the caller asked to see.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading content sources, writing artifacts
//! - **Network Errors**: fetching the serialized index over HTTP
//! - **Parse Errors**: malformed source files (front matter, JSON datasets)
//! - **Index Errors**: schema mismatches, unusable serialized indexes
//! - **Storage Errors**: committing artifacts to the output directory
//! - **Configuration Errors**: invalid `docseek.toml` values
//!
//! ```rust
//! use docseek_core::Error;
//!
//! let err = Error::Index("schema mismatch".to_string());
//! assert_eq!(err.category(), "index");
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for docseek-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Missing or unreadable content sources surface here and abort a build.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Raised while fetching the serialized index artifact. The search
    /// service recovers from it; direct callers of the fetcher see it.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Source content could not be parsed.
    ///
    /// ## Common Causes
    ///
    /// - A curated record file that is not a JSON array
    /// - An external post dataset with the wrong shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Search index operation failed.
    ///
    /// ## Common Causes
    ///
    /// - Loading an index built with a different field configuration
    /// - A serialized index that is truncated or corrupt
    #[error("Index error: {0}")]
    Index(String),

    /// Artifact storage failed.
    ///
    /// Covers writing `index.json`, `records.json` and the post catalog
    /// through their temporary files.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might go away when the operation is retried.
    ///
    /// Connection problems, timeouts and interrupted I/O qualify; everything
    /// describing bad input does not.
    ///
    /// ```rust
    /// use docseek_core::Error;
    /// use std::io;
    ///
    /// assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow disk")).is_recoverable());
    /// assert!(!Error::Parse("not an array".to_string()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful as a structured logging field.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Index(_) => "index",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
