//! Sources for the serialized index artifact.

use std::path::PathBuf;
use tracing::debug;
use url::Url;

use crate::{Fetcher, Result};

/// Produces the serialized index text.
///
/// Implement this trait to plug a different artifact source into
/// [`crate::SearchService`]; tests use in-memory loaders.
#[async_trait::async_trait]
pub trait IndexLoader: Send + Sync {
    /// Fetch the raw serialized index.
    async fn load(&self) -> Result<String>;

    /// Human-readable location, used in log lines.
    fn describe(&self) -> String;
}

/// Loads the index from a URL.
pub struct HttpIndexLoader {
    fetcher: Fetcher,
    url: String,
}

impl HttpIndexLoader {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_fetcher(Fetcher::new()?, url))
    }

    pub fn with_fetcher(fetcher: Fetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl IndexLoader for HttpIndexLoader {
    async fn load(&self) -> Result<String> {
        self.fetcher.fetch_text(&self.url).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Loads the index from the local filesystem.
pub struct FileIndexLoader {
    path: PathBuf,
}

impl FileIndexLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl IndexLoader for FileIndexLoader {
    async fn load(&self) -> Result<String> {
        debug!("Reading index from {}", self.path.display());
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Pick a loader for `location`: HTTP for `http(s)` URLs, a file otherwise.
///
/// ```rust
/// use docseek_core::loader::loader_for;
///
/// assert_eq!(loader_for("search/index.json")?.describe(), "search/index.json");
/// assert_eq!(
///     loader_for("https://example.com/search/index.json")?.describe(),
///     "https://example.com/search/index.json"
/// );
/// # Ok::<(), docseek_core::Error>(())
/// ```
pub fn loader_for(location: &str) -> Result<Box<dyn IndexLoader>> {
    let is_http = Url::parse(location)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);

    if is_http {
        Ok(Box::new(HttpIndexLoader::new(location)?))
    } else {
        Ok(Box::new(FileIndexLoader::new(location)))
    }
}
