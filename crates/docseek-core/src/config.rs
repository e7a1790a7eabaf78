//! Configuration for building and querying a site index.
//!
//! Settings live in a `docseek.toml` file with three sections. Every key is
//! optional; omitted keys take the defaults shown below.
//!
//! ```toml
//! [build]
//! content_root = "src/docs"
//! markup_extensions = ["mdx"]
//! interactive_extensions = ["tsx"]
//! disabled_prefix = "-"
//! route_prefix = "/docs/"
//! root_section = "Home"
//! curated_records = "src/config/search/records.json"
//! external_posts = "src/config/search/posts.json"
//! output_dir = "public/search"
//!
//! [search]
//! index_location = "public/search/index.json"
//! prefix = true
//! fuzzy = 0.2
//! limit = 10
//! suggest_limit = 5
//! boost = { title = 2.0, description = 1.0, headings = 1.0, tags = 1.0 }
//!
//! [catalog]
//! blog_dir = "src/docs/blog"
//! output = "public/data/blogs.json"
//! ```
//!
//! ## Lookup order
//!
//! 1. An explicit path (`--config`)
//! 2. `$DOCSEEK_CONFIG`
//! 3. `./docseek.toml`
//! 4. `docseek.toml` in the platform config directory
//!
//! Relative paths inside a file are resolved against that file's directory.
//! `DOCSEEK_CONTENT_ROOT`, `DOCSEEK_OUTPUT_DIR` and `DOCSEEK_INDEX` override
//! the corresponding keys after the file is read.

use crate::{Error, FieldBoost, Result, SearchOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "docseek.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub build: BuildConfig,
    pub search: SearchConfig,
    pub catalog: CatalogConfig,
    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Inputs and outputs of an index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory walked for markup and interactive pages.
    pub content_root: PathBuf,
    /// Extensions (without dot) parsed as markup documents.
    pub markup_extensions: Vec<String>,
    /// Extensions of pages that need a hand-written record.
    pub interactive_extensions: Vec<String>,
    /// File-name prefix that excludes a markup file from the index.
    pub disabled_prefix: String,
    /// Prepended to a file's relative path to form its route.
    pub route_prefix: String,
    /// Section name used for the content root's index page.
    pub root_section: String,
    pub curated_records: Option<PathBuf>,
    pub external_posts: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("src/docs"),
            markup_extensions: vec!["mdx".to_string()],
            interactive_extensions: vec!["tsx".to_string()],
            disabled_prefix: "-".to_string(),
            route_prefix: "/docs/".to_string(),
            root_section: "Home".to_string(),
            curated_records: None,
            external_posts: None,
            output_dir: PathBuf::from("public/search"),
        }
    }
}

/// Query defaults for the `search` and `suggest` commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Path or `http(s)` URL of the serialized index.
    pub index_location: String,
    pub prefix: bool,
    pub fuzzy: f64,
    pub limit: usize,
    pub suggest_limit: usize,
    pub boost: FieldBoost,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let options = SearchOptions::default();
        Self {
            index_location: "public/search/index.json".to_string(),
            prefix: options.prefix,
            fuzzy: options.fuzzy,
            limit: options.limit,
            suggest_limit: SearchOptions::for_suggestions().limit,
            boost: options.boost,
        }
    }
}

impl SearchConfig {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            prefix: self.prefix,
            fuzzy: self.fuzzy,
            boost: self.boost.clone(),
            limit: self.limit,
            ..SearchOptions::default()
        }
    }

    pub fn suggest_options(&self) -> SearchOptions {
        SearchOptions {
            prefix: self.prefix,
            fuzzy: self.fuzzy,
            limit: self.suggest_limit,
            ..SearchOptions::for_suggestions()
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.fuzzy.is_finite() || self.fuzzy < 0.0 {
            return Err(Error::Config(format!(
                "search.fuzzy must be a non-negative number, got {}",
                self.fuzzy
            )));
        }
        if self.limit == 0 || self.suggest_limit == 0 {
            return Err(Error::Config(
                "search.limit and search.suggest_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Inputs and output of the post catalog generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub blog_dir: PathBuf,
    pub output: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            blog_dir: PathBuf::from("src/docs/blog"),
            output: PathBuf::from("public/data/blogs.json"),
        }
    }
}

impl Config {
    /// Locate and load the configuration, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `explicit` names a file that does not exist
    /// - The located file cannot be read or is not valid TOML
    /// - A value is out of range (negative fuzziness, zero limits)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os("DOCSEEK_CONFIG").map(PathBuf::from);
        let mut config = match Self::locate(explicit, env_path.as_deref())? {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE);
                Self::default()
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn locate(explicit: Option<&Path>, env_path: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit.or(env_path) {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Some(path.to_path_buf()));
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Ok(Some(local));
        }

        Ok(directories::ProjectDirs::from("dev", "docseek", "docseek")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .filter(|path| path.exists()))
    }

    /// Read one config file, resolving its relative paths against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let mut config = Self::from_toml_str(&content, base)?;
        config.source = Some(path.to_path_buf());
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text, resolving relative paths against `base`.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.search.validate()?;
        config.resolve_paths(base);
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let build = &mut self.build;
        resolve(&mut build.content_root, base);
        resolve(&mut build.output_dir, base);
        if let Some(path) = build.curated_records.as_mut() {
            resolve(path, base);
        }
        if let Some(path) = build.external_posts.as_mut() {
            resolve(path, base);
        }
        resolve(&mut self.catalog.blog_dir, base);
        resolve(&mut self.catalog.output, base);

        if !is_url(&self.search.index_location) {
            let mut location = PathBuf::from(&self.search.index_location);
            resolve(&mut location, base);
            self.search.index_location = location.to_string_lossy().into_owned();
        }
    }

    /// Apply `DOCSEEK_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("DOCSEEK_CONTENT_ROOT").filter(|v| !v.is_empty()) {
            self.build.content_root = PathBuf::from(root);
        }
        if let Some(output) = lookup("DOCSEEK_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.build.output_dir = PathBuf::from(output);
        }
        if let Some(index) = lookup("DOCSEEK_INDEX").filter(|v| !v.is_empty()) {
            self.search.index_location = index;
        }
    }
}

fn resolve(path: &mut PathBuf, base: &Path) {
    if path.is_relative() && !base.as_os_str().is_empty() {
        *path = base.join(&*path);
    }
}

fn is_url(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
