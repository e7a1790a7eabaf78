//! Lazily initialized query service over a serialized index.

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::loader::IndexLoader;
use crate::{EnhancedResult, IndexSchema, SearchIndex, SearchOptions, Suggestion};

/// Whether the index has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Initialized,
}

/// Answers queries against the published index.
///
/// The index is loaded on first use. Concurrent callers share one in-flight
/// load, and a failed load leaves the service initialized with an empty
/// index, so queries degrade to no results instead of erroring.
///
/// Share the service between call sites with an `Arc`.
pub struct SearchService {
    loader: Box<dyn IndexLoader>,
    schema: IndexSchema,
    index: OnceCell<Arc<SearchIndex>>,
}

impl SearchService {
    pub fn new(loader: Box<dyn IndexLoader>, schema: IndexSchema) -> Self {
        Self {
            loader,
            schema,
            index: OnceCell::new(),
        }
    }

    pub fn state(&self) -> ServiceState {
        if self.index.initialized() {
            ServiceState::Initialized
        } else {
            ServiceState::Uninitialized
        }
    }

    /// Load the index if no caller has yet. Never fails.
    #[tracing::instrument(skip(self), fields(source = %self.loader.describe()))]
    pub async fn initialize(&self) -> Arc<SearchIndex> {
        let index = self
            .index
            .get_or_init(|| async { Arc::new(self.load_index().await) })
            .await;
        Arc::clone(index)
    }

    async fn load_index(&self) -> SearchIndex {
        let source = self.loader.describe();
        let loaded = match self.loader.load().await {
            Ok(text) => SearchIndex::from_json(&text, &self.schema),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(index) => {
                info!("Loaded search index from {} ({} documents)", source, index.len());
                index
            },
            Err(e) => {
                error!(
                    category = e.category(),
                    "Failed to load search index from {}: {}", source, e
                );
                SearchIndex::new(self.schema.clone())
            },
        }
    }

    /// Ranked results for `query`, at most `options.limit` of them.
    #[tracing::instrument(skip(self, options))]
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Vec<EnhancedResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let index = self.initialize().await;
        let mut hits = index.search(query, options);
        hits.truncate(options.limit);
        debug!("Returning {} results", hits.len());

        let query_terms = highlight_terms(query);
        hits.into_iter()
            .map(|hit| {
                let matched_headings =
                    find_matches(hit.stored.headings.as_deref().unwrap_or_default(), &query_terms);
                let matched_tags =
                    find_matches(hit.stored.tags.as_deref().unwrap_or_default(), &query_terms);
                EnhancedResult {
                    hit,
                    matched_headings,
                    matched_tags,
                }
            })
            .collect()
    }

    /// Query completions for `query`, at most `options.limit` of them.
    #[tracing::instrument(skip(self, options))]
    pub async fn suggest(&self, query: &str, options: &SearchOptions) -> Vec<Suggestion> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let index = self.initialize().await;
        let mut suggestions = index.auto_suggest(query, options);
        suggestions.truncate(options.limit);
        suggestions
    }
}

fn highlight_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Values whose lowercase text contains any of `terms`.
fn find_matches(values: &[String], terms: &[String]) -> Vec<String> {
    values
        .iter()
        .filter(|value| {
            let lower = value.to_lowercase();
            terms.iter().any(|term| lower.contains(term.as_str()))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{DocRecord, Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingLoader {
        payload: Result<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl IndexLoader for CountingLoader {
        async fn load(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            match &self.payload {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(Error::Other(e.to_string())),
            }
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    fn record(id: &str, title: &str, headings: &[&str], tags: &[&str]) -> DocRecord {
        DocRecord {
            id: id.to_string(),
            section: "Guide".to_string(),
            title: title.to_string(),
            description: String::new(),
            headings: headings.iter().map(ToString::to_string).collect(),
            tags: tags.iter().map(ToString::to_string).collect(),
            slug: format!("/docs/{id}"),
        }
    }

    fn service_with(records: &[DocRecord]) -> (SearchService, Arc<AtomicUsize>) {
        let mut index = SearchIndex::default();
        index.add_all(records);
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = CountingLoader {
            payload: Ok(index.to_json().unwrap()),
            calls: Arc::clone(&calls),
        };
        (SearchService::new(Box::new(loader), IndexSchema::default()), calls)
    }

    #[tokio::test]
    async fn test_concurrent_first_use_loads_once() {
        let (service, calls) = service_with(&[record("a", "Alpha", &[], &[])]);
        let service = Arc::new(service);
        assert_eq!(service.state(), ServiceState::Uninitialized);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.search("alpha", &SearchOptions::default()).await })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            assert_eq!(result.unwrap().len(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.state(), ServiceState::Initialized);
    }

    #[tokio::test]
    async fn test_failed_load_degrades_to_empty_index() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = CountingLoader {
            payload: Err(Error::Other("connection refused".to_string())),
            calls: Arc::clone(&calls),
        };
        let service = SearchService::new(Box::new(loader), IndexSchema::default());

        assert!(service.search("anything", &SearchOptions::default()).await.is_empty());
        assert!(service.search("again", &SearchOptions::default()).await.is_empty());
        assert_eq!(service.state(), ServiceState::Initialized);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_index_degrades_to_empty_index() {
        let loader = CountingLoader {
            payload: Ok("not json".to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let service = SearchService::new(Box::new(loader), IndexSchema::default());
        assert!(service.initialize().await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_skips_initialization() {
        let (service, calls) = service_with(&[record("a", "Alpha", &[], &[])]);
        assert!(service.search("   ", &SearchOptions::default()).await.is_empty());
        assert!(service.suggest("", &SearchOptions::for_suggestions()).await.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.state(), ServiceState::Uninitialized);
    }

    #[tokio::test]
    async fn test_limit_keeps_highest_scores() {
        let records: Vec<DocRecord> = (0..20)
            .map(|i| {
                let title = if i < 5 { "widget widget" } else { "widget" };
                let mut rec = record(&format!("doc-{i}"), title, &[], &[]);
                rec.description = "filler text ".repeat(i + 1);
                rec
            })
            .collect();
        let (service, _) = service_with(&records);

        let index = service.initialize().await;
        let all = index.search("widget", &SearchOptions::default());
        assert_eq!(all.len(), 20);

        let limited = service.search("widget", &SearchOptions::default()).await;
        assert_eq!(limited.len(), 10);
        let expected: Vec<&str> = all.iter().take(10).map(|hit| hit.id.as_str()).collect();
        let actual: Vec<&str> = limited.iter().map(|r| r.hit.id.as_str()).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_heading_and_tag_highlights() {
        let (service, _) = service_with(&[record(
            "intro",
            "Introduction",
            &["Getting Started", "Installation"],
            &["blog", "Starter Kit"],
        )]);

        let results = service.search("start", &SearchOptions::default()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matched_headings, vec!["Getting Started"]);
        assert_eq!(results[0].matched_tags, vec!["Starter Kit"]);
        assert_eq!(results[0].destination().target(), "/docs/intro");
    }

    #[tokio::test]
    async fn test_suggest_respects_limit() {
        let records: Vec<DocRecord> = ["route", "router", "routing", "routes", "routed", "routine"]
            .iter()
            .map(|word| record(word, word, &[], &[]))
            .collect();
        let (service, _) = service_with(&records);

        let options = SearchOptions {
            limit: 3,
            ..SearchOptions::for_suggestions()
        };
        assert_eq!(service.suggest("rout", &options).await.len(), 3);
    }

    #[test]
    fn test_find_matches_is_case_insensitive() {
        let values = vec!["Getting Started".to_string(), "FAQ".to_string()];
        assert_eq!(
            find_matches(&values, &highlight_terms("STARTED faq")),
            vec!["Getting Started", "FAQ"]
        );
    }
}
