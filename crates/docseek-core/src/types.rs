use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Tag carried by every record derived from a markup file or the post dataset.
pub const BLOG_TAG: &str = "blog";

/// The unit of indexing: one searchable page or post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    pub id: String,
    pub section: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub headings: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub slug: String,
}

impl DocRecord {
    /// Where selecting this record should take the reader.
    pub fn destination(&self) -> Destination {
        Destination::from_slug(&self.slug)
    }
}

/// An externally authored post, as found in the external dataset and as
/// written by the post catalog generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub summary: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    pub link: String,
}

/// Navigation target derived from a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Absolute `http(s)` URL, opened outside the site.
    External(String),
    /// Route inside the site.
    Internal(String),
}

impl Destination {
    /// Classify a slug by its scheme.
    ///
    /// ```rust
    /// use docseek_core::Destination;
    ///
    /// assert!(Destination::from_slug("https://example.com/post").is_external());
    /// assert_eq!(
    ///     Destination::from_slug("/docs/guide/intro"),
    ///     Destination::Internal("/docs/guide/intro".to_string())
    /// );
    /// ```
    pub fn from_slug(slug: &str) -> Self {
        let lower = slug.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::External(slug.to_string())
        } else {
            Self::Internal(slug.to_string())
        }
    }

    pub const fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }

    pub fn target(&self) -> &str {
        match self {
            Self::External(url) => url,
            Self::Internal(path) => path,
        }
    }
}

/// A searchable (tokenized) field of a [`DocRecord`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Description,
    Headings,
    Tags,
}

impl Field {
    pub const ALL: [Self; 4] = [Self::Title, Self::Description, Self::Headings, Self::Tags];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Headings => "headings",
            Self::Tags => "tags",
        }
    }

    /// Every value of this field in `record`, one entry per list element.
    pub fn values(self, record: &DocRecord) -> Vec<&str> {
        match self {
            Self::Title => vec![record.title.as_str()],
            Self::Description => vec![record.description.as_str()],
            Self::Headings => record.headings.iter().map(String::as_str).collect(),
            Self::Tags => record.tags.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "headings" => Ok(Self::Headings),
            "tags" => Ok(Self::Tags),
            other => Err(Error::Config(format!(
                "unknown search field '{other}' (expected title, description, headings or tags)"
            ))),
        }
    }
}

/// A field copied verbatim into the index so hits can be rendered without
/// the record list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StoredField {
    Slug,
    Title,
    Section,
    Tags,
    Headings,
    Description,
}

/// Stored values for one indexed document. Fields not in the schema's
/// stored list stay `None` and are omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StoredFields {
    pub fn capture(record: &DocRecord, fields: &[StoredField]) -> Self {
        let mut stored = Self::default();
        for field in fields {
            match field {
                StoredField::Slug => stored.slug = Some(record.slug.clone()),
                StoredField::Title => stored.title = Some(record.title.clone()),
                StoredField::Section => stored.section = Some(record.section.clone()),
                StoredField::Tags => stored.tags = Some(record.tags.clone()),
                StoredField::Headings => stored.headings = Some(record.headings.clone()),
                StoredField::Description => {
                    stored.description = Some(record.description.clone());
                },
            }
        }
        stored
    }
}

/// Per-field score multipliers. Fields without an entry weigh `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FieldBoost(BTreeMap<Field, f64>);

impl FieldBoost {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: Field, weight: f64) -> Self {
        self.0.insert(field, weight);
        self
    }

    pub fn set(&mut self, field: Field, weight: f64) {
        self.0.insert(field, weight);
    }

    pub fn get(&self, field: Field) -> f64 {
        self.0.get(&field).copied().unwrap_or(1.0)
    }
}

/// Query-time behavior for [`crate::SearchIndex::search`] and the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Match index terms that start with a query term.
    pub prefix: bool,
    /// Edit-distance tolerance. Below `1.0` it is a fraction of the query
    /// term length, otherwise an absolute number of edits. `0` disables it.
    pub fuzzy: f64,
    pub boost: FieldBoost,
    /// How matches of separate query terms combine.
    pub combine_with: CombineWith,
    /// Maximum number of results returned by the service.
    pub limit: usize,
}

/// Whether a document must match any or every query term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineWith {
    #[default]
    Or,
    And,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            prefix: true,
            fuzzy: 0.2,
            boost: FieldBoost::new()
                .with(Field::Title, 2.0)
                .with(Field::Description, 1.0)
                .with(Field::Headings, 1.0)
                .with(Field::Tags, 1.0),
            combine_with: CombineWith::Or,
            limit: 10,
        }
    }
}

impl SearchOptions {
    /// Defaults used for query completion: every term must match.
    pub fn for_suggestions() -> Self {
        Self {
            prefix: true,
            fuzzy: 0.2,
            boost: FieldBoost::new(),
            combine_with: CombineWith::And,
            limit: 5,
        }
    }
}

/// A raw scored hit from the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    /// Index terms that contributed to the score, sorted.
    pub terms: Vec<String>,
    /// Fields each matched term was found in.
    #[serde(rename = "match")]
    pub matches: BTreeMap<String, Vec<Field>>,
    #[serde(flatten)]
    pub stored: StoredFields,
}

/// A hit augmented with the headings and tags that textually contain a
/// query term.
///
/// The highlight lists come from a plain substring check against the query
/// and are independent of how the index matched the document: a hit ranked
/// through a fuzzy title match can carry empty highlight lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedResult {
    #[serde(flatten)]
    pub hit: SearchHit,
    pub matched_headings: Vec<String>,
    pub matched_tags: Vec<String>,
}

impl EnhancedResult {
    pub fn destination(&self) -> Destination {
        Destination::from_slug(self.hit.stored.slug.as_deref().unwrap_or(&self.hit.id))
    }
}

/// A ranked query completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggestion: String,
    pub terms: Vec<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warn,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DocRecord {
        DocRecord {
            id: "/docs/guide/intro".to_string(),
            section: "Guide / Intro".to_string(),
            title: "Intro".to_string(),
            description: "Start here".to_string(),
            headings: vec!["Getting Started".to_string()],
            tags: vec!["blog".to_string(), "guide".to_string()],
            slug: "/docs/guide/intro".to_string(),
        }
    }

    #[test]
    fn test_destination_classification() {
        assert!(Destination::from_slug("https://example.com").is_external());
        assert!(Destination::from_slug("HTTP://EXAMPLE.COM").is_external());
        assert!(!Destination::from_slug("/docs/blog/post").is_external());
        assert!(!Destination::from_slug("ftp://example.com").is_external());
        assert_eq!(
            Destination::from_slug("/docs/x").target(),
            "/docs/x",
            "internal target is the slug itself"
        );
    }

    #[test]
    fn test_record_defaults_when_optional_fields_missing() {
        let json = r#"{"id":"a","section":"S","slug":"/docs/a"}"#;
        let parsed: DocRecord = serde_json::from_str(json).expect("valid record");
        assert!(parsed.title.is_empty());
        assert!(parsed.headings.is_empty());
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_record_requires_slug() {
        let json = r#"{"id":"a","section":"S","title":"T"}"#;
        assert!(serde_json::from_str::<DocRecord>(json).is_err());
    }

    #[test]
    fn test_post_entry_uses_abstract_key() {
        let json = r#"{"title":"T","abstract":"A","date":"2024-01-01","category":"ml","link":"https://x.dev"}"#;
        let post: PostEntry = serde_json::from_str(json).expect("valid post");
        assert_eq!(post.summary, "A");
        let back = serde_json::to_value(&post).expect("serializes");
        assert_eq!(back["abstract"], "A");
    }

    #[test]
    fn test_field_values_and_parsing() {
        let rec = record();
        assert_eq!(Field::Headings.values(&rec), vec!["Getting Started"]);
        assert_eq!(Field::Tags.values(&rec).len(), 2);
        assert_eq!("Title".parse::<Field>().ok(), Some(Field::Title));
        assert!("body".parse::<Field>().is_err());
    }

    #[test]
    fn test_stored_fields_capture_only_requested() {
        let stored = StoredFields::capture(&record(), &[StoredField::Slug, StoredField::Title]);
        assert_eq!(stored.slug.as_deref(), Some("/docs/guide/intro"));
        assert_eq!(stored.title.as_deref(), Some("Intro"));
        assert!(stored.headings.is_none());

        let json = serde_json::to_value(&stored).expect("serializes");
        assert!(json.get("headings").is_none());
    }

    #[test]
    fn test_boost_defaults_to_one() {
        let boost = FieldBoost::new().with(Field::Title, 3.0);
        assert!((boost.get(Field::Title) - 3.0).abs() < f64::EPSILON);
        assert!((boost.get(Field::Tags) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_enhanced_result_json_shape() {
        let result = EnhancedResult {
            hit: SearchHit {
                id: "a".to_string(),
                score: 1.5,
                terms: vec!["start".to_string()],
                matches: BTreeMap::new(),
                stored: StoredFields::capture(&record(), &[StoredField::Slug]),
            },
            matched_headings: vec!["Getting Started".to_string()],
            matched_tags: Vec::new(),
        };
        let json = serde_json::to_value(&result).expect("serializes");
        assert_eq!(json["matchedHeadings"][0], "Getting Started");
        assert_eq!(json["slug"], "/docs/guide/intro");
        assert_eq!(json["id"], "a");
    }
}
