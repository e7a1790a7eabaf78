//! YAML front-matter handling for markup documents.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::Result;

/// Metadata declared at the top of a markup document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub excerpt: Option<String>,
    pub date: Option<String>,
    pub category: OneOrMany,
    pub tags: OneOrMany,
}

/// A YAML value that may be written as a scalar or a list.
///
/// Numbers and booleans are kept as their text; nested maps and lists are
/// ignored rather than failing the whole block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::One(value) => vec![value.clone()],
            Self::Many(values) => values.clone(),
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::One(value) => Some(value),
            Self::Many(values) => values.first().map(String::as_str),
        }
    }
}

impl<'de> Deserialize<'de> for OneOrMany {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Sequence(items) => Self::Many(items.iter().filter_map(scalar_text).collect()),
            other => scalar_text(&other).map_or(Self::None, Self::One),
        })
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

impl FrontMatter {
    /// Parse a YAML block. An empty block yields the default.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Split a document into its front-matter block and body.
///
/// The block starts with a first line that is exactly `---` and ends at the
/// next such line. Without both fences the whole text is body.
///
/// ```rust
/// use docseek_core::frontmatter::split_front_matter;
///
/// let (yaml, body) = split_front_matter("---\ntitle: Hi\n---\n# Heading\n");
/// assert_eq!(yaml, Some("title: Hi\n"));
/// assert_eq!(body, "# Heading\n");
/// ```
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(after_open) = strip_fence_line(text) else {
        return (None, text);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, text)
}

fn strip_fence_line(text: &str) -> Option<&str> {
    let first_end = text.find('\n').map_or(text.len(), |i| i + 1);
    let first = &text[..first_end];
    if first.trim_end_matches(['\r', '\n']) == "---" {
        Some(&text[first_end..])
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_without_front_matter() {
        let (yaml, body) = split_front_matter("# Title\ntext");
        assert!(yaml.is_none());
        assert_eq!(body, "# Title\ntext");
    }

    #[test]
    fn test_split_unclosed_fence_is_body() {
        let text = "---\ntitle: x\n# Heading";
        let (yaml, body) = split_front_matter(text);
        assert!(yaml.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_split_handles_crlf_and_bom() {
        let (yaml, body) = split_front_matter("\u{feff}---\r\ntitle: x\r\n---\r\nbody");
        assert_eq!(yaml, Some("title: x\r\n"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_parse_scalar_and_list_forms() {
        let fm = FrontMatter::from_yaml("title: Post\ncategory: ml\ntags: [rust, search]\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Post"));
        assert_eq!(fm.category.to_vec(), vec!["ml"]);
        assert_eq!(fm.tags.to_vec(), vec!["rust", "search"]);

        let fm = FrontMatter::from_yaml("category:\n  - a\n  - b\ntags: solo\n").unwrap();
        assert_eq!(fm.category.first(), Some("a"));
        assert_eq!(fm.tags.to_vec(), vec!["solo"]);
    }

    #[test]
    fn test_non_string_scalars_keep_metadata() {
        let fm = FrontMatter::from_yaml(
            "title: Release Notes\ndescription: Yearly wrap-up\ncategory: 2024\ntags: [rust, 2024, true]\n",
        )
        .unwrap();
        assert_eq!(fm.title.as_deref(), Some("Release Notes"));
        assert_eq!(fm.description.as_deref(), Some("Yearly wrap-up"));
        assert_eq!(fm.category.to_vec(), vec!["2024"]);
        assert_eq!(fm.tags.to_vec(), vec!["rust", "2024", "true"]);
    }

    #[test]
    fn test_nested_tag_values_are_dropped() {
        let fm = FrontMatter::from_yaml("title: T\ntags: [a, {b: c}, [d]]\ncategory: ~\n").unwrap();
        assert_eq!(fm.tags.to_vec(), vec!["a"]);
        assert_eq!(fm.category, OneOrMany::None);
    }

    #[test]
    fn test_parse_date_as_string() {
        let fm = FrontMatter::from_yaml("date: 2024-03-01\n").unwrap();
        assert_eq!(fm.date.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_parse_empty_block() {
        assert_eq!(FrontMatter::from_yaml("  \n").unwrap(), FrontMatter::default());
    }

    #[test]
    fn test_parse_malformed_yaml_is_error() {
        assert!(FrontMatter::from_yaml("title: [unclosed\n").is_err());
        assert!(FrontMatter::from_yaml("title:\n  nested: map\n").is_err());
    }
}
