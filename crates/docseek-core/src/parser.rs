use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

use crate::frontmatter::{FrontMatter, split_front_matter};
use crate::text::strip_markup;
use crate::{Diagnostic, DiagnosticSeverity};

#[allow(clippy::expect_used)]
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+)$").expect("heading pattern is valid"));

/// Extracts front matter and section headings from MDX/markdown sources.
///
/// Parsing is infallible: malformed front matter degrades to empty metadata
/// and is reported as a diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupParser;

impl MarkupParser {
    pub const fn new() -> Self {
        Self
    }

    /// Parse one document. `file` labels diagnostics and log lines.
    pub fn parse(&self, file: &str, text: &str) -> ParsedMarkup {
        let (yaml, body) = split_front_matter(text);
        let mut diagnostics = Vec::new();

        let front_matter = match yaml.map(FrontMatter::from_yaml).transpose() {
            Ok(parsed) => parsed.unwrap_or_default(),
            Err(e) => {
                warn!("Invalid front matter in {}: {}", file, e);
                diagnostics.push(Diagnostic {
                    severity: DiagnosticSeverity::Warn,
                    message: format!("front matter ignored: {e}"),
                    file: Some(file.to_string()),
                });
                FrontMatter::default()
            },
        };

        ParsedMarkup {
            front_matter,
            headings: extract_headings(body),
            diagnostics,
        }
    }
}

/// Collect heading text from `#`-prefixed lines, markup stripped.
///
/// ```rust
/// use docseek_core::parser::extract_headings;
///
/// let body = "# Intro\n\ntext\n## Setup <Badge>beta</Badge>\n####### too deep\n## {hidden}\n";
/// assert_eq!(extract_headings(body), vec!["Intro", "Setup beta"]);
/// ```
pub fn extract_headings(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| HEADING_RE.captures(line))
        .filter_map(|caps| caps.get(2))
        .map(|m| strip_markup(m.as_str()))
        .filter(|heading| !heading.is_empty())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ParsedMarkup {
    pub front_matter: FrontMatter,
    pub headings: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let doc = "---\ntitle: Routing\ndescription: How routes work\ntags: [nav]\n---\n\n# Overview\nSome text\n### Nested <code>Route</code>\n";
        let parsed = MarkupParser::new().parse("guide/routing.mdx", doc);

        assert_eq!(parsed.front_matter.title.as_deref(), Some("Routing"));
        assert_eq!(parsed.headings, vec!["Overview", "Nested Route"]);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_numeric_tags_keep_front_matter() {
        let doc = "---\ntitle: Release Notes\ncategory: 2024\ntags: [rust, 2024]\n---\n# Changes\n";
        let parsed = MarkupParser::new().parse("blog/release.mdx", doc);

        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.front_matter.title.as_deref(), Some("Release Notes"));
        assert_eq!(parsed.front_matter.category.to_vec(), vec!["2024"]);
        assert_eq!(parsed.front_matter.tags.to_vec(), vec!["rust", "2024"]);
    }

    #[test]
    fn test_malformed_front_matter_recovers() {
        let doc = "---\ntitle: [oops\n---\n# Still Indexed\n";
        let parsed = MarkupParser::new().parse("bad.mdx", doc);

        assert_eq!(parsed.front_matter, FrontMatter::default());
        assert_eq!(parsed.headings, vec!["Still Indexed"]);
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].file.as_deref(), Some("bad.mdx"));
        assert_eq!(parsed.diagnostics[0].severity, DiagnosticSeverity::Warn);
    }

    #[test]
    fn test_heading_requires_space_after_hashes() {
        assert!(extract_headings("#hashtag\n#\n").is_empty());
        assert_eq!(extract_headings("######\tSix"), vec!["Six"]);
    }

    #[test]
    fn test_front_matter_lines_are_not_headings() {
        let doc = "---\ntitle: x\n# yaml comment\n---\nbody only";
        let parsed = MarkupParser::new().parse("c.mdx", doc);
        assert!(parsed.headings.is_empty());
    }

    #[test]
    fn test_indented_hash_is_not_heading() {
        assert!(extract_headings("    # code sample").is_empty());
    }
}
