//! Text normalization shared by indexing, querying and record building.

use html_escape::decode_html_entities;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

#[allow(clippy::expect_used)]
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));
#[allow(clippy::expect_used)]
static EXPRESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("expression pattern is valid"));

/// Remove inline markup from a heading.
///
/// - Tag-like substrings (`<Badge>`, `</a>`) are dropped
/// - Templating expressions (`{props.version}`) are dropped
/// - HTML entities are decoded
///
/// ```rust
/// use docseek_core::text::strip_markup;
///
/// assert_eq!(strip_markup("Install <Badge>new</Badge> {version}"), "Install new");
/// assert_eq!(strip_markup("Q &amp; A"), "Q & A");
/// ```
pub fn strip_markup(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, "");
    let without_expressions = EXPRESSION_RE.replace_all(&without_tags, "");
    decode_html_entities(&without_expressions).trim().to_string()
}

/// Turn a path-ish label into display text: `-` and `_` become spaces and
/// every word starts with an uppercase letter.
///
/// ```rust
/// use docseek_core::text::humanize;
///
/// assert_eq!(humanize("getting-started / my_first_post"), "Getting Started / My First Post");
/// ```
pub fn humanize(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut prev_alnum = false;

    for ch in label.chars() {
        let ch = if matches!(ch, '-' | '_') { ' ' } else { ch };
        if ch.is_alphanumeric() {
            if prev_alnum {
                out.push(ch);
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alnum = true;
        } else {
            out.push(ch);
            prev_alnum = false;
        }
    }

    out
}

/// Normalize text for indexing and matching.
///
/// Lowercases, strips diacritics, turns punctuation into separators and
/// collapses whitespace.
pub fn normalize_for_search(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut prev_was_space = true;

    for ch in text.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }

        for lower in ch.to_lowercase() {
            if lower.is_ascii_alphanumeric() || (!lower.is_ascii() && lower.is_alphanumeric()) {
                normalized.push(lower);
                prev_was_space = false;
            } else {
                push_space(&mut normalized, &mut prev_was_space);
            }
        }
    }

    normalized.trim_end().to_string()
}

/// Split text into normalized search terms.
///
/// ```rust
/// use docseek_core::text::tokenize;
///
/// assert_eq!(tokenize("Quantum-Routing, café!"), vec!["quantum", "routing", "cafe"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    normalize_for_search(text)
        .split_whitespace()
        .map(std::string::ToString::to_string)
        .collect()
}

fn push_space(normalized: &mut String, prev_was_space: &mut bool) {
    if !*prev_was_space && !normalized.is_empty() {
        normalized.push(' ');
        *prev_was_space = true;
    }
}
