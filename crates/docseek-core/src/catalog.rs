//! Post catalog generation from a directory of blog posts.

use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Reverse;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::frontmatter::{FrontMatter, split_front_matter};
use crate::text::humanize;
use crate::{PostEntry, Result};

const POST_EXTENSION: &str = "mdx";
const DEFAULT_CATEGORY: &str = "General";

/// Build catalog entries for the posts directly inside `blog_dir`, newest
/// first. Undated posts are stamped with today's UTC date.
pub fn generate_post_catalog(blog_dir: &Path, route_prefix: &str) -> Result<Vec<PostEntry>> {
    generate_post_catalog_on(blog_dir, route_prefix, Utc::now().date_naive())
}

/// [`generate_post_catalog`] with an explicit date for undated posts.
pub fn generate_post_catalog_on(
    blog_dir: &Path,
    route_prefix: &str,
    today: NaiveDate,
) -> Result<Vec<PostEntry>> {
    let mut names: Vec<String> = fs::read_dir(blog_dir)?
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| {
            Path::new(name)
                .extension()
                .is_some_and(|ext| ext == POST_EXTENSION)
        })
        .collect();
    names.sort();
    debug!("Found {} post files in {}", names.len(), blog_dir.display());

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        if name == "index.mdx" || name.starts_with('_') || name.starts_with('-') {
            debug!("Skipping {} (excluded name)", name);
            continue;
        }

        let text = match fs::read_to_string(blog_dir.join(&name)) {
            Ok(text) => text,
            Err(e) => {
                warn!("Error processing {}: {}", name, e);
                continue;
            },
        };

        let Some(entry) = post_entry(&name, &text, route_prefix, today) else {
            continue;
        };
        debug!("Processed {} ({})", entry.title, entry.date);
        entries.push(entry);
    }

    sort_newest_first(&mut entries);
    Ok(entries)
}

/// Catalog entry for one post; `None` when its front matter does not parse.
fn post_entry(
    file_name: &str,
    text: &str,
    route_prefix: &str,
    today: NaiveDate,
) -> Option<PostEntry> {
    let stem = file_name
        .strip_suffix(&format!(".{POST_EXTENSION}"))
        .unwrap_or(file_name);

    let front_matter = match split_front_matter(text).0.map(FrontMatter::from_yaml) {
        Some(Ok(front_matter)) => front_matter,
        Some(Err(e)) => {
            warn!("Error processing {}: {}", file_name, e);
            return None;
        },
        None => FrontMatter::default(),
    };

    let category = front_matter
        .category
        .first()
        .filter(|c| !c.is_empty())
        .or_else(|| front_matter.tags.first().filter(|t| !t.is_empty()))
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();

    Some(PostEntry {
        title: non_empty(front_matter.title).unwrap_or_else(|| humanize(stem)),
        summary: non_empty(front_matter.description)
            .or_else(|| non_empty(front_matter.excerpt))
            .unwrap_or_default(),
        date: non_empty(front_matter.date)
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
        category,
        link: format!("{route_prefix}blog/{stem}"),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a catalog date: `YYYY-MM-DD`, or an RFC 3339 timestamp.
pub fn parse_post_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()))
}

/// Newest first; entries with unparseable dates go last in their original order.
pub fn sort_newest_first(entries: &mut [PostEntry]) {
    entries.sort_by_key(|entry| {
        let date = parse_post_date(&entry.date);
        (date.is_none(), Reverse(date))
    });
}

/// Entry count per category, in order of first appearance.
pub fn category_counts(entries: &[PostEntry]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entry in entries {
        match counts.iter_mut().find(|(category, _)| *category == entry.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.category.clone(), 1)),
        }
    }
    counts
}
