//! Turns a content tree plus supplementary datasets into the search artifacts.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::BuildConfig;
use crate::parser::MarkupParser;
use crate::text::humanize;
use crate::{
    BLOG_TAG, Diagnostic, DiagnosticSeverity, DocRecord, Error, IndexSchema, PostEntry, Result,
    SearchIndex, Storage,
};

/// Summary of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub markup_records: usize,
    pub curated_records: usize,
    pub external_records: usize,
    /// Markup files excluded by the disabled prefix, relative to the content root.
    pub skipped_files: Vec<String>,
    /// Pages that need a curated record, relative to the content root.
    pub interactive_files: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    /// Records that replaced an earlier record with the same id.
    pub duplicate_ids: usize,
    pub index_path: PathBuf,
    pub records_path: PathBuf,
    /// Base64 SHA-256 of the written index.
    pub index_sha256: String,
}

impl BuildReport {
    pub const fn total_records(&self) -> usize {
        self.markup_records + self.curated_records + self.external_records
    }
}

/// Records gathered from every source, in merge order.
#[derive(Debug, Clone, Default)]
pub struct CollectedRecords {
    pub records: Vec<DocRecord>,
    pub markup_records: usize,
    pub curated_records: usize,
    pub external_records: usize,
    pub skipped_files: Vec<String>,
    pub interactive_files: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct IndexBuilder {
    config: BuildConfig,
    parser: MarkupParser,
}

impl IndexBuilder {
    pub const fn new(config: BuildConfig) -> Self {
        Self {
            config,
            parser: MarkupParser::new(),
        }
    }

    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Gather markup, curated and external records without writing anything.
    pub fn collect_records(&self) -> Result<CollectedRecords> {
        let mut collected = CollectedRecords::default();

        let mut files = Vec::new();
        walk_files(&self.config.content_root, &mut files)?;
        files.sort();

        for path in &files {
            let relative = self.relative_path(path);
            if has_extension(path, &self.config.interactive_extensions) {
                collected.interactive_files.push(relative);
                continue;
            }
            if !has_extension(path, &self.config.markup_extensions) {
                continue;
            }

            let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            if !self.config.disabled_prefix.is_empty()
                && file_name.starts_with(&self.config.disabled_prefix)
            {
                debug!("Skipping disabled file {}", relative);
                collected.skipped_files.push(relative);
                continue;
            }

            debug!("Processing {}", relative);
            let text = fs::read_to_string(path)?;
            let (record, diagnostics) = self.markup_record(&relative, &text);
            collected.records.push(record);
            collected.diagnostics.extend(diagnostics);
            collected.markup_records += 1;
        }

        if let Some(path) = &self.config.curated_records {
            let (records, diagnostics) = load_json_array::<DocRecord>(path, "curated record")?;
            collected.curated_records = records.len();
            collected.records.extend(records.into_iter().map(|(_, record)| record));
            collected.diagnostics.extend(diagnostics);
        }

        if let Some(path) = &self.config.external_posts {
            let (posts, diagnostics) = load_json_array::<PostEntry>(path, "external post")?;
            collected.external_records = posts.len();
            collected
                .records
                .extend(posts.iter().map(|(position, post)| external_record(post, *position)));
            collected.diagnostics.extend(diagnostics);
        }

        if !collected.interactive_files.is_empty() {
            warn!(
                "Found {} interactive pages that cannot be indexed automatically; add records for them to the curated record file: {}",
                collected.interactive_files.len(),
                collected.interactive_files.join(", ")
            );
        }

        Ok(collected)
    }

    /// Build the record for one markup file. `relative` uses `/` separators.
    pub fn markup_record(&self, relative: &str, text: &str) -> (DocRecord, Vec<Diagnostic>) {
        let parsed = self.parser.parse(relative, text);
        let stem = strip_extension(relative);
        let slug = format!("{}{}", self.config.route_prefix, stem);

        let base = if stem == "index" {
            self.config.root_section.as_str()
        } else {
            stem.split('/').next().unwrap_or(stem)
        };
        let leaf = slug.rsplit('/').next().unwrap_or(&slug);
        let section = humanize(&format!("{base} / {leaf}"));

        let front_matter = parsed.front_matter;
        let mut tags = vec![BLOG_TAG.to_string()];
        for tag in front_matter
            .category
            .to_vec()
            .into_iter()
            .chain(front_matter.tags.to_vec())
        {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let record = DocRecord {
            id: slug.clone(),
            section,
            title: front_matter.title.unwrap_or_default(),
            description: front_matter.description.unwrap_or_default(),
            headings: parsed.headings,
            tags,
            slug,
        };
        (record, parsed.diagnostics)
    }

    /// Collect, index and persist everything.
    pub fn build(&self) -> Result<BuildReport> {
        let started = Instant::now();
        let collected = self.collect_records()?;

        let mut index = SearchIndex::new(IndexSchema::default());
        let duplicate_ids = index.add_all(&collected.records);

        let storage = Storage::new(&self.config.output_dir);
        let index_sha256 = storage.save_index(&index)?;
        storage.save_records(&collected.records)?;

        let report = BuildReport {
            markup_records: collected.markup_records,
            curated_records: collected.curated_records,
            external_records: collected.external_records,
            skipped_files: collected.skipped_files,
            interactive_files: collected.interactive_files,
            diagnostics: collected.diagnostics,
            duplicate_ids,
            index_path: storage.index_path(),
            records_path: storage.records_path(),
            index_sha256,
        };

        info!(
            "Indexed {} records ({} markup, {} curated, {} external) into {} in {:.2}s",
            index.len(),
            report.markup_records,
            report.curated_records,
            report.external_records,
            storage.output_dir().display(),
            started.elapsed().as_secs_f64()
        );

        Ok(report)
    }

    fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.config.content_root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Record for the external post at `position` in its dataset.
pub fn external_record(post: &PostEntry, position: usize) -> DocRecord {
    let mut tags = Vec::with_capacity(2);
    if !post.category.is_empty() && post.category != BLOG_TAG {
        tags.push(post.category.clone());
    }
    tags.push(BLOG_TAG.to_string());

    DocRecord {
        id: format!("{}{}", post.title, position),
        section: format!("Blog / {}", post.title),
        title: post.title.clone(),
        description: post.summary.clone(),
        headings: Vec::new(),
        tags,
        slug: post.link.clone(),
    }
}

fn walk_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk_files(&entry.path(), files)?;
        } else if file_type.is_file() {
            files.push(entry.path());
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

fn strip_extension(relative: &str) -> &str {
    let name_start = relative.rfind('/').map_or(0, |i| i + 1);
    match relative[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &relative[..name_start + dot],
        _ => relative,
    }
}

/// Parse a JSON array, keeping each element that has the expected shape
/// along with its position. Malformed elements become diagnostics.
fn load_json_array<T: DeserializeOwned>(
    path: &Path,
    label: &str,
) -> Result<(Vec<(usize, T)>, Vec<Diagnostic>)> {
    let text = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| Error::Parse(format!("{}: invalid JSON: {e}", path.display())))?;
    let serde_json::Value::Array(elements) = value else {
        return Err(Error::Parse(format!(
            "{}: expected a JSON array of {label}s",
            path.display()
        )));
    };

    let file = path.display().to_string();
    let mut items = Vec::with_capacity(elements.len());
    let mut diagnostics = Vec::new();
    for (position, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<T>(element) {
            Ok(item) => items.push((position, item)),
            Err(e) => {
                warn!("Skipping malformed {} #{} in {}: {}", label, position, file, e);
                diagnostics.push(Diagnostic {
                    severity: DiagnosticSeverity::Warn,
                    message: format!("{label} #{position} skipped: {e}"),
                    file: Some(file.clone()),
                });
            },
        }
    }

    debug!("Loaded {} {}s from {}", items.len(), label, file);
    Ok((items, diagnostics))
}
