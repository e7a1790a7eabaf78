use crate::fetcher::calculate_sha256;
use crate::{DocRecord, Error, PostEntry, Result, SearchIndex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const INDEX_FILE: &str = "index.json";
const RECORDS_FILE: &str = "records.json";

/// Writes and reads the build artifacts of one output directory.
///
/// Every artifact is written to a temporary sibling first and renamed into
/// place, so readers never observe a half-written file.
pub struct Storage {
    output_dir: PathBuf,
}

impl Storage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(INDEX_FILE)
    }

    pub fn records_path(&self) -> PathBuf {
        self.output_dir.join(RECORDS_FILE)
    }

    fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            Error::Storage(format!(
                "Failed to create output directory {}: {e}",
                self.output_dir.display()
            ))
        })
    }

    /// Serialize and commit the index. Returns the base64 SHA-256 of the
    /// written JSON.
    pub fn save_index(&self, index: &SearchIndex) -> Result<String> {
        self.ensure_output_dir()?;
        let json = index.to_json()?;
        write_atomic(&self.index_path(), &json)?;
        debug!("Saved index with {} documents", index.len());
        Ok(calculate_sha256(&json))
    }

    /// Commit the flat record list.
    pub fn save_records(&self, records: &[DocRecord]) -> Result<()> {
        self.ensure_output_dir()?;
        let json = serde_json::to_string(records)
            .map_err(|e| Error::Storage(format!("Failed to serialize records: {e}")))?;
        write_atomic(&self.records_path(), &json)?;
        debug!("Saved {} records", records.len());
        Ok(())
    }

    /// Read back a committed record list.
    pub fn load_records(&self) -> Result<Vec<DocRecord>> {
        let path = self.records_path();
        let json = fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Storage(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Commit a post catalog, pretty-printed, to `path`.
    pub fn save_catalog(path: &Path, entries: &[PostEntry]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Storage(format!("Failed to serialize catalog: {e}")))?;
        write_atomic(path, &json)?;
        debug!("Saved catalog with {} entries", entries.len());
        Ok(())
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let name = path
        .file_name()
        .map_or_else(|| "artifact".to_string(), |n| n.to_string_lossy().into_owned());
    let tmp_path = path.with_file_name(format!("{name}.tmp"));

    fs::write(&tmp_path, content)
        .map_err(|e| Error::Storage(format!("Failed to write {name}: {e}")))?;

    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)
            .map_err(|e| Error::Storage(format!("Failed to remove existing {name}: {e}")))?;
    }

    fs::rename(&tmp_path, path)
        .map_err(|e| Error::Storage(format!("Failed to commit {name}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::IndexSchema;
    use tempfile::TempDir;

    fn record(id: &str) -> DocRecord {
        DocRecord {
            id: id.to_string(),
            section: "Home / Index".to_string(),
            title: "Welcome".to_string(),
            description: String::new(),
            headings: vec!["Overview".to_string()],
            tags: vec!["blog".to_string()],
            slug: id.to_string(),
        }
    }

    #[test]
    fn test_paths_live_under_output_dir() {
        let storage = Storage::new("public/search");
        assert_eq!(storage.index_path(), Path::new("public/search/index.json"));
        assert_eq!(storage.records_path(), Path::new("public/search/records.json"));
    }

    #[test]
    fn test_save_index_creates_dir_and_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path().join("nested/out"));

        let mut index = SearchIndex::default();
        index.add(&record("/docs/index"));
        let checksum = storage.save_index(&index).unwrap();

        let written = fs::read_to_string(storage.index_path()).unwrap();
        assert_eq!(checksum, calculate_sha256(&written));
        assert!(SearchIndex::from_json(&written, &IndexSchema::default()).is_ok());
        assert!(!storage.output_dir().join("index.json.tmp").exists());
    }

    #[test]
    fn test_records_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path());
        let records = vec![record("/docs/a"), record("/docs/b")];

        storage.save_records(&records).unwrap();
        assert_eq!(storage.load_records().unwrap(), records);
    }

    #[test]
    fn test_records_are_compact_json() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path());
        storage.save_records(&[record("/docs/a")]).unwrap();

        let text = fs::read_to_string(storage.records_path()).unwrap();
        assert!(text.starts_with("[{\"id\":\"/docs/a\""));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_save_overwrites_previous_artifact() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::new(tmp.path());

        storage.save_records(&[record("/docs/a")]).unwrap();
        storage.save_records(&[]).unwrap();
        assert!(storage.load_records().unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_records_is_storage_error() {
        let tmp = TempDir::new().unwrap();
        let err = Storage::new(tmp.path()).load_records().unwrap_err();
        assert_eq!(err.category(), "storage");
    }

    #[test]
    fn test_catalog_is_pretty_printed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data/blogs.json");
        let entries = vec![PostEntry {
            title: "Post".to_string(),
            summary: "About".to_string(),
            date: "2024-05-01".to_string(),
            category: "General".to_string(),
            link: "/docs/blog/post".to_string(),
        }];

        Storage::save_catalog(&path, &entries).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  {"));
        assert!(written.contains("\"abstract\": \"About\""));
    }
}
