//! Metadata table persistence.
//!
//! The table is a flat CSV file with a fixed header (see [`COLUMNS`]) and one
//! row per known item. It is loaded once at the start of a run and rewritten
//! in full at the end; rows are never appended in place.
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::store::{MetadataStore, merge_records};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MetadataStore::new("book_metadata.csv");
//! let existing = store.load().await?;
//! let merged = merge_records(existing, Vec::new());
//! store.save(&merged).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod record;

pub use error::StoreError;
pub use record::{BookRecord, COLUMNS};

use std::collections::HashSet;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

/// Default metadata table location.
pub const DEFAULT_METADATA_PATH: &str = "book_metadata.csv";

/// CSV-backed metadata table.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    /// Creates a store over `path`. Nothing is read until [`load`](Self::load).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the table path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every row. A missing file is an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, and
    /// [`StoreError::Csv`] if any row is malformed. Malformed rows are not
    /// skipped: the next save would otherwise drop them.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Vec<BookRecord>, StoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no metadata table yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let mut reader = csv::ReaderBuilder::new().from_reader(content.as_slice());
        let rows = reader
            .deserialize::<BookRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::csv(&self.path, e))?;

        debug!(rows = rows.len(), "metadata loaded");
        Ok(rows)
    }

    /// Rewrites the whole table: header plus `rows`, in order.
    ///
    /// Rows are encoded in memory, written to a sibling temporary file, and
    /// that file then replaces the table, so an interrupted save leaves the
    /// previous table intact. The temporary file is removed if the write or
    /// the rename fails.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding, the directory, the temporary file
    /// or the rename fails.
    #[instrument(skip(self, rows), fields(path = %self.path.display(), rows = rows.len()))]
    pub async fn save(&self, rows: &[BookRecord]) -> Result<(), StoreError> {
        let encoded = self.encode(rows)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp_path = self.temp_path();
        if let Err(error) = self.replace_with(&tmp_path, &encoded).await {
            match tokio::fs::remove_file(&tmp_path).await {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    warn!(path = %tmp_path.display(), error = %cleanup, "could not remove temporary file");
                }
                _ => {}
            }
            return Err(error);
        }

        info!("metadata saved");
        Ok(())
    }

    fn encode(&self, rows: &[BookRecord]) -> Result<Vec<u8>, StoreError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer
            .write_record(COLUMNS)
            .map_err(|e| StoreError::csv(&self.path, e))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| StoreError::csv(&self.path, e))?;
        }
        writer
            .into_inner()
            .map_err(|e| StoreError::io(&self.path, e.into_error()))
    }

    async fn replace_with(&self, tmp_path: &Path, encoded: &[u8]) -> Result<(), StoreError> {
        tokio::fs::write(tmp_path, encoded)
            .await
            .map_err(|e| StoreError::io(tmp_path, e))?;
        tokio::fs::rename(tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("metadata"), OsString::from);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Concatenates `existing` then `new` and drops every row whose `ebook_id`
/// was already seen. The first occurrence wins; relative order is kept.
///
/// ```
/// use harvester_core::store::{BookRecord, merge_records};
///
/// let row = |id: &str| BookRecord {
///     title: format!("Book {id}"),
///     author: "Unknown".into(),
///     year: "Unknown".into(),
///     filename: None,
///     gutenberg_url: format!("https://www.gutenberg.org/ebooks/{id}"),
///     text_url: None,
///     ebook_id: id.into(),
/// };
/// let merged = merge_records(vec![row("1"), row("2")], vec![row("2"), row("3")]);
/// let ids: Vec<_> = merged.iter().map(|r| r.ebook_id.as_str()).collect();
/// assert_eq!(ids, ["1", "2", "3"]);
/// ```
#[must_use]
pub fn merge_records(existing: Vec<BookRecord>, new: Vec<BookRecord>) -> Vec<BookRecord> {
    let mut seen = HashSet::new();
    existing
        .into_iter()
        .chain(new)
        .filter(|record| seen.insert(record.ebook_id.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn record(id: &str, title: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            author: "Unknown".to_string(),
            year: "Unknown".to_string(),
            filename: None,
            gutenberg_url: format!("https://www.gutenberg.org/ebooks/{id}"),
            text_url: None,
            ebook_id: id.to_string(),
        }
    }

    fn ids(rows: &[BookRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.ebook_id.as_str()).collect()
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_merge_keeps_existing_on_conflict() {
        let existing = vec![record("1", "One"), record("2", "Two (existing)")];
        let new = vec![record("2", "Two (new)"), record("3", "Three")];

        let merged = merge_records(existing, new);
        assert_eq!(ids(&merged), vec!["1", "2", "3"]);
        assert_eq!(merged[1].title, "Two (existing)");
    }

    #[test]
    fn test_merge_dedupes_within_existing() {
        let existing = vec![record("1", "first"), record("1", "second"), record("2", "b")];
        let merged = merge_records(existing, Vec::new());
        assert_eq!(ids(&merged), vec!["1", "2"]);
        assert_eq!(merged[0].title, "first");
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge_records(Vec::new(), Vec::new()).is_empty());
    }

    // ==================== Load/Save Tests ====================

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("absent.csv"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("meta.csv"));
        let mut row = record("84", "Frankenstein");
        row.filename = Some("books/Frankenstein_84.txt".to_string());
        row.text_url = Some("https://www.gutenberg.org/files/84/84-0.txt".to_string());

        store.save(&[row]).await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("title,author,year,filename,gutenberg_url,text_url,ebook_id")
        );
        assert_eq!(
            lines.next(),
            Some(
                "Frankenstein,Unknown,Unknown,books/Frankenstein_84.txt,https://www.gutenberg.org/ebooks/84,https://www.gutenberg.org/files/84/84-0.txt,84"
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_rows_and_absent_fields() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("meta.csv"));
        let rows = vec![
            record("1", "Comma, In Title"),
            record("2", "Quote \"Here\""),
        ];

        store.save(&rows).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, rows);
        assert!(loaded[0].filename.is_none());
        assert!(loaded[0].text_url.is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta.csv");
        std::fs::write(&path, "garbage that is not a table\n").unwrap();
        let store = MetadataStore::new(&path);

        store.save(&[record("7", "Seven")]).await.unwrap();
        assert_eq!(ids(&store.load().await.unwrap()), vec!["7"]);
        assert!(!dir.path().join("meta.csv.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("nested/deeper/meta.csv"));
        store.save(&[]).await.unwrap();
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content.trim_end(),
            "title,author,year,filename,gutenberg_url,text_url,ebook_id"
        );
    }

    #[tokio::test]
    async fn test_load_tolerates_reordered_and_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta.csv");
        std::fs::write(
            &path,
            "ebook_id,title,author,year,gutenberg_url,notes\n\
             11,Alice,\"Carroll, Lewis\",1865,https://www.gutenberg.org/ebooks/11,fav\n",
        )
        .unwrap();

        let rows = MetadataStore::new(&path).load().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ebook_id, "11");
        assert_eq!(rows[0].author, "Carroll, Lewis");
        assert!(rows[0].filename.is_none());
        assert!(rows[0].text_url.is_none());
    }

    #[tokio::test]
    async fn test_load_malformed_row_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta.csv");
        std::fs::write(
            &path,
            "title,author,year,filename,gutenberg_url,text_url,ebook_id\nonly,three,fields\n",
        )
        .unwrap();

        let result = MetadataStore::new(&path).load().await;
        assert!(matches!(result, Err(StoreError::Csv { .. })));
    }

    #[tokio::test]
    async fn test_save_failure_removes_temporary_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta.csv");
        // A non-empty directory at the table path makes the rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), "x").unwrap();
        let store = MetadataStore::new(&path);

        let result = store.save(&[record("1", "One")]).await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(!dir.path().join("meta.csv.tmp").exists());
        assert!(path.join("keep.txt").exists());
    }
}
