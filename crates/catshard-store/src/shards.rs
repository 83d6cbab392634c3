//! Shard files: one CSV per crawled listing page.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use catshard_core::{ProductRecord, Schema, SourceId};

use crate::error::StoreError;

/// File name of the merged dataset inside a source directory. Never listed as a shard.
pub const CONSOLIDATED_FILE_NAME: &str = "all.csv";

const SHARD_EXTENSION: &str = "csv";

/// A shard discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardEntry {
    /// 1-based listing page number parsed from the file stem.
    pub page: u32,
    pub path: PathBuf,
}

/// Filesystem-backed store addressed by `(source, page)`.
#[derive(Debug, Clone)]
pub struct ShardStore {
    root: PathBuf,
}

impl ShardStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn source_dir(&self, source: SourceId) -> PathBuf {
        self.root.join(source.as_str())
    }

    #[must_use]
    pub fn shard_path(&self, source: SourceId, page: u32) -> PathBuf {
        self.source_dir(source)
            .join(format!("{page}.{SHARD_EXTENSION}"))
    }

    #[must_use]
    pub fn consolidated_path(&self, source: SourceId) -> PathBuf {
        self.source_dir(source).join(CONSOLIDATED_FILE_NAME)
    }

    /// Writes one page's records, replacing any shard already stored for
    /// `(source, page)`. An empty slice still produces a header-only shard so
    /// page numbering stays dense.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SchemaMismatch`] if a record does not use the source's schema.
    /// - [`StoreError::Io`] / [`StoreError::Csv`] if the directory or file cannot be written.
    pub fn write(
        &self,
        source: SourceId,
        page: u32,
        records: &[ProductRecord],
    ) -> Result<PathBuf, StoreError> {
        let expected = source.schema();
        if let Some(bad) = records.iter().find(|r| r.schema() != expected) {
            return Err(StoreError::SchemaMismatch {
                source_id: source,
                expected,
                found: bad.schema(),
            });
        }

        let path = self.shard_path(source, page);
        write_records(&path, expected, records)?;
        tracing::info!(
            source = %source,
            page,
            records = records.len(),
            path = %path.display(),
            "wrote shard"
        );
        Ok(path)
    }

    /// Lists the shards stored for `source`, ordered by numeric page number.
    ///
    /// A missing source directory yields an empty list. The consolidated file
    /// and any file whose stem is not an integer are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory exists but cannot be read.
    pub fn list(&self, source: SourceId) -> Result<Vec<ShardEntry>, StoreError> {
        let dir = self.source_dir(source);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(dir, e)),
        };

        let mut shards = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(page) = shard_page(&path) {
                shards.push(ShardEntry { page, path });
            } else {
                tracing::debug!(path = %path.display(), "ignoring non-shard file");
            }
        }

        shards.sort_by_key(|s| s.page);
        Ok(shards)
    }

    /// Reads a shard back using `source`'s positional column layout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Csv`] if the file cannot be opened or parsed.
    pub fn read(&self, source: SourceId, path: &Path) -> Result<Vec<ProductRecord>, StoreError> {
        read_records(path, source.schema())
    }
}

/// Page number encoded in a shard file name, e.g. `10.csv` → `10`.
fn shard_page(path: &Path) -> Option<u32> {
    if path.file_name().and_then(|n| n.to_str()) == Some(CONSOLIDATED_FILE_NAME) {
        return None;
    }
    if path.extension().and_then(|e| e.to_str()) != Some(SHARD_EXTENSION) {
        return None;
    }
    path.file_stem()?.to_str()?.parse::<u32>().ok()
}

/// Writes a header row of display titles followed by one row per record.
pub(crate) fn write_records(
    path: &Path,
    schema: Schema,
    records: &[ProductRecord],
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(false)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;

    writer
        .write_record(schema.header())
        .map_err(|e| StoreError::csv(path, e))?;
    for record in records {
        writer
            .write_record(record.to_row())
            .map_err(|e| StoreError::csv(path, e))?;
    }
    writer.flush().map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

/// Parses records by column position. The header row is skipped without
/// inspection, so older shards with different display titles read the same.
pub(crate) fn read_records(path: &Path, schema: Schema) -> Result<Vec<ProductRecord>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;

    let width = schema.width();
    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(|e| StoreError::csv(path, e))?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if row.len() < width {
            tracing::warn!(
                path = %path.display(),
                row = idx + 1,
                columns = row.len(),
                expected = width,
                "short shard row; padding missing columns"
            );
        }
        let values: Vec<&str> = row.iter().collect();
        records.push(ProductRecord::from_row(schema, &values));
    }
    Ok(records)
}
