//! Folds every shard of a source into the consolidated dataset.

use std::path::PathBuf;

use catshard_core::SourceId;

use crate::error::StoreError;
use crate::shards::{read_records, write_records, ShardStore};

/// Outcome of a [`merge`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub source: SourceId,
    /// Page numbers merged, in output order.
    pub pages: Vec<u32>,
    pub records: usize,
    pub output: PathBuf,
}

/// Concatenates all shards for `source` in ascending page order and writes
/// the result to the source's consolidated file, replacing any previous one.
///
/// No shards is not an error: a header-only file is written and a warning
/// is logged, since it usually means the crawl never ran.
///
/// # Errors
///
/// Returns [`StoreError`] if a shard cannot be read or the output cannot be written.
pub fn merge(store: &ShardStore, source: SourceId) -> Result<MergeReport, StoreError> {
    let shards = store.list(source)?;
    let schema = source.schema();

    if shards.is_empty() {
        tracing::warn!(
            source = %source,
            dir = %store.source_dir(source).display(),
            "no shards found; writing empty consolidated dataset"
        );
    } else {
        let pages: Vec<String> = shards.iter().map(|s| s.page.to_string()).collect();
        tracing::info!(
            source = %source,
            shards = shards.len(),
            pages = %pages.join(", "),
            "merging shards"
        );
    }

    let mut all = Vec::new();
    for shard in &shards {
        let records = read_records(&shard.path, schema)?;
        tracing::debug!(page = shard.page, records = records.len(), "read shard");
        all.extend(records);
    }

    let output = store.consolidated_path(source);
    write_records(&output, schema, &all)?;
    tracing::info!(
        source = %source,
        records = all.len(),
        path = %output.display(),
        "wrote consolidated dataset"
    );

    Ok(MergeReport {
        source,
        pages: shards.into_iter().map(|s| s.page).collect(),
        records: all.len(),
        output,
    })
}
