//! `catshard merge` handler.

use anyhow::Context as _;
use catshard_core::{AppConfig, SourceId};
use catshard_store::ShardStore;

use crate::prompt::select_source;

/// Merges `source`'s shards, prompting on stdin when no source was given.
/// A cancelled prompt prints a notice and touches nothing.
///
/// # Errors
///
/// Returns an error if the prompt fails or a shard cannot be read or written.
pub(crate) fn run_merge(config: &AppConfig, source: Option<SourceId>) -> anyhow::Result<()> {
    let source = match source {
        Some(source) => source,
        None => {
            let stdin = std::io::stdin();
            match select_source(stdin.lock(), std::io::stdout())
                .context("failed to read source selection")?
            {
                Some(source) => source,
                None => {
                    println!("merge cancelled");
                    return Ok(());
                }
            }
        }
    };

    let store = ShardStore::new(&config.output_dir);
    let report = catshard_store::merge(&store, source)
        .with_context(|| format!("failed to merge {source} shards"))?;

    println!(
        "{source}: merged {} shard(s), {} record(s) into {}",
        report.pages.len(),
        report.records,
        report.output.display()
    );
    Ok(())
}
