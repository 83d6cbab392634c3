//! `catshard crawl` handler.
//!
//! The crawl aborts on the first navigation or storage failure; shards written
//! before the failure stay on disk, so a rerun can resume with `--url` and
//! `--page`. Items whose structured data cannot be read are skipped and
//! listed at the end.

use anyhow::Context as _;
use catshard_core::{AppConfig, SourceId};
use catshard_scraper::pagination::start_page_from_url;
use catshard_scraper::{HttpRenderer, PaginationCrawler, Site};
use catshard_store::ShardStore;

/// Start URL and first page number for a crawl.
///
/// The URL defaults to the source's catalog root. The page defaults to the
/// URL's `page=` query value when present, else 1.
pub(crate) fn resolve_start(
    source: SourceId,
    url: Option<&str>,
    page: Option<u32>,
) -> (String, u32) {
    let url = url.unwrap_or(source.default_start_url()).to_owned();
    let page = page
        .or_else(|| start_page_from_url(&url))
        .unwrap_or(1);
    (url, page)
}

/// Crawls `source` and prints a summary of what was written.
///
/// # Errors
///
/// Returns an error if the renderer cannot be built, a page fails to load,
/// or a shard cannot be written.
pub(crate) async fn run_crawl(
    config: &AppConfig,
    source: SourceId,
    url: Option<&str>,
    page: Option<u32>,
) -> anyhow::Result<()> {
    let (start_url, start_page) = resolve_start(source, url, page);
    let site = Site::for_source(source)?;
    let store = ShardStore::new(&config.output_dir);
    let session = HttpRenderer::new(config.navigation_timeout_secs, &config.user_agent)
        .context("failed to build renderer")?;

    tracing::info!(
        source = %source,
        url = %start_url,
        page = start_page,
        output = %store.source_dir(source).display(),
        "starting crawl"
    );

    let report = PaginationCrawler::new(&site, &store)
        .with_inter_request_delay(config.inter_request_delay_ms)
        .crawl(session, &start_url, start_page)
        .await
        .with_context(|| format!("crawl of {source} failed"))?;

    println!(
        "{source}: {} page(s), {} record(s) written to {}",
        report.pages.len(),
        report.records,
        store.source_dir(source).display()
    );
    if !report.failures.is_empty() {
        println!("{} item(s) skipped:", report.failures.len());
        for failure in &report.failures {
            println!(
                "  page {} item {}: {} ({})",
                failure.page, failure.index, failure.url, failure.reason
            );
        }
    }

    Ok(())
}
