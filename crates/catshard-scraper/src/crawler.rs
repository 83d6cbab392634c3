//! The listing → detail → shard loop.

use std::time::Duration;

use catshard_core::ProductRecord;
use catshard_store::ShardStore;

use crate::client::RenderSession;
use crate::document::Document;
use crate::error::ScraperError;
use crate::pagination::{find_next_page, item_count};
use crate::sites::Site;

/// Maximum number of listing pages one crawl will visit. Prevents infinite
/// loops when a next-page link cycles back to an earlier page.
pub const MAX_PAGES: u32 = 1000;

/// A detail page whose record could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub page: u32,
    /// 1-based position of the item on its listing page.
    pub index: usize,
    pub url: String,
    pub reason: String,
}

/// Outcome of a completed crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Listing pages visited, in order; one shard was written for each.
    pub pages: Vec<u32>,
    pub records: usize,
    pub failures: Vec<ItemFailure>,
}

/// Walks one source's paginated listing and writes a shard per page.
pub struct PaginationCrawler<'a> {
    site: &'a Site,
    store: &'a ShardStore,
    inter_request_delay: Duration,
    max_pages: u32,
}

impl<'a> PaginationCrawler<'a> {
    #[must_use]
    pub fn new(site: &'a Site, store: &'a ShardStore) -> Self {
        Self {
            site,
            store,
            inter_request_delay: Duration::ZERO,
            max_pages: MAX_PAGES,
        }
    }

    /// Pause applied before every navigation except the first.
    #[must_use]
    pub fn with_inter_request_delay(mut self, delay_ms: u64) -> Self {
        self.inter_request_delay = Duration::from_millis(delay_ms);
        self
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Crawls from `start_url`, numbering the first listing page `start_page`.
    ///
    /// The session is closed before this returns, whether the crawl succeeds
    /// or not. Shards written before a failure stay on disk.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Navigation`] if a listing or detail page fails to load.
    /// - [`ScraperError::Store`] if a shard cannot be written.
    /// - [`ScraperError::PaginationLimit`] if more than the page cap would be visited.
    pub async fn crawl<R: RenderSession>(
        &self,
        mut session: R,
        start_url: &str,
        start_page: u32,
    ) -> Result<CrawlReport, ScraperError> {
        let result = self.run(&mut session, start_url, start_page).await;
        session.close().await;
        result
    }

    async fn run<R: RenderSession>(
        &self,
        session: &mut R,
        start_url: &str,
        start_page: u32,
    ) -> Result<CrawlReport, ScraperError> {
        let source = self.site.source;
        let listing_rules = &self.site.listing;
        let mut pacer = Pacer::new(self.inter_request_delay);
        let mut report = CrawlReport::default();
        let mut next: Option<(String, u32)> = Some((start_url.to_owned(), start_page));

        while let Some((url, page)) = next.take() {
            if report.pages.len() >= self.max_pages as usize {
                return Err(ScraperError::PaginationLimit {
                    start_url: start_url.to_owned(),
                    max_pages: self.max_pages,
                });
            }

            tracing::info!(source = %source, page, url = %url, "listing page started");
            let listing = pacer.navigate(session, &url, page).await?;

            let total = item_count(&listing, &listing_rules.count);
            let expected_pages = total.div_ceil(u64::from(listing_rules.page_size.max(1)));
            tracing::info!(total, expected_pages, "catalog size");

            let next_url = find_next_page(&listing, &listing_rules.next);
            let links = listing.links(&listing_rules.item_links);
            drop(listing);

            let mut records: Vec<ProductRecord> = Vec::with_capacity(links.len());
            for (i, link) in links.iter().enumerate() {
                let index = i + 1;
                let detail = pacer.navigate(session, link, page).await?;
                match self.site.extractor.extract(&detail) {
                    Ok(record) => {
                        tracing::info!(page, index, "item extracted");
                        records.push(record);
                    }
                    Err(e) => {
                        tracing::warn!(page, index, url = %e.url, error = %e.reason, "item skipped");
                        report.failures.push(ItemFailure {
                            page,
                            index,
                            url: e.url,
                            reason: e.reason,
                        });
                    }
                }
            }

            self.store.write(source, page, &records)?;
            report.pages.push(page);
            report.records += records.len();

            if expected_pages > 0 {
                #[allow(clippy::cast_precision_loss)]
                let percent = f64::from(page) / expected_pages as f64 * 100.0;
                tracing::info!(page, percent = %format_args!("{percent:.1}"), "listing page done");
            } else {
                tracing::info!(page, "listing page done");
            }

            next = match (next_url, page.checked_add(1)) {
                (Some(url), Some(next_page)) => Some((url, next_page)),
                (Some(url), None) => {
                    tracing::warn!(page, url = %url, "page number exhausted; stopping");
                    None
                }
                (None, _) => None,
            };
        }

        tracing::info!(
            source = %source,
            pages = report.pages.len(),
            records = report.records,
            failures = report.failures.len(),
            "crawl complete"
        );
        Ok(report)
    }
}

/// Applies the inter-request delay and tags load failures with their page.
struct Pacer {
    delay: Duration,
    first: bool,
}

impl Pacer {
    fn new(delay: Duration) -> Self {
        Self { delay, first: true }
    }

    async fn navigate<R: RenderSession>(
        &mut self,
        session: &mut R,
        url: &str,
        page: u32,
    ) -> Result<Document, ScraperError> {
        if !self.first && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.first = false;

        session
            .navigate(url)
            .await
            .map_err(|source| ScraperError::Navigation {
                url: url.to_owned(),
                page,
                source: Box::new(source),
            })
    }
}
