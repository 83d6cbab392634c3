use catshard_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("navigation to {url} timed out after {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("render session is already closed")]
    SessionClosed,

    #[error("failed to load {url} (page {page}): {source}")]
    Navigation {
        url: String,
        page: u32,
        #[source]
        source: Box<ScraperError>,
    },

    #[error("invalid site rule \"{rule}\": {reason}")]
    InvalidSiteRule { rule: String, reason: String },

    #[error("pagination limit reached from {start_url}: exceeded {max_pages} pages")]
    PaginationLimit { start_url: String, max_pages: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A detail page whose structured data could not be used. Scoped to one item;
/// the crawl records it and moves on.
#[derive(Debug, Clone, Error)]
#[error("extraction failed for {url}: {reason}")]
pub struct ExtractionError {
    pub url: String,
    pub reason: String,
}

impl ExtractionError {
    pub(crate) fn new(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_owned(),
            reason: reason.into(),
        }
    }
}
