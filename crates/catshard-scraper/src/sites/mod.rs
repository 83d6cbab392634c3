//! Per-source crawl rules.
//!
//! A [`Site`] pairs the listing-page rules the crawler needs (count element,
//! next control, detail links) with the [`FieldExtractor`] that turns one
//! detail page into a [`ProductRecord`]. Selectors and labels are data; the
//! lookup → [`crate::normalize`] shape is shared.

mod cando;
mod jsonld;
mod watts;

use catshard_core::{ProductRecord, SourceId};
use scraper::Selector;

use crate::document::{compile_selector, Document};
use crate::error::{ExtractionError, ScraperError};
use crate::normalize::LabeledPattern;
use crate::pagination::NextControl;

pub use cando::CandoExtractor;
pub use watts::WattsExtractor;

/// Turns a rendered detail page into one record.
///
/// Missing fields are not errors: they normalize to the placeholder. An
/// `Err` means the page as a whole is unusable (for example a malformed
/// structured-data block) and is reported for that item only.
pub trait FieldExtractor {
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when no field of the item can be recovered.
    fn extract(&self, detail: &Document) -> Result<ProductRecord, ExtractionError>;
}

/// Rules for reading a listing page.
#[derive(Debug, Clone)]
pub struct ListingProfile {
    /// Element whose text carries the catalog's total item count.
    pub count: Selector,
    pub next: NextControl,
    /// Anchors pointing at detail pages, in listing order.
    pub item_links: Selector,
    /// Items per listing page, for progress output.
    pub page_size: u32,
}

/// Everything the crawler needs to walk one source.
pub struct Site {
    pub source: SourceId,
    pub listing: ListingProfile,
    pub extractor: Box<dyn FieldExtractor>,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("source", &self.source)
            .field("listing", &self.listing)
            .finish_non_exhaustive()
    }
}

impl Site {
    /// Builds the crawl rules for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSiteRule`] if a built-in selector or
    /// pattern fails to compile.
    pub fn for_source(source: SourceId) -> Result<Self, ScraperError> {
        match source {
            SourceId::Cando => Ok(Self {
                source,
                listing: ListingProfile {
                    count: compile_selector(".item-count")?,
                    next: NextControl {
                        selector: compile_selector(".btn-prev")?,
                        label: "次",
                    },
                    item_links: compile_selector(".item-list-name a")?,
                    page_size: source.page_size(),
                },
                extractor: Box::new(CandoExtractor::new()?),
            }),
            SourceId::Watts => Ok(Self {
                source,
                listing: ListingProfile {
                    count: compile_selector(".collection__products-count")?,
                    next: NextControl {
                        selector: compile_selector("a.pagination__next")?,
                        label: "次",
                    },
                    item_links: compile_selector(
                        ".collection__dynamic-part a.product-item__title",
                    )?,
                    page_size: source.page_size(),
                },
                extractor: Box::new(WattsExtractor::new()?),
            }),
        }
    }
}

/// Compiles a labeled pattern from a site rule.
pub(crate) fn compile_pattern(label: &str, value: &str) -> Result<LabeledPattern, ScraperError> {
    LabeledPattern::new(label, value).map_err(|e| ScraperError::InvalidSiteRule {
        rule: format!("{label}({value})"),
        reason: e.to_string(),
    })
}
