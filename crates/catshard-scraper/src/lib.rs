pub mod client;
pub mod crawler;
pub mod document;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod sites;

pub use client::{HttpRenderer, RenderSession};
pub use crawler::{CrawlReport, ItemFailure, PaginationCrawler, MAX_PAGES};
pub use document::Document;
pub use error::{ExtractionError, ScraperError};
pub use normalize::{normalize, LabeledPattern};
pub use sites::{FieldExtractor, ListingProfile, Site};
