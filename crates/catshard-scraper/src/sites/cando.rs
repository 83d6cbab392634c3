//! Cando net shop: every field comes from a CSS selector on the detail page.

use catshard_core::{BasicRecord, ProductRecord};
use scraper::Selector;

use super::{compile_pattern, FieldExtractor};
use crate::document::{compile_selector, Document};
use crate::error::{ExtractionError, ScraperError};
use crate::normalize::{normalize, LabeledPattern};
use crate::pagination::strip_query_param;

/// Query parameter the listing appends to detail links; not part of the item URL.
const LISTING_QUERY_PARAM: &str = "category_page_id";

#[derive(Debug, Clone)]
pub struct CandoExtractor {
    name: Selector,
    price: Selector,
    code: Selector,
    description: Selector,
    size: LabeledPattern,
}

impl CandoExtractor {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSiteRule`] if a rule fails to compile.
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            name: compile_selector(".item-name")?,
            price: compile_selector(r#"[data-id="makeshop-item-price:1"]"#)?,
            code: compile_selector(".original-code .value")?,
            description: compile_selector(".item-description-01")?,
            size: compile_pattern("本体サイズ(約)：", "[a-zA-Z0-9×]+")?,
        })
    }
}

impl FieldExtractor for CandoExtractor {
    fn extract(&self, detail: &Document) -> Result<ProductRecord, ExtractionError> {
        let size = detail
            .text(&self.description)
            .and_then(|block| self.size.extract(&block));
        let url = strip_query_param(detail.url(), LISTING_QUERY_PARAM);

        Ok(ProductRecord::Basic(BasicRecord {
            name: normalize(detail.text(&self.name).as_deref()),
            price: normalize(detail.text(&self.price).as_deref()),
            code: normalize(detail.text(&self.code).as_deref()),
            size: normalize(size.as_deref()),
            url: normalize(Some(&url)),
        }))
    }
}
