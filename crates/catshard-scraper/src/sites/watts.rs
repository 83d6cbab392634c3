//! Watts online: product fields come from the page's JSON-LD block, the
//! package size from the description table.

use catshard_core::{ExtendedRecord, ProductRecord};
use scraper::Selector;

use super::jsonld::parse_product;
use super::{compile_pattern, FieldExtractor};
use crate::document::{compile_selector, Document};
use crate::error::{ExtractionError, ScraperError};
use crate::normalize::{normalize, LabeledPattern};

const PACKAGE_SIZE_LABEL: &str = "パッケージサイズ";

#[derive(Debug, Clone)]
pub struct WattsExtractor {
    json_ld: Selector,
    table_cells: Selector,
    size: LabeledPattern,
}

impl WattsExtractor {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSiteRule`] if a rule fails to compile.
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            json_ld: compile_selector(r#"[type="application/ld+json"]"#)?,
            table_cells: compile_selector(".c-product-description__table td")?,
            size: compile_pattern("【サイズ】\n", ".+")?,
        })
    }
}

impl FieldExtractor for WattsExtractor {
    fn extract(&self, detail: &Document) -> Result<ProductRecord, ExtractionError> {
        let raw = detail
            .text(&self.json_ld)
            .ok_or_else(|| ExtractionError::new(detail.url(), "no JSON-LD block"))?;
        let data = parse_product(&raw).map_err(|e| {
            ExtractionError::new(detail.url(), format!("malformed JSON-LD: {e}"))
        })?;

        let size = data
            .description
            .as_deref()
            .and_then(|description| self.size.extract(description));
        let package_size = detail.table_value(&self.table_cells, PACKAGE_SIZE_LABEL);

        Ok(ProductRecord::Extended(ExtendedRecord {
            name: normalize(data.name.as_deref()),
            price: normalize(data.price.as_deref()),
            code: normalize(data.gtin13.as_deref()),
            size: normalize(size.as_deref()),
            package_size: normalize(package_size.as_deref()),
            url: normalize(Some(detail.url())),
        }))
    }
}
