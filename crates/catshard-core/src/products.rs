use crate::sources::Schema;

/// Sentinel written for any field whose source value is absent or empty.
pub const PLACEHOLDER: &str = "-";

/// A product from a source that does not publish packaging dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicRecord {
    pub name: String,
    pub price: String,
    /// Item identifier, usually a JAN barcode.
    pub code: String,
    /// Product body dimensions as displayed, e.g. `"W30×D20×H5"`.
    pub size: String,
    /// Canonical detail-page URL.
    pub url: String,
}

/// A product with an additional packaging-size column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedRecord {
    pub name: String,
    pub price: String,
    pub code: String,
    pub size: String,
    pub package_size: String,
    pub url: String,
}

/// One scraped item, tagged by the schema it was extracted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRecord {
    Basic(BasicRecord),
    Extended(ExtendedRecord),
}

impl ProductRecord {
    #[must_use]
    pub fn schema(&self) -> Schema {
        match self {
            ProductRecord::Basic(_) => Schema::Basic,
            ProductRecord::Extended(_) => Schema::Extended,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ProductRecord::Basic(r) => &r.name,
            ProductRecord::Extended(r) => &r.name,
        }
    }

    /// Field values in the schema's column order.
    #[must_use]
    pub fn to_row(&self) -> Vec<&str> {
        match self {
            ProductRecord::Basic(r) => vec![&r.name, &r.price, &r.code, &r.size, &r.url],
            ProductRecord::Extended(r) => vec![
                &r.name,
                &r.price,
                &r.code,
                &r.size,
                &r.package_size,
                &r.url,
            ],
        }
    }

    /// Rebuilds a record from positional values.
    ///
    /// Missing trailing values become [`PLACEHOLDER`] and values beyond the
    /// schema width are ignored, so a row is never rejected for its length.
    #[must_use]
    pub fn from_row<S: AsRef<str>>(schema: Schema, values: &[S]) -> Self {
        let at = |i: usize| -> String {
            values
                .get(i)
                .map(AsRef::as_ref)
                .filter(|v| !v.is_empty())
                .unwrap_or(PLACEHOLDER)
                .to_owned()
        };

        match schema {
            Schema::Basic => ProductRecord::Basic(BasicRecord {
                name: at(0),
                price: at(1),
                code: at(2),
                size: at(3),
                url: at(4),
            }),
            Schema::Extended => ProductRecord::Extended(ExtendedRecord {
                name: at(0),
                price: at(1),
                code: at(2),
                size: at(3),
                package_size: at(4),
                url: at(5),
            }),
        }
    }
}
