use crate::CoreError;

/// One of the two catalog origins the crawler knows how to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    /// Cando net shop. Records use the [`Schema::Basic`] layout.
    Cando,
    /// Watts online store. Records use the [`Schema::Extended`] layout.
    Watts,
}

impl SourceId {
    pub const ALL: [SourceId; 2] = [SourceId::Cando, SourceId::Watts];

    /// Directory-safe identifier, also used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceId::Cando => "cando",
            SourceId::Watts => "watts",
        }
    }

    /// Record layout produced by this source.
    #[must_use]
    pub fn schema(self) -> Schema {
        match self {
            SourceId::Cando => Schema::Basic,
            SourceId::Watts => Schema::Extended,
        }
    }

    /// Catalog root crawled when no start URL is given.
    #[must_use]
    pub fn default_start_url(self) -> &'static str {
        match self {
            SourceId::Cando => "https://netshop.cando-web.co.jp/view/category/all_items",
            SourceId::Watts => "https://watts-online.jp/collections/all",
        }
    }

    /// Number of items a listing page shows. Used for progress output only.
    #[must_use]
    pub fn page_size(self) -> u32 {
        48
    }

    /// Maps the single-character operator answer to a source.
    ///
    /// `"c"` selects cando, `"w"` selects watts; anything else is `None`
    /// and the caller must treat it as a cancellation.
    #[must_use]
    pub fn from_prompt_key(answer: &str) -> Option<Self> {
        match answer.trim() {
            "c" => Some(SourceId::Cando),
            "w" => Some(SourceId::Watts),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cando" | "c" => Ok(SourceId::Cando),
            "watts" | "w" => Ok(SourceId::Watts),
            other => Err(CoreError::UnknownSource(other.to_owned())),
        }
    }
}

/// A persisted column: `key` is the stable internal identifier, `title` is the
/// display string written to header rows. Parsing never looks at `title`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub title: &'static str,
}

const NAME: Column = Column {
    key: "name",
    title: "商品名",
};
const PRICE: Column = Column {
    key: "price",
    title: "価格",
};
const CODE: Column = Column {
    key: "code",
    title: "JANコード",
};
const SIZE: Column = Column {
    key: "size",
    title: "本体サイズ",
};
const PACKAGE_SIZE: Column = Column {
    key: "package_size",
    title: "パッケージサイズ",
};
const URL: Column = Column {
    key: "url",
    title: "URL",
};

const BASIC_COLUMNS: [Column; 5] = [NAME, PRICE, CODE, SIZE, URL];
const EXTENDED_COLUMNS: [Column; 6] = [NAME, PRICE, CODE, SIZE, PACKAGE_SIZE, URL];

/// Positional record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// `name, price, code, size, url`
    Basic,
    /// `name, price, code, size, package_size, url`
    Extended,
}

impl Schema {
    #[must_use]
    pub fn columns(self) -> &'static [Column] {
        match self {
            Schema::Basic => &BASIC_COLUMNS,
            Schema::Extended => &EXTENDED_COLUMNS,
        }
    }

    #[must_use]
    pub fn width(self) -> usize {
        self.columns().len()
    }

    /// Display titles in column order, ready to be written as a header row.
    #[must_use]
    pub fn header(self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.title).collect()
    }
}
