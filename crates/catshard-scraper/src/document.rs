//! A rendered page plus the query helpers site strategies need.

use reqwest::Url;
use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};

/// A loaded page: its final URL (after redirects) and the parsed DOM.
pub struct Document {
    url: String,
    html: Html,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("url", &self.url).finish()
    }
}

impl Document {
    #[must_use]
    pub fn parse(url: &str, body: &str) -> Self {
        Self {
            url: url.to_owned(),
            html: Html::parse_document(body),
        }
    }

    /// The document location, equivalent to `location.href`.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn select<'a>(&'a self, selector: &'a Selector) -> Select<'a, 'a> {
        self.html.select(selector)
    }

    /// Text content of the first element matching `selector`.
    #[must_use]
    pub fn text(&self, selector: &Selector) -> Option<String> {
        self.html.select(selector).next().map(|el| element_text(&el))
    }

    /// `href` values of every element matching `selector`, resolved against
    /// the document URL, in document order. Links that do not resolve are
    /// dropped.
    #[must_use]
    pub fn links(&self, selector: &Selector) -> Vec<String> {
        self.html
            .select(selector)
            .filter_map(|el| el.value().attr("href"))
            .filter_map(|href| self.resolve(href))
            .collect()
    }

    /// Resolves a possibly-relative `href` to an absolute http(s) URL.
    ///
    /// Empty, fragment-only, and `javascript:` hrefs resolve to `None`.
    #[must_use]
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }
        let base = Url::parse(&self.url).ok()?;
        let resolved = base.join(href).ok()?;
        matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
    }

    /// Scans the cells matched by `cells` for the first one whose text
    /// contains `label`, and returns the text of the next sibling element.
    #[must_use]
    pub fn table_value(&self, cells: &Selector, label: &str) -> Option<String> {
        let label_cell = self
            .html
            .select(cells)
            .find(|cell| element_text(cell).contains(label))?;
        label_cell
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|value_cell| element_text(&value_cell))
    }
}

/// Concatenated descendant text, like the DOM's `textContent`.
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

/// Compiles a CSS selector from a site rule.
pub(crate) fn compile_selector(rule: &str) -> Result<Selector, crate::ScraperError> {
    Selector::parse(rule).map_err(|e| crate::ScraperError::InvalidSiteRule {
        rule: rule.to_owned(),
        reason: format!("{e:?}"),
    })
}
