//! Listing-page pagination: the "next page" control, the item count, and the
//! `page=` query parameter.
//!
//! ## Next-page discovery
//!
//! A listing exposes its forward link through a control matched by a
//! site-specific selector. The control may be the anchor itself
//! (`a.pagination__next`) or an element nested inside the anchor (an icon
//! such as `.btn-prev`), so the href is read from the nearest enclosing `<a>`.
//!
//! Some markups reuse one class for both the "previous" and "next" controls,
//! so the last page may show only a "previous" control under the next
//! selector. A control is followed only when its label contains the site's
//! next-label token. A lone control with no readable label at all (a bare
//! icon) is followed as-is.

use scraper::{ElementRef, Selector};

use crate::document::{element_text, Document};

/// Where a listing keeps its "go to next page" control.
#[derive(Debug, Clone)]
pub struct NextControl {
    pub selector: Selector,
    /// Token expected in the forward control's label, e.g. `"次"`.
    pub label: &'static str,
}

/// Resolves the next listing URL, or `None` when this is the last page.
///
/// The page is terminal when no control matches, when no matching control
/// carries the label token (unless it is a single unlabeled control), or
/// when the chosen control's href is missing or cannot be resolved.
#[must_use]
pub fn find_next_page(listing: &Document, control: &NextControl) -> Option<String> {
    let candidates: Vec<ElementRef<'_>> = listing.select(&control.selector).collect();

    let chosen = match candidates.as_slice() {
        [] => return None,
        [only] if control_label(*only).trim().is_empty() => *only,
        labeled => {
            let found = labeled
                .iter()
                .find(|el| control_label(**el).contains(control.label));
            let Some(found) = found else {
                tracing::debug!(
                    candidates = labeled.len(),
                    label = control.label,
                    "no next-page control carries the label; treating page as last"
                );
                return None;
            };
            *found
        }
    };

    let anchor = enclosing_anchor(chosen)?;
    listing.resolve(anchor.value().attr("href")?)
}

/// The element itself when it is an `<a>`, otherwise its nearest `<a>` ancestor.
fn enclosing_anchor(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if el.value().name() == "a" {
        return Some(el);
    }
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "a")
}

/// Everything a user could read as the control's label: the anchor's text
/// plus `aria-label`, `title`, and `alt` on the control and its anchor.
fn control_label(el: ElementRef<'_>) -> String {
    let mut label = String::new();
    let mut push_attrs = |e: ElementRef<'_>| {
        for attr in ["aria-label", "title", "alt"] {
            if let Some(v) = e.value().attr(attr) {
                label.push(' ');
                label.push_str(v);
            }
        }
    };

    push_attrs(el);
    if let Some(anchor) = enclosing_anchor(el) {
        if anchor != el {
            push_attrs(anchor);
        }
        label.push(' ');
        label.push_str(&element_text(&anchor));
    } else {
        label.push(' ');
        label.push_str(&element_text(&el));
    }
    label
}

/// Reads the catalog's total item count from `selector`'s text, e.g.
/// `"1,234件"` or `"商品数 96 点"`. Missing or unparseable counts are `0`.
#[must_use]
pub fn item_count(listing: &Document, selector: &Selector) -> u64 {
    listing
        .text(selector)
        .map_or(0, |text| parse_count(&text))
}

fn parse_count(text: &str) -> u64 {
    let digits: String = text
        .chars()
        .filter(|c| *c != ',')
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Page number carried by a listing URL's `page` query parameter.
#[must_use]
pub fn start_page_from_url(url: &str) -> Option<u32> {
    extract_query_param(url, "page")?
        .parse::<u32>()
        .ok()
        .filter(|page| *page > 0)
}

/// Removes every `param` pair from `url`'s query string, leaving the other
/// pairs byte-for-byte as they were. A URL without a query is returned
/// unchanged.
#[must_use]
pub fn strip_query_param(url: &str, param: &str) -> String {
    let (before_fragment, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let Some((path, query)) = before_fragment.split_once('?') else {
        return url.to_owned();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && pair_name(pair) != param)
        .collect();

    let mut stripped = path.to_owned();
    if !kept.is_empty() {
        stripped.push('?');
        stripped.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        stripped.push('#');
        stripped.push_str(fragment);
    }
    stripped
}

/// Extracts the value of a named query parameter from a URL string.
fn extract_query_param(url: &str, param: &str) -> Option<String> {
    let before_fragment = url.split('#').next().unwrap_or(url);
    let (_, query) = before_fragment.split_once('?')?;

    query
        .split('&')
        .find(|pair| pair_name(pair) == param)
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// The name half of a raw `name=value` query pair.
fn pair_name(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(name, _)| name)
}
