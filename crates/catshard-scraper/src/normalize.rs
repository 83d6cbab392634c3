//! Field normalization shared by every site strategy.
//!
//! Raw values come out of selector lookups, JSON-LD blocks, or table cells and
//! may be missing, padded, or broken across lines. [`normalize`] turns any of
//! them into the display string stored in a shard. [`LabeledPattern`] pulls a
//! labeled value (e.g. a size line) out of a larger free-text block first.

use catshard_core::PLACEHOLDER;
use regex::Regex;

/// Converts a possibly-absent raw value into a display string.
///
/// Surrounding whitespace is trimmed and every `\r` / `\n` is removed. An
/// absent value, or one that is empty after trimming, becomes
/// [`PLACEHOLDER`]. Never fails and never returns an empty string.
#[must_use]
pub fn normalize(raw: Option<&str>) -> String {
    let cleaned: String = raw
        .unwrap_or_default()
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect();

    if cleaned.is_empty() {
        PLACEHOLDER.to_owned()
    } else {
        cleaned
    }
}

/// A `label` followed by a value matching `value_pattern`, located anywhere
/// in a text block.
///
/// The label is matched literally; the value pattern is a regex fragment
/// whose match becomes the capture. For `"本体サイズ(約)："` with
/// `"[a-zA-Z0-9×]+"`, the block `"…本体サイズ(約)：W30×D20 (箱入)"` yields
/// `"W30×D20"`.
#[derive(Debug, Clone)]
pub struct LabeledPattern {
    regex: Regex,
}

impl LabeledPattern {
    /// # Errors
    ///
    /// Returns [`regex::Error`] if `value_pattern` is not a valid regex fragment.
    pub fn new(label: &str, value_pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("{}({value_pattern})", regex::escape(label)))?;
        Ok(Self { regex })
    }

    /// Returns the first value following the label, or `None` when the label
    /// does not occur or is not followed by a matching value.
    #[must_use]
    pub fn extract(&self, block: &str) -> Option<String> {
        self.regex
            .captures(block)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
