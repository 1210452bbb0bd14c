//! Compiled regex patterns for label parsing.
//!
//! All patterns are compiled once using `LazyLock`. The seller pattern
//! depends on the configured label and is built per call.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// First run of four digits in a year-filter option ("2024年", "past 2024").
pub static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("YEAR regex"));

/// Product id segment of an item URL.
pub static PRODUCT_ASIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/gp/product/([^/]+)/").expect("PRODUCT_ASIN regex"));

/// First digit run of a price label once separators are gone ("￥ 2500").
pub static PRICE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("PRICE_DIGITS regex"));

/// Pattern capturing everything after `label` up to the end of the text.
///
/// # Errors
///
/// Returns the regex error; escaping the label makes this unreachable in practice.
pub fn seller_pattern(label: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"{}\s*(.+)$", regex::escape(label)))
}
