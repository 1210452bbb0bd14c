//! Text and number normalization for scraped labels.

use chrono::NaiveDate;

/// Thousands separators stripped before numbers are parsed
/// (ASCII comma and the full-width comma used on Japanese pages).
const THOUSANDS_SEPARATORS: [char; 2] = [',', '，'];

/// Collapse runs of whitespace into single spaces and trim.
///
/// This is the approximation of rendered `innerText` used for every label.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every thousands separator.
#[must_use]
pub fn strip_thousands(text: &str) -> String {
    text.chars().filter(|c| !THOUSANDS_SEPARATORS.contains(c)).collect()
}

/// Integer prefix parse with JavaScript `parseInt(text, 10)` semantics.
///
/// Leading whitespace and an optional sign are accepted, then the longest
/// run of ASCII digits is read and anything after it is ignored. Returns
/// `None` when there is no digit to read (the `NaN` case).
///
/// ```
/// use rs_order_history::normalize::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix(" 42件"), Some(42));
/// assert_eq!(parse_int_prefix("-3"), Some(-3));
/// assert_eq!(parse_int_prefix("件"), None);
/// ```
#[must_use]
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Turn a Japanese order date such as `2024年3月5日` into `2024/3/5`.
///
/// Only the first occurrence of each glyph is touched; dates in other
/// locales (`March 5, 2024`) pass through unchanged.
#[must_use]
pub fn normalize_order_date(text: &str) -> String {
    text.replacen('年', "/", 1)
        .replacen('月', "/", 1)
        .replacen('日', "", 1)
}

/// Best-effort typed view of a normalized order date.
#[must_use]
pub fn parse_order_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    let formats = [
        "%Y/%m/%d",
        "%Y-%m-%d",
        "%B %d, %Y", // March 5, 2024
        "%b %d, %Y", // Mar 5, 2024
        "%d %B %Y",  // 5 March 2024
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}
