//! Character encoding detection and decoding of saved order pages.
//!
//! Order-history pages are normally UTF-8, but older saved copies of the
//! Japanese storefront are Shift_JIS or EUC-JP. The charset is taken from a
//! byte-order mark or a `<meta>` declaration near the top of the page.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Matches both `<meta charset="...">` and
/// `<meta http-equiv="Content-Type" content="...; charset=...">`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+?charset\s*=\s*["']?([A-Za-z0-9_\-:.]+)"#).expect("valid regex")
});

/// How many leading bytes are searched for a `<meta>` declaration.
const SNIFF_LEN: usize = 2048;

/// Detect character encoding from HTML bytes.
///
/// Order of precedence: byte-order mark, `<meta>` charset declaration,
/// then UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode HTML bytes to a UTF-8 string.
///
/// Invalid sequences are replaced with U+FFFD rather than failing.
#[must_use]
pub fn decode_html(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    let (decoded, _encoding_used, _had_errors) = encoding.decode(html);
    decoded.into_owned()
}
