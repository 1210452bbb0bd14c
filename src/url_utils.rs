//! URL Utility Functions
//!
//! Resolution of `href`/`src` attribute values into absolute URLs, the way a
//! browser exposes them through `a.href` and `img.currentSrc`.

use url::Url;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse a URL string into a Url object.
///
/// # Returns
/// * `Some(Url)` if valid absolute URL, `None` otherwise
#[must_use]
pub fn parse_url(url_str: &str) -> Option<Url> {
    is_absolute_url(url_str).1
}

/// Convert a relative or absolute URL to absolute form.
///
/// Without a base, relative values are returned trimmed but otherwise
/// unchanged. Special schemes (`data:`, `javascript:`, `mailto:`, `tel:`)
/// pass through untouched.
#[must_use]
pub fn create_absolute_url(url_str: &str, base: Option<&Url>) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    if ["data:", "javascript:", "mailto:", "tel:"]
        .iter()
        .any(|scheme| url_str.starts_with(scheme))
    {
        return url_str.to_string();
    }

    if let Some(url) = parse_url(url_str) {
        return url.to_string();
    }

    match base.map(|base| base.join(url_str)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => url_str.to_string(),
    }
}

/// First URL candidate of a `srcset` attribute value.
///
/// `"a.jpg 1x, b.jpg 2x"` yields `"a.jpg"`.
#[must_use]
pub fn first_srcset_candidate(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .next()
}
