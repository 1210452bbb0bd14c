//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used to build [`crate::page::HtmlPage`]
//! and to run CSS selector queries without panicking on bad selectors.

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// The document node itself (the parent of `<html>`).
///
/// `dom_query` always synthesizes an `<html>` element when parsing a full
/// document, so this only returns `None` for an empty tree.
#[must_use]
pub fn document_node(doc: &Document) -> Option<NodeRef<'_>> {
    let html = doc.select("html");
    let html = html.nodes().first()?;
    Some(html.parent().unwrap_or(*html))
}

/// Get all text content of node and descendants
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

/// Lowercase tag name of an element node.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Get all attributes as key-value pairs
///
/// Returns empty vector if node has no attributes.
#[must_use]
pub fn get_all_attributes(node: &NodeRef) -> Vec<(String, String)> {
    node.attrs()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

/// Query all descendants of `scope` matching a CSS selector.
///
/// An invalid selector yields no matches instead of panicking.
#[must_use]
pub fn query_selector_all<'a>(scope: NodeRef<'a>, selector: &str) -> Vec<NodeRef<'a>> {
    Selection::from(scope)
        .try_select(selector)
        .map(|sel| sel.nodes().to_vec())
        .unwrap_or_default()
}
