//! [`DocumentQuery`] over a parsed `dom_query` document.

use std::collections::HashMap;

use dom_query::{Document, NodeId, NodeRef};
use url::Url;

use super::{DocumentQuery, PathValue};
use crate::dom;
use crate::error::Result;
use crate::normalize::collapse_whitespace;
use crate::url_utils::{create_absolute_url, first_srcset_candidate, parse_url};
use crate::xpath::{Expression, NodeKind, NodeTree, Value, XNode};

#[derive(Debug)]
struct ArenaNode {
    parent: Option<usize>,
    children: Vec<usize>,
    kind: NodeKind,
    name: Option<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
}

/// A parsed page, indexed once for path-expression evaluation.
///
/// Node handles are positions in document order, so sorting handles sorts
/// nodes by document position. CSS queries are delegated to `dom_query`.
///
/// # Example
///
/// ```rust
/// use rs_order_history::dom;
/// use rs_order_history::page::{DocumentQuery, HtmlPage};
///
/// let doc = dom::parse(r#"<a class="a-link-normal" href="/gp/product/B0TEST0001/">Item</a>"#);
/// let page = HtmlPage::new(&doc, Some("https://www.amazon.co.jp/"));
///
/// let link = page.query_selector(None, "a.a-link-normal").unwrap();
/// assert_eq!(page.inner_text(link), "Item");
/// assert_eq!(
///     page.href(link).as_deref(),
///     Some("https://www.amazon.co.jp/gp/product/B0TEST0001/")
/// );
/// ```
pub struct HtmlPage<'a> {
    refs: Vec<NodeRef<'a>>,
    arena: Vec<ArenaNode>,
    index: HashMap<NodeId, usize>,
    base_url: Option<Url>,
}

impl<'a> HtmlPage<'a> {
    /// Index `doc`. `page_url` is the address the page was loaded from and is
    /// used to resolve relative links; a `<base href>` in the page takes
    /// precedence.
    #[must_use]
    pub fn new(doc: &'a Document, page_url: Option<&str>) -> Self {
        let mut page = Self {
            refs: Vec::new(),
            arena: Vec::new(),
            index: HashMap::new(),
            base_url: page_url.and_then(parse_url),
        };

        match dom::document_node(doc) {
            Some(root) => page.index_tree(root),
            None => page.arena.push(ArenaNode {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
                name: None,
                attributes: Vec::new(),
                text: None,
            }),
        }

        if let Some(base) = page.declared_base() {
            page.base_url = Some(base);
        }
        page
    }

    /// Base URL used for link resolution.
    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Pre-order walk assigning handles in document order.
    fn index_tree(&mut self, root: NodeRef<'a>) {
        let mut stack: Vec<(NodeRef<'a>, Option<usize>)> = vec![(root, None)];

        while let Some((node, parent)) = stack.pop() {
            let id = self.arena.len();
            let kind = if parent.is_none() {
                NodeKind::Document
            } else if node.is_element() {
                NodeKind::Element
            } else if node.is_text() {
                NodeKind::Text
            } else {
                NodeKind::Other
            };

            self.arena.push(ArenaNode {
                parent,
                children: Vec::new(),
                kind,
                name: (kind == NodeKind::Element).then(|| dom::tag_name(&node)).flatten(),
                attributes: if kind == NodeKind::Element {
                    dom::get_all_attributes(&node)
                } else {
                    Vec::new()
                },
                text: (kind == NodeKind::Text).then(|| dom::text_content(&node).to_string()),
            });
            self.refs.push(node);
            self.index.insert(node.id, id);
            if let Some(parent) = parent {
                self.arena[parent].children.push(id);
            }

            let children: Vec<NodeRef<'a>> = node.children().into_iter().collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }
    }

    /// Absolute `<base href>` of the document, if any.
    fn declared_base(&self) -> Option<Url> {
        let base = self.query_selector(None, "base[href]")?;
        let href = self.attribute(base, "href")?;
        parse_url(&create_absolute_url(&href, self.base_url.as_ref()))
    }

    fn resolve(&self, value: &str) -> Option<String> {
        let resolved = create_absolute_url(value, self.base_url.as_ref());
        (!resolved.is_empty()).then_some(resolved)
    }
}

impl NodeTree for HtmlPage<'_> {
    fn root(&self) -> usize {
        0
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.arena.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: usize) -> &[usize] {
        self.arena.get(node).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    fn kind(&self, node: usize) -> NodeKind {
        self.arena.get(node).map_or(NodeKind::Other, |n| n.kind)
    }

    fn name(&self, node: usize) -> Option<&str> {
        self.arena.get(node).and_then(|n| n.name.as_deref())
    }

    fn attributes(&self, node: usize) -> &[(String, String)] {
        self.arena.get(node).map(|n| n.attributes.as_slice()).unwrap_or_default()
    }

    fn text(&self, node: usize) -> Option<&str> {
        self.arena.get(node).and_then(|n| n.text.as_deref())
    }
}

impl DocumentQuery for HtmlPage<'_> {
    type Node = usize;

    fn query_selector_all(&self, scope: Option<usize>, selector: &str) -> Vec<usize> {
        let Some(&scope) = self.refs.get(scope.unwrap_or(0)) else {
            return Vec::new();
        };
        let mut found: Vec<usize> = dom::query_selector_all(scope, selector)
            .iter()
            .filter_map(|node| self.index.get(&node.id).copied())
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    fn evaluate(&self, expression: &str, context: Option<usize>) -> Result<PathValue<usize>> {
        let value = Expression::parse(expression)?.evaluate(self, context)?;
        Ok(match value {
            Value::Number(n) => PathValue::Number(n),
            Value::String(s) => PathValue::String(s),
            Value::Boolean(b) => PathValue::Boolean(b),
            Value::Nodes(nodes) => PathValue::Nodes(
                nodes
                    .into_iter()
                    .filter_map(|node| match node {
                        XNode::Node(id) => Some(id),
                        XNode::Attribute { .. } => None,
                    })
                    .collect(),
            ),
        })
    }

    fn inner_text(&self, node: usize) -> String {
        collapse_whitespace(&self.string_value(XNode::Node(node)))
    }

    fn attribute(&self, node: usize, name: &str) -> Option<String> {
        self.attributes(node)
            .iter()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    fn href(&self, node: usize) -> Option<String> {
        self.resolve(&self.attribute(node, "href")?)
    }

    fn current_src(&self, node: usize) -> Option<String> {
        if let Some(src) = self.attribute(node, "src").filter(|src| !src.trim().is_empty()) {
            return self.resolve(&src);
        }
        let srcset = self.attribute(node, "srcset")?;
        self.resolve(first_srcset_candidate(&srcset)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_in_document_order() {
        let doc = dom::parse("<div id='a'><p id='b'>x</p></div><div id='c'></div>");
        let page = HtmlPage::new(&doc, None);
        let divs = page.query_selector_all(None, "div");
        let p = page.query_selector(None, "p").unwrap();
        assert_eq!(divs.len(), 2);
        assert!(divs[0] < p && p < divs[1]);
        assert_eq!(page.kind(0), NodeKind::Document);
    }

    #[test]
    fn test_scoped_css_query() {
        let doc = dom::parse(
            r#"<div class="order"><span class="value">A</span></div>
               <div class="order"><span class="value">B</span></div>"#,
        );
        let page = HtmlPage::new(&doc, None);
        let cards = page.query_selector_all(None, "div.order");
        let value = page.query_selector(Some(cards[1]), ".value").unwrap();
        assert_eq!(page.inner_text(value), "B");
    }

    #[test]
    fn test_inner_text_collapses_whitespace() {
        let doc = dom::parse("<span class='a-size-small'>\n  販売:\n    Amazon Japan G.K.  </span>");
        let page = HtmlPage::new(&doc, None);
        let span = page.query_selector(None, "span").unwrap();
        assert_eq!(page.inner_text(span), "販売: Amazon Japan G.K.");
    }

    #[test]
    fn test_base_element_overrides_page_url() {
        let doc = dom::parse(
            r#"<html><head><base href="https://www.amazon.com/"></head>
               <body><a href="/gp/css/order-details?orderID=1">x</a></body></html>"#,
        );
        let page = HtmlPage::new(&doc, Some("https://www.amazon.co.jp/"));
        assert_eq!(page.base_url().map(Url::as_str), Some("https://www.amazon.com/"));
        let a = page.query_selector(None, "a").unwrap();
        assert_eq!(
            page.href(a).as_deref(),
            Some("https://www.amazon.com/gp/css/order-details?orderID=1")
        );
    }

    #[test]
    fn test_href_without_base_is_raw() {
        let doc = dom::parse(r#"<a href="/gp/product/B0TEST0001/">x</a><a>no href</a>"#);
        let page = HtmlPage::new(&doc, None);
        let links = page.query_selector_all(None, "a");
        assert_eq!(page.href(links[0]).as_deref(), Some("/gp/product/B0TEST0001/"));
        assert_eq!(page.href(links[1]), None);
    }

    #[test]
    fn test_current_src_prefers_src_then_srcset() {
        let doc = dom::parse(
            r#"<img id="a" src="/images/I/a.jpg">
               <img id="b" src="" srcset="/images/I/b.jpg 1x, /images/I/b2.jpg 2x">
               <img id="c">"#,
        );
        let page = HtmlPage::new(&doc, Some("https://m.media-amazon.com/"));
        let imgs = page.query_selector_all(None, "img");
        assert_eq!(page.current_src(imgs[0]).as_deref(), Some("https://m.media-amazon.com/images/I/a.jpg"));
        assert_eq!(page.current_src(imgs[1]).as_deref(), Some("https://m.media-amazon.com/images/I/b.jpg"));
        assert_eq!(page.current_src(imgs[2]), None);
    }

    #[test]
    fn test_evaluate_maps_node_lists_and_scalars() {
        let doc = dom::parse("<ul><li>1</li><li>2</li></ul>");
        let page = HtmlPage::new(&doc, None);
        assert_eq!(page.evaluate("count(//li)", None).unwrap(), PathValue::Number(2.0));
        assert_eq!(page.evaluate_nodes("//li", None).unwrap().len(), 2);
        assert_eq!(page.evaluate_count("count(//li)").unwrap(), 2);
        assert!(page.evaluate_nodes("count(//li)", None).is_err());
        assert!(page.evaluate_count("//li").is_err());
        assert!(page.evaluate("//li[", None).is_err());
    }

    #[test]
    fn test_attribute_nodes_are_dropped_from_results() {
        let doc = dom::parse(r#"<a href="x">x</a>"#);
        let page = HtmlPage::new(&doc, None);
        assert_eq!(page.evaluate("//a/@href", None).unwrap(), PathValue::Nodes(vec![]));
    }
}
