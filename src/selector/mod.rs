//! Selector Infrastructure
//!
//! Site markup changes between layout revisions, so every element the
//! extractors need is described by an ordered list of [`Locator`]s. The
//! resolvers try them in order and the first one that finds something wins.
//! The lists themselves live in [`rules`].

use crate::logging::ExtractLog;
use crate::options::Options;
use crate::page::DocumentQuery;

pub mod rules;

/// One strategy for finding an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector, scoped to the search root.
    Css(&'static str),

    /// Path expression evaluated with the search root as context node.
    /// Expressions starting with `//` search the whole document.
    Path(&'static str),

    /// Every anchor under the search root whose text contains one of
    /// [`Options::detail_link_labels`] or whose resolved href contains
    /// `href_contains`.
    AnchorScan {
        /// Substring looked for in the resolved href.
        href_contains: &'static str,
    },

    /// Path expression over anchors under the search root whose text
    /// contains one of [`Options::detail_link_labels`] or whose raw `href`
    /// contains `href_contains`. Built per call by [`rules::detail_link`].
    LabelPath {
        /// Substring looked for in the `href` attribute.
        href_contains: &'static str,
    },
}

impl Locator {
    fn find_all<Q: DocumentQuery + ?Sized>(
        self,
        page: &Q,
        scope: Option<Q::Node>,
        options: &Options,
    ) -> crate::Result<Vec<Q::Node>> {
        match self {
            Self::Css(selector) => Ok(page.query_selector_all(scope, selector)),
            Self::Path(expression) => page.evaluate_nodes(expression, scope),
            Self::AnchorScan { href_contains } => Ok(page
                .query_selector_all(scope, "a")
                .into_iter()
                .filter(|&anchor| {
                    let text = page.inner_text(anchor);
                    options.detail_link_labels.iter().any(|label| text.contains(label.as_str()))
                        || page.href(anchor).is_some_and(|href| href.contains(href_contains))
                })
                .collect()),
            Self::LabelPath { href_contains } => {
                page.evaluate_nodes(&rules::detail_link(&options.detail_link_labels, href_contains), scope)
            }
        }
    }
}

/// First element found by the first locator that finds anything.
///
/// A locator that fails to evaluate counts as finding nothing; the failure
/// is logged at debug level.
///
/// # Example
///
/// ```rust
/// use rs_order_history::dom;
/// use rs_order_history::logging::NoopLog;
/// use rs_order_history::page::{DocumentQuery, HtmlPage};
/// use rs_order_history::selector::{self, Locator};
/// use rs_order_history::Options;
///
/// let doc = dom::parse(r#"<select id="orderFilter"><option>2024年</option></select>"#);
/// let page = HtmlPage::new(&doc, None);
/// let chain = [Locator::Css("#time-filter"), Locator::Css("#orderFilter")];
///
/// let found = selector::resolve_first(&page, None, &chain, &Options::default(), &NoopLog);
/// assert_eq!(found, page.query_selector(None, "select"));
/// ```
pub fn resolve_first<Q: DocumentQuery + ?Sized>(
    page: &Q,
    scope: Option<Q::Node>,
    locators: &[Locator],
    options: &Options,
    log: &dyn ExtractLog,
) -> Option<Q::Node> {
    resolve_all(page, scope, locators, options, log).into_iter().next()
}

/// All elements found by the first locator that finds at least one.
pub fn resolve_all<Q: DocumentQuery + ?Sized>(
    page: &Q,
    scope: Option<Q::Node>,
    locators: &[Locator],
    options: &Options,
    log: &dyn ExtractLog,
) -> Vec<Q::Node> {
    for locator in locators {
        match locator.find_all(page, scope, options) {
            Ok(found) if !found.is_empty() => return found,
            Ok(_) => {}
            Err(err) => log.debug(format!("{locator:?} failed: {err}")),
        }
    }
    Vec::new()
}
