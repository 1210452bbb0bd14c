//! The document query port.
//!
//! Extractors never touch a DOM directly. They are written against
//! [`DocumentQuery`], which offers CSS lookups, path-expression evaluation and
//! a handful of node accessors. [`HtmlPage`] implements it over a parsed
//! `dom_query` document; tests and other hosts can supply their own.

mod html;

pub use html::HtmlPage;

use crate::error::{Error, Result};

/// Result of a path-expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum PathValue<N> {
    /// Numeric result, e.g. from `count(...)`.
    Number(f64),
    /// String result.
    String(String),
    /// Boolean result.
    Boolean(bool),
    /// Element and text nodes in document order.
    Nodes(Vec<N>),
}

/// Read-only query interface over one page.
pub trait DocumentQuery {
    /// Opaque node handle.
    type Node: Copy + Eq + std::fmt::Debug;

    /// All elements under `scope` (the whole document when `None`) matching
    /// a CSS selector, in document order. Invalid selectors match nothing.
    fn query_selector_all(&self, scope: Option<Self::Node>, selector: &str) -> Vec<Self::Node>;

    /// First element under `scope` matching a CSS selector.
    fn query_selector(&self, scope: Option<Self::Node>, selector: &str) -> Option<Self::Node> {
        self.query_selector_all(scope, selector).into_iter().next()
    }

    /// Evaluate a path expression with `context` as the context node.
    fn evaluate(&self, expression: &str, context: Option<Self::Node>) -> Result<PathValue<Self::Node>>;

    /// Rendered text of a node: descendant text with whitespace collapsed.
    fn inner_text(&self, node: Self::Node) -> String;

    /// Raw attribute value.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Resolved absolute link target of an anchor.
    fn href(&self, node: Self::Node) -> Option<String>;

    /// Resolved source of an image; `None` when it has none.
    fn current_src(&self, node: Self::Node) -> Option<String>;

    /// Evaluate a path expression that must yield a node list.
    fn evaluate_nodes(&self, expression: &str, context: Option<Self::Node>) -> Result<Vec<Self::Node>> {
        match self.evaluate(expression, context)? {
            PathValue::Nodes(nodes) => Ok(nodes),
            _ => Err(Error::UnexpectedValue {
                expression: expression.to_string(),
                expected: "a node list",
            }),
        }
    }

    /// First node of a node-list expression.
    fn evaluate_first(&self, expression: &str, context: Option<Self::Node>) -> Result<Option<Self::Node>> {
        Ok(self.evaluate_nodes(expression, context)?.into_iter().next())
    }

    /// Evaluate a `count(...)` expression.
    fn evaluate_count(&self, expression: &str) -> Result<usize> {
        match self.evaluate(expression, None)? {
            PathValue::Number(n) if n.is_finite() && n >= 0.0 => Ok(n as usize),
            _ => Err(Error::UnexpectedValue {
                expression: expression.to_string(),
                expected: "a count",
            }),
        }
    }
}
