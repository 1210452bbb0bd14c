//! Path-expression engine.
//!
//! A self-contained evaluator for the XPath 1.0 subset used by the site rules:
//! location paths with the common axes, `*`/`text()`/`node()` tests,
//! positional and boolean predicates, filter expressions such as
//! `(//div)[2]//a`, comparisons, `and`/`or`, unions and the core string and
//! node-set functions. Arithmetic is not supported.
//!
//! The engine runs over any [`NodeTree`], a read-only arena whose node ids are
//! assigned in document order. Node lists in results are always de-duplicated
//! and sorted in document order.

mod eval;
mod lexer;
mod parser;

use crate::error::Result;

/// Kind of an arena node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root.
    Document,
    /// An element.
    Element,
    /// A text node.
    Text,
    /// Comments, doctypes, processing instructions.
    Other,
}

/// Read-only tree the evaluator walks.
///
/// Node ids must be assigned in document order (pre-order), so that comparing
/// ids compares document positions.
pub trait NodeTree {
    /// Id of the document node.
    fn root(&self) -> usize;

    /// Parent of `node`, `None` for the root.
    fn parent(&self, node: usize) -> Option<usize>;

    /// Child ids of `node` in document order.
    fn children(&self, node: usize) -> &[usize];

    /// Kind of `node`.
    fn kind(&self, node: usize) -> NodeKind;

    /// Lowercase tag name of an element.
    fn name(&self, node: usize) -> Option<&str>;

    /// Attributes of an element as `(name, value)` pairs.
    fn attributes(&self, node: usize) -> &[(String, String)];

    /// Character data of a text node.
    fn text(&self, node: usize) -> Option<&str>;

    /// XPath string-value: attribute value, text data, or the concatenation
    /// of all descendant text nodes.
    fn string_value(&self, node: XNode) -> String {
        match node {
            XNode::Attribute { owner, index } => self
                .attributes(owner)
                .get(index)
                .map(|(_, value)| value.clone())
                .unwrap_or_default(),
            XNode::Node(id) => {
                if self.kind(id) == NodeKind::Text {
                    return self.text(id).unwrap_or_default().to_string();
                }
                let mut out = String::new();
                let mut stack: Vec<usize> = self.children(id).iter().rev().copied().collect();
                while let Some(next) = stack.pop() {
                    match self.kind(next) {
                        NodeKind::Text => out.push_str(self.text(next).unwrap_or_default()),
                        NodeKind::Element | NodeKind::Document => {
                            stack.extend(self.children(next).iter().rev().copied());
                        }
                        NodeKind::Other => {}
                    }
                }
                out
            }
        }
    }
}

/// A node reached by evaluation: a tree node or one attribute of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XNode {
    /// Arena node id.
    Node(usize),
    /// Attribute `index` of element `owner`.
    Attribute {
        /// Owning element id.
        owner: usize,
        /// Position in the owner's attribute list.
        index: usize,
    },
}

impl XNode {
    /// Sort key placing attributes after their owner and before its children.
    fn order_key(self) -> (usize, usize) {
        match self {
            Self::Node(id) => (id, 0),
            Self::Attribute { owner, index } => (owner, index + 1),
        }
    }
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric result, e.g. from `count()`.
    Number(f64),
    /// String result.
    String(String),
    /// Boolean result.
    Boolean(bool),
    /// Node list in document order.
    Nodes(Vec<XNode>),
}

/// A parsed, reusable path expression.
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    expr: parser::Expr,
}

impl Expression {
    /// Parses `source`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidExpression`] on syntax errors, unknown
    /// functions and wrong argument counts.
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            expr: parser::parse(source)?,
        })
    }

    /// Evaluates against `tree` with `context` as the context node
    /// (the root when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidExpression`] when an operand has the
    /// wrong type, e.g. `count("x")`.
    pub fn evaluate<T: NodeTree + ?Sized>(&self, tree: &T, context: Option<usize>) -> Result<Value> {
        let context = context.unwrap_or_else(|| tree.root());
        eval::Evaluator::new(tree, &self.source).evaluate(&self.expr, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::page::HtmlPage;

    const PAGE: &str = r#"
        <html><body>
          <div class="a-box shipment" id="s1">
            <div class="a-fixed-left-grid a-spacing-base" id="i1"><a href="/x">One</a></div>
          </div>
          <div class="a-box shipment" id="s2">
            <div class="a-fixed-left-grid a-spacing-base" id="i2"><a href="/y">Two</a></div>
            <div class="a-fixed-left-grid a-spacing-base" id="i3"><a href="/z">Three</a></div>
          </div>
          <ul class="a-pagination"><li class="a-normal"><a>1</a></li><li class="a-last"><a>Next</a></li></ul>
          <label for="orderFilter"><span class="num-orders">12件</span></label>
        </body></html>
    "#;

    fn eval(page: &HtmlPage, source: &str) -> Value {
        Expression::parse(source).unwrap().evaluate(page, None).unwrap()
    }

    fn ids(page: &HtmlPage, value: &Value) -> Vec<String> {
        match value {
            Value::Nodes(nodes) => nodes
                .iter()
                .filter_map(|&n| match n {
                    XNode::Node(id) => page.attributes(id).iter().find(|(k, _)| k == "id").map(|(_, v)| v.clone()),
                    XNode::Attribute { .. } => None,
                })
                .collect(),
            other => panic!("expected nodes, got {other:?}"),
        }
    }

    #[test]
    fn test_count_descendants() {
        let doc = dom::parse(PAGE);
        let page = HtmlPage::new(&doc, None);
        assert_eq!(
            eval(&page, r#"count(//div[contains(@class, "a-box shipment")])"#),
            Value::Number(2.0)
        );
        assert_eq!(
            eval(&page, r#"count(//div[contains(@class, "a-fixed-left-grid a-spacing-")])"#),
            Value::Number(3.0)
        );
    }

    #[test]
    fn test_positional_predicate_is_per_parent() {
        let doc = dom::parse(PAGE);
        let page = HtmlPage::new(&doc, None);
        let value = eval(&page, r#"//div[contains(@class, "a-fixed-left-grid")][1]"#);
        assert_eq!(ids(&page, &value), vec!["i1", "i2"]);
    }

    #[test]
    fn test_filter_expression_position_is_document_order() {
        let doc = dom::parse(PAGE);
        let page = HtmlPage::new(&doc, None);
        let value = eval(&page, r#"(//div[contains(@class, "a-fixed-left-grid")])[2]"#);
        assert_eq!(ids(&page, &value), vec!["i2"]);

        let scoped = eval(
            &page,
            r#"((//div[contains(@class, "a-box shipment")])[2]//div[contains(@class, "a-fixed-left-grid")])[2]"#,
        );
        assert_eq!(ids(&page, &scoped), vec!["i3"]);
    }

    #[test]
    fn test_attribute_equality_and_child_steps() {
        let doc = dom::parse(PAGE);
        let page = HtmlPage::new(&doc, None);
        assert_eq!(
            eval(&page, r#"string(//label[@for="orderFilter"]//span[contains(@class, "num-orders")])"#),
            Value::String("12件".into())
        );
        assert_eq!(
            eval(&page, r#"count(//ul[contains(@class, "a-pagination")]/li[contains(@class, "a-last")]/a)"#),
            Value::Number(1.0)
        );
        assert_eq!(eval(&page, r#"count(//ul/a)"#), Value::Number(0.0));
    }

    #[test]
    fn test_text_predicate_uses_first_text_node() {
        let doc = dom::parse(r#"<div><a id="a">Show <b>x</b> details</a><a id="b">details</a></div>"#);
        let page = HtmlPage::new(&doc, None);
        let value = eval(&page, r#"//a[contains(text(), "details")]"#);
        assert_eq!(ids(&page, &value), vec!["b"]);
    }

    #[test]
    fn test_relative_path_from_context() {
        let doc = dom::parse(PAGE);
        let page = HtmlPage::new(&doc, None);
        let shipment = match eval(&page, r#"//div[@id="s2"]"#) {
            Value::Nodes(nodes) => match nodes[0] {
                XNode::Node(id) => id,
                XNode::Attribute { .. } => unreachable!(),
            },
            other => panic!("expected nodes, got {other:?}"),
        };
        let value = Expression::parse(".//a").unwrap().evaluate(&page, Some(shipment)).unwrap();
        match value {
            Value::Nodes(nodes) => assert_eq!(nodes.len(), 2),
            other => panic!("expected nodes, got {other:?}"),
        }
    }

    #[test]
    fn test_union_parent_and_siblings() {
        let doc = dom::parse(PAGE);
        let page = HtmlPage::new(&doc, None);
        let value = eval(&page, r#"//div[@id="i3"]/preceding-sibling::div | //div[@id="s1"]"#);
        assert_eq!(ids(&page, &value), vec!["s1", "i2"]);
        let value = eval(&page, r#"//div[@id="i2"]/following-sibling::*/.."#);
        assert_eq!(ids(&page, &value), vec!["s2"]);
    }

    #[test]
    fn test_scalar_functions() {
        let doc = dom::parse(PAGE);
        let page = HtmlPage::new(&doc, None);
        assert_eq!(eval(&page, "not(//table)"), Value::Boolean(true));
        assert_eq!(eval(&page, r#"starts-with("a-box", "a-")"#), Value::Boolean(true));
        assert_eq!(eval(&page, r#"normalize-space("  a   b ")"#), Value::String("a b".into()));
        assert_eq!(eval(&page, r#"concat("a", 1, true())"#), Value::String("a1true".into()));
        assert_eq!(eval(&page, r#"string-length("注文")"#), Value::Number(2.0));
        assert!(matches!(eval(&page, r#"number("x")"#), Value::Number(n) if n.is_nan()));
        assert_eq!(eval(&page, "count(//li) > 1 and count(//li) <= 2"), Value::Boolean(true));
    }

    #[test]
    fn test_last_and_position() {
        let doc = dom::parse(PAGE);
        let page = HtmlPage::new(&doc, None);
        let value = eval(&page, r#"//div[@id="s2"]/div[position() = last()]"#);
        assert_eq!(ids(&page, &value), vec!["i3"]);
    }

    #[test]
    fn test_count_of_non_node_list_is_an_error() {
        let doc = dom::parse(PAGE);
        let page = HtmlPage::new(&doc, None);
        let expr = Expression::parse(r#"count("x")"#).unwrap();
        assert!(expr.evaluate(&page, None).is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(super::eval::format_number(3.0), "3");
        assert_eq!(super::eval::format_number(0.5), "0.5");
        assert_eq!(super::eval::format_number(f64::NAN), "NaN");
        assert_eq!(super::eval::format_number(f64::NEG_INFINITY), "-Infinity");
    }
}
