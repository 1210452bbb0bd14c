//! Expression evaluation over a [`NodeTree`].

use std::cmp::Ordering;

use super::parser::{Axis, CompareOp, Expr, Function, NodeTest, PathStart, Step};
use super::{NodeKind, NodeTree, Value, XNode};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
struct Context {
    node: XNode,
    position: usize,
    size: usize,
}

pub(crate) struct Evaluator<'t, T: NodeTree + ?Sized> {
    tree: &'t T,
    source: &'t str,
}

impl<'t, T: NodeTree + ?Sized> Evaluator<'t, T> {
    pub(crate) fn new(tree: &'t T, source: &'t str) -> Self {
        Self { tree, source }
    }

    pub(crate) fn evaluate(&self, expr: &Expr, context: usize) -> Result<Value> {
        let ctx = Context {
            node: XNode::Node(context),
            position: 1,
            size: 1,
        };
        self.eval(expr, ctx)
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::invalid_expression(self.source, reason)
    }

    fn eval(&self, expr: &Expr, ctx: Context) -> Result<Value> {
        match expr {
            Expr::Or(left, right) => {
                let value = self.boolean(&self.eval(left, ctx)?) || self.boolean(&self.eval(right, ctx)?);
                Ok(Value::Boolean(value))
            }
            Expr::And(left, right) => {
                let value = self.boolean(&self.eval(left, ctx)?) && self.boolean(&self.eval(right, ctx)?);
                Ok(Value::Boolean(value))
            }
            Expr::Compare(op, left, right) => {
                let left = self.eval(left, ctx)?;
                let right = self.eval(right, ctx)?;
                Ok(Value::Boolean(self.compare(*op, &left, &right)))
            }
            Expr::Union(left, right) => {
                let (Value::Nodes(mut nodes), Value::Nodes(more)) = (self.eval(left, ctx)?, self.eval(right, ctx)?)
                else {
                    return Err(self.error("`|` operands must be node lists"));
                };
                nodes.extend(more);
                sort_document_order(&mut nodes);
                Ok(Value::Nodes(nodes))
            }
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Literal(text) => Ok(Value::String(text.clone())),
            Expr::Call(function, args) => self.call(*function, args, ctx),
            Expr::Path { start, steps } => {
                let mut nodes = match start {
                    PathStart::Root => vec![XNode::Node(self.tree.root())],
                    PathStart::Context => vec![ctx.node],
                    PathStart::Filter { primary, predicates } => {
                        let Value::Nodes(nodes) = self.eval(primary, ctx)? else {
                            return Err(self.error("only node lists can be filtered"));
                        };
                        let mut nodes = nodes;
                        for predicate in predicates {
                            nodes = self.filter(nodes, predicate)?;
                        }
                        nodes
                    }
                };
                for step in steps {
                    nodes = self.step(step, &nodes)?;
                }
                Ok(Value::Nodes(nodes))
            }
        }
    }

    fn step(&self, step: &Step, input: &[XNode]) -> Result<Vec<XNode>> {
        let mut out = Vec::new();
        for &node in input {
            let mut candidates: Vec<XNode> = self
                .axis(node, step.axis)
                .into_iter()
                .filter(|&candidate| self.matches(candidate, step.axis, &step.test))
                .collect();
            for predicate in &step.predicates {
                candidates = self.filter(candidates, predicate)?;
            }
            out.extend(candidates);
        }
        sort_document_order(&mut out);
        Ok(out)
    }

    fn filter(&self, nodes: Vec<XNode>, predicate: &Expr) -> Result<Vec<XNode>> {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (i, node) in nodes.into_iter().enumerate() {
            let ctx = Context {
                node,
                position: i + 1,
                size,
            };
            let keep = match self.eval(predicate, ctx)? {
                Value::Number(n) => n == (i + 1) as f64,
                other => self.boolean(&other),
            };
            if keep {
                kept.push(node);
            }
        }
        Ok(kept)
    }

    /// Nodes along `axis` from `node`, in proximity order.
    fn axis(&self, node: XNode, axis: Axis) -> Vec<XNode> {
        let tree = self.tree;
        match (axis, node) {
            (Axis::SelfAxis, _) => vec![node],
            (Axis::Attribute, XNode::Node(id)) => (0..tree.attributes(id).len())
                .map(|index| XNode::Attribute { owner: id, index })
                .collect(),
            (Axis::Parent, XNode::Attribute { owner, .. }) => vec![XNode::Node(owner)],
            (Axis::Parent, XNode::Node(id)) => tree.parent(id).map(XNode::Node).into_iter().collect(),
            (Axis::Ancestor | Axis::AncestorOrSelf, _) => {
                let mut out = Vec::new();
                if axis == Axis::AncestorOrSelf {
                    out.push(node);
                }
                let mut current = match node {
                    XNode::Attribute { owner, .. } => Some(owner),
                    XNode::Node(id) => tree.parent(id),
                };
                while let Some(id) = current {
                    out.push(XNode::Node(id));
                    current = tree.parent(id);
                }
                out
            }
            (Axis::Child, XNode::Node(id)) => tree.children(id).iter().copied().map(XNode::Node).collect(),
            (Axis::Descendant | Axis::DescendantOrSelf, XNode::Node(id)) => {
                let mut out = Vec::new();
                if axis == Axis::DescendantOrSelf {
                    out.push(node);
                }
                let mut stack: Vec<usize> = tree.children(id).iter().rev().copied().collect();
                while let Some(next) = stack.pop() {
                    out.push(XNode::Node(next));
                    stack.extend(tree.children(next).iter().rev().copied());
                }
                out
            }
            (Axis::DescendantOrSelf, XNode::Attribute { .. }) => vec![node],
            (Axis::FollowingSibling | Axis::PrecedingSibling, XNode::Node(id)) => {
                let Some(parent) = tree.parent(id) else {
                    return Vec::new();
                };
                let siblings = tree.children(parent);
                let Some(at) = siblings.iter().position(|&s| s == id) else {
                    return Vec::new();
                };
                if axis == Axis::FollowingSibling {
                    siblings[at + 1..].iter().copied().map(XNode::Node).collect()
                } else {
                    siblings[..at].iter().rev().copied().map(XNode::Node).collect()
                }
            }
            _ => Vec::new(),
        }
    }

    fn matches(&self, node: XNode, axis: Axis, test: &NodeTest) -> bool {
        match (node, test) {
            (_, NodeTest::Node) => true,
            (XNode::Attribute { .. }, NodeTest::Any) => axis == Axis::Attribute,
            (XNode::Attribute { owner, index }, NodeTest::Name(name)) => {
                axis == Axis::Attribute
                    && self
                        .tree
                        .attributes(owner)
                        .get(index)
                        .is_some_and(|(attr, _)| attr.eq_ignore_ascii_case(name))
            }
            (XNode::Attribute { .. }, NodeTest::Text) => false,
            (XNode::Node(id), NodeTest::Text) => self.tree.kind(id) == NodeKind::Text,
            (XNode::Node(id), NodeTest::Any) => axis != Axis::Attribute && self.tree.kind(id) == NodeKind::Element,
            (XNode::Node(id), NodeTest::Name(name)) => {
                axis != Axis::Attribute
                    && self.tree.kind(id) == NodeKind::Element
                    && self.tree.name(id).is_some_and(|tag| tag.eq_ignore_ascii_case(name))
            }
        }
    }

    fn call(&self, function: Function, args: &[Expr], ctx: Context) -> Result<Value> {
        let arg = |i: usize| -> Result<Value> {
            match args.get(i) {
                Some(expr) => self.eval(expr, ctx),
                None => Ok(Value::Nodes(vec![ctx.node])),
            }
        };

        Ok(match function {
            Function::Count => match arg(0)? {
                Value::Nodes(nodes) => Value::Number(nodes.len() as f64),
                _ => return Err(self.error("count() requires a node list")),
            },
            Function::Contains => {
                let haystack = self.string(&arg(0)?);
                let needle = self.string(&arg(1)?);
                Value::Boolean(haystack.contains(&needle))
            }
            Function::StartsWith => {
                let haystack = self.string(&arg(0)?);
                let prefix = self.string(&arg(1)?);
                Value::Boolean(haystack.starts_with(&prefix))
            }
            Function::Not => Value::Boolean(!self.boolean(&arg(0)?)),
            Function::NormalizeSpace => {
                let text = self.string(&arg(0)?);
                Value::String(text.split_whitespace().collect::<Vec<_>>().join(" "))
            }
            Function::String => Value::String(self.string(&arg(0)?)),
            Function::StringLength => Value::Number(self.string(&arg(0)?).chars().count() as f64),
            Function::Concat => {
                let mut out = String::new();
                for i in 0..args.len() {
                    out.push_str(&self.string(&arg(i)?));
                }
                Value::String(out)
            }
            Function::Position => Value::Number(ctx.position as f64),
            Function::Last => Value::Number(ctx.size as f64),
            Function::True => Value::Boolean(true),
            Function::False => Value::Boolean(false),
            Function::Boolean => Value::Boolean(self.boolean(&arg(0)?)),
            Function::Number => Value::Number(self.number(&arg(0)?)),
        })
    }

    fn compare(&self, op: CompareOp, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Nodes(a), Value::Nodes(b)) => a.iter().any(|&x| {
                let x = self.tree.string_value(x);
                b.iter().any(|&y| compare_strings(op, &x, &self.tree.string_value(y)))
            }),
            (Value::Nodes(nodes), other) => self.compare_nodes(op, nodes, other, false),
            (other, Value::Nodes(nodes)) => self.compare_nodes(op, nodes, other, true),
            _ => self.compare_scalars(op, left, right),
        }
    }

    fn compare_nodes(&self, op: CompareOp, nodes: &[XNode], other: &Value, swapped: bool) -> bool {
        if let Value::Boolean(_) = other {
            let as_bool = Value::Boolean(!nodes.is_empty());
            return if swapped {
                self.compare_scalars(op, other, &as_bool)
            } else {
                self.compare_scalars(op, &as_bool, other)
            };
        }
        nodes.iter().any(|&node| {
            let value = Value::String(self.tree.string_value(node));
            let value = if matches!(other, Value::Number(_)) {
                Value::Number(self.number(&value))
            } else {
                value
            };
            if swapped {
                self.compare_scalars(op, other, &value)
            } else {
                self.compare_scalars(op, &value, other)
            }
        })
    }

    fn compare_scalars(&self, op: CompareOp, left: &Value, right: &Value) -> bool {
        match op {
            CompareOp::Eq | CompareOp::NotEq => {
                let equal = if matches!(left, Value::Boolean(_)) || matches!(right, Value::Boolean(_)) {
                    self.boolean(left) == self.boolean(right)
                } else if matches!(left, Value::Number(_)) || matches!(right, Value::Number(_)) {
                    self.number(left) == self.number(right)
                } else {
                    self.string(left) == self.string(right)
                };
                (op == CompareOp::Eq) == equal
            }
            _ => compare_numbers(op, self.number(left), self.number(right)),
        }
    }

    fn string(&self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Nodes(nodes) => nodes
                .first()
                .map(|&node| self.tree.string_value(node))
                .unwrap_or_default(),
        }
    }

    fn number(&self, value: &Value) -> f64 {
        match value {
            Value::Number(n) => *n,
            Value::Boolean(b) => f64::from(u8::from(*b)),
            other => self.string(other).trim().parse::<f64>().unwrap_or(f64::NAN),
        }
    }

    fn boolean(&self, value: &Value) -> bool {
        match value {
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Nodes(nodes) => !nodes.is_empty(),
        }
    }
}

fn compare_strings(op: CompareOp, left: &str, right: &str) -> bool {
    match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        _ => compare_numbers(
            op,
            left.trim().parse().unwrap_or(f64::NAN),
            right.trim().parse().unwrap_or(f64::NAN),
        ),
    }
}

fn compare_numbers(op: CompareOp, left: f64, right: f64) -> bool {
    match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        CompareOp::Lt => left < right,
        CompareOp::LtEq => left <= right,
        CompareOp::Gt => left > right,
        CompareOp::GtEq => left >= right,
    }
}

/// Formats a number the way XPath `string()` does.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn document_order(a: &XNode, b: &XNode) -> Ordering {
    a.order_key().cmp(&b.order_key())
}

fn sort_document_order(nodes: &mut Vec<XNode>) {
    nodes.sort_by(document_order);
    nodes.dedup();
}
