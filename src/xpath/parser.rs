//! Recursive-descent parser producing the expression tree.
//!
//! Grammar (XPath 1.0 subset, no arithmetic):
//!
//! ```text
//! Expr       := OrExpr
//! OrExpr     := AndExpr ('or' AndExpr)*
//! AndExpr    := CmpExpr ('and' CmpExpr)*
//! CmpExpr    := UnionExpr (CmpOp UnionExpr)*
//! UnionExpr  := PathExpr ('|' PathExpr)*
//! PathExpr   := LocationPath | FilterExpr (('/' | '//') RelativePath)?
//! FilterExpr := Primary Predicate*
//! Primary    := '(' Expr ')' | Literal | Number | FunctionCall
//! ```

use super::lexer::{tokenize, Token};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    SelfAxis,
    Parent,
    Ancestor,
    AncestorOrSelf,
    Attribute,
    FollowingSibling,
    PrecedingSibling,
}

impl Axis {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "child" => Self::Child,
            "descendant" => Self::Descendant,
            "descendant-or-self" => Self::DescendantOrSelf,
            "self" => Self::SelfAxis,
            "parent" => Self::Parent,
            "ancestor" => Self::Ancestor,
            "ancestor-or-self" => Self::AncestorOrSelf,
            "attribute" => Self::Attribute,
            "following-sibling" => Self::FollowingSibling,
            "preceding-sibling" => Self::PrecedingSibling,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeTest {
    /// Element (or attribute, on the attribute axis) with this lowercase name.
    Name(String),
    /// `*`
    Any,
    /// `text()`
    Text,
    /// `node()`
    Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    Count,
    Contains,
    StartsWith,
    Not,
    NormalizeSpace,
    String,
    StringLength,
    Concat,
    Position,
    Last,
    True,
    False,
    Boolean,
    Number,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "count" => Self::Count,
            "contains" => Self::Contains,
            "starts-with" => Self::StartsWith,
            "not" => Self::Not,
            "normalize-space" => Self::NormalizeSpace,
            "string" => Self::String,
            "string-length" => Self::StringLength,
            "concat" => Self::Concat,
            "position" => Self::Position,
            "last" => Self::Last,
            "true" => Self::True,
            "false" => Self::False,
            "boolean" => Self::Boolean,
            "number" => Self::Number,
            _ => return None,
        })
    }

    /// Accepted argument counts as `(min, max)`; `None` means unbounded.
    fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Position | Self::Last | Self::True | Self::False => (0, Some(0)),
            Self::Count | Self::Not | Self::Boolean => (1, Some(1)),
            Self::NormalizeSpace | Self::String | Self::StringLength | Self::Number => (0, Some(1)),
            Self::Contains | Self::StartsWith => (2, Some(2)),
            Self::Concat => (2, None),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Expr>,
}

impl Step {
    fn descendant_or_self() -> Self {
        Self {
            axis: Axis::DescendantOrSelf,
            test: NodeTest::Node,
            predicates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PathStart {
    /// The document root (`/...`).
    Root,
    /// The context node (relative path).
    Context,
    /// A filtered primary expression (`(expr)[n]/...`).
    Filter {
        primary: Box<Expr>,
        predicates: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    Union(Box<Expr>, Box<Expr>),
    Number(f64),
    Literal(String),
    Call(Function, Vec<Expr>),
    Path { start: PathStart, steps: Vec<Step> },
}

/// Parses a complete expression.
pub(crate) fn parse(expression: &str) -> Result<Expr> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(Error::invalid_expression(expression, "empty expression"));
    }

    let mut parser = Parser {
        source: expression,
        tokens,
        pos: 0,
    };
    let expr = parser.parse_or()?;
    if let Some(token) = parser.peek() {
        return Err(parser.error(format!("unexpected trailing token {token:?}")));
    }
    Ok(expr)
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected {expected:?}, found {:?}", self.peek())))
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Name(name)) if name == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::invalid_expression(self.source, reason)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_compare()?;
        while self.eat_keyword("and") {
            let right = self.parse_compare()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_compare(&mut self) -> Result<Expr> {
        let mut left = self.parse_union()?;
        loop {
            let op = match self.peek() {
                Some(Token::Eq) => CompareOp::Eq,
                Some(Token::NotEq) => CompareOp::NotEq,
                Some(Token::Lt) => CompareOp::Lt,
                Some(Token::LtEq) => CompareOp::LtEq,
                Some(Token::Gt) => CompareOp::Gt,
                Some(Token::GtEq) => CompareOp::GtEq,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_union()?;
            left = Expr::Compare(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_union(&mut self) -> Result<Expr> {
        let mut left = self.parse_path()?;
        while self.eat(&Token::Pipe) {
            let right = self.parse_path()?;
            left = Expr::Union(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_path(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Slash) => {
                self.pos += 1;
                let steps = if self.starts_step() {
                    self.parse_relative(Vec::new())?
                } else {
                    Vec::new()
                };
                Ok(Expr::Path {
                    start: PathStart::Root,
                    steps,
                })
            }
            Some(Token::DoubleSlash) => {
                self.pos += 1;
                let steps = self.parse_relative(vec![Step::descendant_or_self()])?;
                Ok(Expr::Path {
                    start: PathStart::Root,
                    steps,
                })
            }
            Some(Token::LParen | Token::Literal(_) | Token::Number(_)) => self.parse_filter(),
            Some(Token::Name(name))
                if self.peek_at(1) == Some(&Token::LParen) && name != "text" && name != "node" =>
            {
                self.parse_filter()
            }
            _ => {
                let steps = self.parse_relative(Vec::new())?;
                Ok(Expr::Path {
                    start: PathStart::Context,
                    steps,
                })
            }
        }
    }

    fn parse_filter(&mut self) -> Result<Expr> {
        let primary = self.parse_primary()?;
        let predicates = self.parse_predicates()?;

        let steps = match self.peek() {
            Some(Token::Slash) => {
                self.pos += 1;
                self.parse_relative(Vec::new())?
            }
            Some(Token::DoubleSlash) => {
                self.pos += 1;
                self.parse_relative(vec![Step::descendant_or_self()])?
            }
            _ => Vec::new(),
        };

        if predicates.is_empty() && steps.is_empty() {
            return Ok(primary);
        }
        Ok(Expr::Path {
            start: PathStart::Filter {
                primary: Box::new(primary),
                predicates,
            },
            steps,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.advance() {
            Some(Token::LParen) => {
                let expr = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Literal(text)) => Ok(Expr::Literal(text)),
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Name(name)) => {
                let function = Function::from_name(&name)
                    .ok_or_else(|| self.error(format!("unknown function `{name}`")))?;
                self.expect(&Token::LParen)?;
                let mut args = Vec::new();
                if !self.eat(&Token::RParen) {
                    loop {
                        args.push(self.parse_or()?);
                        if self.eat(&Token::RParen) {
                            break;
                        }
                        self.expect(&Token::Comma)?;
                    }
                }
                let (min, max) = function.arity();
                if args.len() < min || max.is_some_and(|max| args.len() > max) {
                    return Err(self.error(format!(
                        "`{name}` called with {} argument(s)",
                        args.len()
                    )));
                }
                Ok(Expr::Call(function, args))
            }
            other => Err(self.error(format!("unexpected token {other:?}"))),
        }
    }

    fn starts_step(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Dot | Token::DotDot | Token::At | Token::Star | Token::Name(_))
        )
    }

    fn parse_relative(&mut self, mut steps: Vec<Step>) -> Result<Vec<Step>> {
        loop {
            steps.push(self.parse_step()?);
            match self.peek() {
                Some(Token::Slash) => self.pos += 1,
                Some(Token::DoubleSlash) => {
                    self.pos += 1;
                    steps.push(Step::descendant_or_self());
                }
                _ => return Ok(steps),
            }
        }
    }

    fn parse_step(&mut self) -> Result<Step> {
        if self.eat(&Token::Dot) {
            return Ok(Step {
                axis: Axis::SelfAxis,
                test: NodeTest::Node,
                predicates: Vec::new(),
            });
        }
        if self.eat(&Token::DotDot) {
            return Ok(Step {
                axis: Axis::Parent,
                test: NodeTest::Node,
                predicates: Vec::new(),
            });
        }

        let axis = if self.eat(&Token::At) {
            Axis::Attribute
        } else if let (Some(Token::Name(name)), Some(Token::ColonColon)) = (self.peek(), self.peek_at(1)) {
            let axis = Axis::from_name(name).ok_or_else(|| self.error(format!("unknown axis `{name}`")))?;
            self.pos += 2;
            axis
        } else {
            Axis::Child
        };

        let test = match self.advance() {
            Some(Token::Star) => NodeTest::Any,
            Some(Token::Name(name)) => {
                if (name == "text" || name == "node") && self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    self.expect(&Token::RParen)?;
                    if name == "text" {
                        NodeTest::Text
                    } else {
                        NodeTest::Node
                    }
                } else {
                    NodeTest::Name(name.to_ascii_lowercase())
                }
            }
            other => return Err(self.error(format!("expected a node test, found {other:?}"))),
        };

        let predicates = self.parse_predicates()?;
        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_predicates(&mut self) -> Result<Vec<Expr>> {
        let mut predicates = Vec::new();
        while self.eat(&Token::LBracket) {
            predicates.push(self.parse_or()?);
            self.expect(&Token::RBracket)?;
        }
        Ok(predicates)
    }
}
