//! Tokenizer for path expressions.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Slash,
    DoubleSlash,
    LBracket,
    RBracket,
    LParen,
    RParen,
    At,
    Comma,
    Pipe,
    Dot,
    DotDot,
    ColonColon,
    Star,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Number(f64),
    Literal(String),
    Name(String),
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Splits an expression into tokens.
///
/// Whitespace between tokens is ignored. String literals may be quoted with
/// either `"` or `'` and have no escape syntax.
pub(crate) fn tokenize(expression: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expression.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '/' => {
                if chars.next_if(|&(_, n)| n == '/').is_some() {
                    Token::DoubleSlash
                } else {
                    Token::Slash
                }
            }
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '@' => Token::At,
            ',' => Token::Comma,
            '|' => Token::Pipe,
            '*' => Token::Star,
            '=' => Token::Eq,
            '!' => {
                if chars.next_if(|&(_, n)| n == '=').is_some() {
                    Token::NotEq
                } else {
                    return Err(Error::invalid_expression(expression, format!("stray `!` at {start}")));
                }
            }
            '<' => {
                if chars.next_if(|&(_, n)| n == '=').is_some() {
                    Token::LtEq
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if chars.next_if(|&(_, n)| n == '=').is_some() {
                    Token::GtEq
                } else {
                    Token::Gt
                }
            }
            ':' => {
                if chars.next_if(|&(_, n)| n == ':').is_some() {
                    Token::ColonColon
                } else {
                    return Err(Error::invalid_expression(expression, format!("stray `:` at {start}")));
                }
            }
            '"' | '\'' => {
                let quote = c;
                let mut literal = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == quote {
                        closed = true;
                        break;
                    }
                    literal.push(n);
                }
                if !closed {
                    return Err(Error::invalid_expression(
                        expression,
                        format!("unterminated literal starting at {start}"),
                    ));
                }
                Token::Literal(literal)
            }
            '.' => {
                if chars.next_if(|&(_, n)| n == '.').is_some() {
                    Token::DotDot
                } else if chars.peek().is_some_and(|&(_, n)| n.is_ascii_digit()) {
                    let mut text = String::from("0.");
                    while let Some((_, d)) = chars.next_if(|&(_, n)| n.is_ascii_digit()) {
                        text.push(d);
                    }
                    Token::Number(parse_number(expression, &text)?)
                } else {
                    Token::Dot
                }
            }
            c if c.is_ascii_digit() => {
                let mut text = String::from(c);
                while let Some((_, d)) = chars.next_if(|&(_, n)| n.is_ascii_digit() || n == '.') {
                    text.push(d);
                }
                Token::Number(parse_number(expression, &text)?)
            }
            c if is_name_start(c) => {
                let mut name = String::from(c);
                while let Some((_, n)) = chars.next_if(|&(_, n)| is_name_char(n)) {
                    name.push(n);
                }
                Token::Name(name)
            }
            other => {
                return Err(Error::invalid_expression(
                    expression,
                    format!("unexpected character `{other}` at {start}"),
                ));
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn parse_number(expression: &str, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| Error::invalid_expression(expression, format!("bad number `{text}`")))
}
