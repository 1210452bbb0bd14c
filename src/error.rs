//! Error types for rs-order-history.
//!
//! This module defines the errors raised while querying a page and while
//! extracting item records. Year-list, order-count and order-list extraction
//! never surface these to the caller; detail extraction converts them into
//! a failure message at a single boundary.

/// Error type for query and extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A path expression could not be parsed or evaluated.
    #[error("invalid path expression `{expression}`: {reason}")]
    InvalidExpression {
        /// The offending expression.
        expression: String,
        /// What went wrong.
        reason: String,
    },

    /// A path expression evaluated to a different kind of value than required.
    #[error("path expression `{expression}` did not yield {expected}")]
    UnexpectedValue {
        /// The evaluated expression.
        expression: String,
        /// The expected value kind ("a node list", "a number").
        expected: &'static str,
    },

    /// A structurally required element was absent.
    #[error("{what} not found at `{path}`")]
    MissingElement {
        /// Human-readable element description.
        what: &'static str,
        /// The path that was queried.
        path: String,
    },

    /// Text did not match the pattern it is required to match.
    #[error("{what} `{text}` does not match the expected pattern")]
    PatternMismatch {
        /// Human-readable field description.
        what: &'static str,
        /// The text that failed to match.
        text: String,
    },

    /// Text did not hold a usable integer.
    #[error("{what} `{text}` is not a valid number")]
    InvalidNumber {
        /// Human-readable field description.
        what: &'static str,
        /// The text that failed to parse.
        text: String,
    },

    /// Unit price multiplied by quantity does not fit.
    #[error("price {price} x {quantity} overflows")]
    PriceOverflow {
        /// Unit price.
        price: u64,
        /// Quantity.
        quantity: u64,
    },

    /// A label pattern built from configuration failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl Error {
    pub(crate) fn invalid_expression(expression: &str, reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for query and extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
