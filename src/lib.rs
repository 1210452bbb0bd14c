//! # rs-order-history
//!
//! Structured order records from e-commerce order-history pages.
//!
//! The library reads the HTML of an account's order-history pages and turns
//! loosely structured, versioned markup into typed records: filter years, the
//! order count, order summaries and purchased items.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_order_history::{parse_html, Command, Options, Response, Target};
//!
//! let html = r#"<select id="time-filter">
//!   <option>過去30日間</option><option>2024年</option><option>2023年</option>
//! </select>"#;
//!
//! let response = parse_html(html, &Options::default(), &Command::parse(Target::YearList));
//! match response {
//!     Some(Response::YearList(years)) => assert_eq!(years.list, vec![2024, 2023]),
//!     other => panic!("unexpected response: {other:?}"),
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout fallbacks**: every element is looked up through an ordered
//!   chain of CSS and path-expression locators covering current and legacy
//!   markup
//! - **Page classification**: detail pages are read as shipment-grouped or
//!   digital orders, with site alerts reported instead of internal errors
//! - **Injected collaborators**: extractors run against the [`DocumentQuery`]
//!   port and an [`ExtractLog`] sink, so both can be swapped out in tests
//! - **Command routing**: [`Dispatcher`] answers `{to, type, target}` commands

mod error;
mod options;
mod result;

/// Compiled regex patterns.
pub mod patterns;

/// DOM operations over `dom_query`.
pub mod dom;

/// Path-expression (XPath subset) parsing and evaluation.
pub mod xpath;

/// The document query port and its HTML implementation.
pub mod page;

/// Selector infrastructure and site rules.
pub mod selector;

/// Order-page extractors.
pub mod extractor;

/// Command routing.
pub mod dispatch;

/// Injected logging capability.
pub mod logging;

/// Text and number normalization.
pub mod normalize;

/// URL utilities for validation and resolution.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use dispatch::{Command, CommandError, Dispatcher, Target};
pub use error::{Error, Result};
pub use extractor::Extractor;
pub use logging::{ExtractLog, LogEntry, NoopLog, TracingLog};
pub use options::Options;
pub use page::{DocumentQuery, HtmlPage, PathValue};
pub use result::{Item, OrderCount, OrderDetail, OrderList, OrderSummary, Response, YearList};

/// Parses a page and answers `command` against it.
///
/// Events are logged through `tracing`. Returns `None` when the command is
/// addressed to another listener.
///
/// # Arguments
///
/// * `html` - The page HTML
/// * `options` - Page URL and site labels
/// * `command` - The routing envelope
///
/// # Example
///
/// ```rust
/// use rs_order_history::{parse_html, Command, Options, Response};
///
/// let html = r#"<span class="num-orders">1,234件</span>"#;
/// let command = Command {
///     to: "content".into(),
///     kind: "parse".into(),
///     target: "order_count".into(),
/// };
/// let response = parse_html(html, &Options::default(), &command).unwrap();
/// assert_eq!(response.to_json().unwrap(), r#"{"count":1234}"#);
/// ```
#[must_use]
pub fn parse_html(html: &str, options: &Options, command: &Command) -> Option<Response> {
    parse_html_with_log(html, options, command, &TracingLog)
}

/// Like [`parse_html`], logging to `log` instead of `tracing`.
#[must_use]
pub fn parse_html_with_log(
    html: &str,
    options: &Options,
    command: &Command,
    log: &dyn ExtractLog,
) -> Option<Response> {
    let doc = dom::parse(html);
    let page = HtmlPage::new(&doc, options.page_url.as_deref());
    Dispatcher::new(&page, options, log).dispatch(command)
}

/// Parses page bytes with automatic encoding detection and answers `command`.
///
/// The charset is taken from a byte-order mark or a `<meta>` declaration and
/// defaults to UTF-8. Invalid sequences are replaced with U+FFFD.
///
/// # Example
///
/// ```rust
/// use rs_order_history::{parse_bytes, Command, Options, Target};
///
/// // Shift_JIS: "3件"
/// let html = b"<meta charset=\"Shift_JIS\"><span class=\"num-orders\">3\x8c\x8f</span>";
/// let response = parse_bytes(html, &Options::default(), &Command::parse(Target::OrderCount));
/// assert_eq!(response.unwrap().to_json().unwrap(), r#"{"count":3}"#);
/// ```
#[must_use]
pub fn parse_bytes(html: &[u8], options: &Options, command: &Command) -> Option<Response> {
    parse_html(&encoding::decode_html(html), options, command)
}
