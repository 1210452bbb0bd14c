//! Order-page extractors.
//!
//! [`Extractor`] bundles the three things every extraction needs (the page,
//! the options and a log sink) and exposes one method per page kind:
//!
//! - [`Extractor::year_list`]: years offered by the year filter
//! - [`Extractor::order_count`]: the order count badge
//! - [`Extractor::order_list`]: order cards and the last-page flag
//! - [`Extractor::order_detail`]: items of one order
//!
//! Each call reads the page afresh; nothing is cached between calls.

use crate::logging::ExtractLog;
use crate::options::Options;
use crate::page::DocumentQuery;

mod item;
mod order_count;
mod order_detail;
mod order_list;
mod year_list;

/// Extraction entry point over one page.
///
/// # Example
///
/// ```rust
/// use rs_order_history::dom;
/// use rs_order_history::logging::NoopLog;
/// use rs_order_history::page::HtmlPage;
/// use rs_order_history::{Extractor, Options};
///
/// let doc = dom::parse(r#"<span class="num-orders">12件</span>"#);
/// let page = HtmlPage::new(&doc, None);
/// let options = Options::default();
///
/// let extractor = Extractor::new(&page, &options, &NoopLog);
/// assert_eq!(extractor.order_count().count, Some(12));
/// ```
pub struct Extractor<'a, Q: DocumentQuery + ?Sized> {
    page: &'a Q,
    options: &'a Options,
    log: &'a dyn ExtractLog,
}

impl<'a, Q: DocumentQuery + ?Sized> Extractor<'a, Q> {
    /// Create an extractor over `page`.
    #[must_use]
    pub fn new(page: &'a Q, options: &'a Options, log: &'a dyn ExtractLog) -> Self {
        Self { page, options, log }
    }

    /// The log sink.
    #[must_use]
    pub fn log(&self) -> &'a dyn ExtractLog {
        self.log
    }
}
