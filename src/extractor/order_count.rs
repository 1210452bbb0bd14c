use crate::normalize::{parse_int_prefix, strip_thousands};
use crate::page::DocumentQuery;
use crate::result::OrderCount;
use crate::selector::{self, rules};

use super::Extractor;

impl<Q: DocumentQuery + ?Sized> Extractor<'_, Q> {
    /// Number shown in the order count badge.
    ///
    /// `Some(0)` when no badge is found. `None` when the badge text holds no
    /// number.
    #[must_use]
    pub fn order_count(&self) -> OrderCount {
        let Some(badge) = selector::resolve_first(self.page, None, rules::ORDER_COUNT, self.options, self.log)
        else {
            self.log.error("Order count element not found");
            return OrderCount { count: Some(0) };
        };

        let text = self.page.inner_text(badge);
        let digits = strip_thousands(&text.replace(rules::ORDER_COUNT_SUFFIX, ""));
        let count = parse_int_prefix(&digits).and_then(|n| u64::try_from(n).ok());
        if count.is_none() {
            self.log.warn(format!("Order count `{text}` is not a number"));
        }

        OrderCount { count }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom;
    use crate::logging::{MemoryLog, NoopLog};
    use crate::page::HtmlPage;
    use crate::{Extractor, Options};
    use tracing::Level;

    fn count(html: &str) -> Option<u64> {
        let doc = dom::parse(html);
        let page = HtmlPage::new(&doc, None);
        let options = Options::default();
        Extractor::new(&page, &options, &NoopLog).order_count().count
    }

    #[test]
    fn test_badge_with_separators_and_suffix() {
        assert_eq!(count(r#"<span class="num-orders">1,234件</span>"#), Some(1234));
        assert_eq!(count(r#"<span class="num-orders"> 12，345件 </span>"#), Some(12345));
    }

    #[test]
    fn test_label_fallbacks() {
        // No element carries the exact `num-orders` class, so only the label paths match.
        let legacy = r#"<label for="orderFilter"><span class="a-text-bold">過去3か月</span>
                        <span class="num-orders-legacy">7件</span></label>"#;
        assert_eq!(count(legacy), Some(7));

        let modern = r#"<label for="time-filter"><span class="badge-num-orders">25件</span></label>"#;
        assert_eq!(count(modern), Some(25));
    }

    #[test]
    fn test_missing_badge_is_zero() {
        let doc = dom::parse("<div></div>");
        let page = HtmlPage::new(&doc, None);
        let options = Options::default();
        let memory = MemoryLog::new();
        assert_eq!(Extractor::new(&page, &options, &memory).order_count().count, Some(0));
        assert_eq!(memory.messages(Level::ERROR), vec!["Order count element not found"]);
    }

    #[test]
    fn test_unparseable_badge_is_none() {
        assert_eq!(count(r#"<span class="num-orders">件</span>"#), None);
    }
}
