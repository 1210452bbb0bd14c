use rs_order_history::logging::MemoryLog;
use rs_order_history::{dom, Extractor, HtmlPage, NoopLog, Options};
use tracing::Level;

fn count(html: &str) -> Option<u64> {
    let doc = dom::parse(html);
    let page = HtmlPage::new(&doc, None);
    let options = Options::default();
    Extractor::new(&page, &options, &NoopLog).order_count().count
}

/// "1,234件" is read as 1234
#[test]
fn thousands_separator_and_suffix() {
    let html = r#"
        <label for="time-filter" class="a-native-dropdown">
          <span class="num-orders">1,234件</span>の注文
        </label>"#;
    assert_eq!(count(html), Some(1234));
}

/// The direct badge wins over the label paths
#[test]
fn direct_badge_first() {
    let html = r#"
        <span class="num-orders">5件</span>
        <label for="orderFilter"><span class="a-num-orders">9件</span></label>"#;
    assert_eq!(count(html), Some(5));
}

/// The `orderFilter` label is tried before the `time-filter` label
#[test]
fn legacy_label_before_modern_label() {
    let html = r#"
        <label for="time-filter"><span class="x-num-orders">2件</span></label>
        <label for="orderFilter"><span class="x-num-orders">8件</span></label>"#;
    assert_eq!(count(html), Some(8));
}

/// No badge answers 0 and logs an error
#[test]
fn missing_badge_is_zero() {
    let doc = dom::parse(r#"<div class="your-orders-content-container"></div>"#);
    let page = HtmlPage::new(&doc, None);
    let options = Options::default();
    let memory = MemoryLog::new();

    let result = Extractor::new(&page, &options, &memory).order_count();

    assert_eq!(result.count, Some(0));
    assert_eq!(memory.messages(Level::ERROR), vec!["Order count element not found"]);
}

/// A badge without digits serializes as null
#[test]
fn non_numeric_badge_is_null() {
    let doc = dom::parse(r#"<span class="num-orders">多数</span>"#);
    let page = HtmlPage::new(&doc, None);
    let options = Options::default();
    let result = Extractor::new(&page, &options, &NoopLog).order_count();

    assert_eq!(result.count, None);
    assert_eq!(serde_json::to_string(&result).expect("serialize"), r#"{"count":null}"#);
}
