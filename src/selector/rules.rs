//! Site selector rules.
//!
//! Chains are ordered newest layout first. Adding support for a new layout
//! revision means adding a locator at the front of the relevant chain.

use super::Locator::{self, AnchorScan, Css, LabelPath, Path};

// =============================================================================
// Order-history list page
// =============================================================================

/// The year filter `<select>`.
pub const YEAR_FILTER: &[Locator] = &[Css("#time-filter"), Css("#orderFilter")];

/// Options inside the year filter.
pub const YEAR_OPTION: &str = "option";

/// The "N件" order count badge.
pub const ORDER_COUNT: &[Locator] = &[
    Css(".num-orders"),
    Path(r#"//label[@for="orderFilter"]//span[contains(@class, "num-orders")]"#),
    Path(r#"//label[@for="time-filter"]//span[contains(@class, "num-orders")]"#),
];

/// Unit suffix of the order count badge.
pub const ORDER_COUNT_SUFFIX: char = '件';

/// One card per order.
pub const ORDER_CARD: &[Locator] = &[
    Css(".js-order-card"),
    Css("div.order"),
    Path(r#"//div[contains(@class, " order ")]"#),
];

/// Order date, searched within a card.
pub const ORDER_DATE: &[Locator] = &[
    Css(".order-info .value"),
    Css(".a-col-left .a-span3 .a-row:last-child .a-color-secondary"),
    Path(r#".//div[contains(@class, "order-info")]//span[contains(@class, "value")]"#),
];

/// Link to the order detail page, searched within a card.
pub const DETAIL_LINK: &[Locator] = &[
    Css(r#"a[href*="order-details"]"#),
    AnchorScan {
        href_contains: "order-details",
    },
    LabelPath {
        href_contains: "order-details",
    },
];

/// "Next page" link, checked with CSS.
pub const NEXT_PAGE_LINK: &str = "ul.a-pagination li.a-last a";

/// "Next page" link, counted with a path expression.
pub const NEXT_PAGE_LINK_COUNT: &str = r#"count(//ul[contains(@class, "a-pagination")]/li[contains(@class, "a-last")]/a)"#;

// =============================================================================
// Order detail page
// =============================================================================

/// One box per shipment on physical orders.
pub const SHIPMENT_BOX: &str = r#"//div[contains(@class, "a-box shipment")]"#;

/// Any content box; digital orders have no shipment grouping.
pub const CONTENT_BOX: &str = r#"//div[contains(@class, "a-box")]"#;

/// One block per purchased item, relative to a box path.
pub const ITEM_BLOCK: &str = r#"//div[contains(@class, "a-fixed-left-grid a-spacing-")]"#;

/// Product link, relative to an item block path.
pub const ITEM_LINK: &str = r#"//div[contains(@class, "a-col-right")]//a[contains(@class, "a-link-normal")]"#;

/// Price label, relative to an item block path.
pub const ITEM_PRICE: &str = r#"//div[contains(@class, "a-row")]/span[contains(@class, "a-color-price")]"#;

/// Product image, relative to an item block path.
pub const ITEM_IMAGE: &str = r#"//div[contains(@class, "item-view-left-col-inner")]//img"#;

/// Quantity badge over the image, relative to an item block path.
pub const ITEM_QUANTITY: &str =
    r#"//div[contains(@class, "item-view-left-col-inner")]//span[contains(@class, "item-view-qty")]"#;

/// Alert shown by the site when the page cannot display the order.
pub const ALERT_HEADING: &str = r#"//h4[contains(@class, "a-alert-heading")]"#;

/// Seller label, relative to an item block path.
#[must_use]
pub fn item_seller(label: &str) -> String {
    format!(
        r#"//div[contains(@class, "a-row")]/span[contains(@class, "a-size-small") and contains(text(), {})]"#,
        literal(label)
    )
}

/// Anchors under the context node labelled with any of `labels`, or whose
/// `href` contains `href_contains`.
#[must_use]
pub fn detail_link(labels: &[String], href_contains: &str) -> String {
    let mut tests: Vec<String> = labels
        .iter()
        .map(|label| format!("contains(text(), {})", literal(label)))
        .collect();
    tests.push(format!("contains(@href, {})", literal(href_contains)));
    format!(".//a[{}]", tests.join(" or "))
}

/// `count(path)`.
#[must_use]
pub fn count(path: &str) -> String {
    format!("count({path})")
}

/// The `n`-th (1-based) node of `path` in document order.
///
/// Plain `path[n]` would pick the `n`-th child of each parent instead, which
/// disagrees with `count(path)` whenever matches are nested at different
/// depths.
#[must_use]
pub fn nth(path: &str, n: usize) -> String {
    format!("({path})[{n}]")
}

/// Quote `text` as a path-expression string literal.
fn literal(text: &str) -> String {
    if text.contains('"') {
        format!("'{text}'")
    } else {
        format!("\"{text}\"")
    }
}
