//! Result types for extraction output.
//!
//! Every record serializes to the JSON shape the extension messaging layer
//! already consumes, so a [`Response`] can be handed to the transport as-is.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::parse_order_date;

/// Years offered by the order-history year filter, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearList {
    /// Years between the configured bounds; duplicates are kept.
    pub list: Vec<u16>,
}

/// Number of orders shown in the count badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCount {
    /// `Some(0)` when no badge was found (indistinguishable from a real
    /// zero). `None` when a badge was found but its text has no number;
    /// serialized as `null`.
    pub count: Option<u64>,
}

/// One order card on a list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Order date, loosely normalized (`2024/3/5` for Japanese pages).
    pub date: String,

    /// Absolute URL of the order's detail page.
    pub url: String,
}

impl OrderSummary {
    /// The date as a calendar date, when it is in a recognizable format.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_order_date(&self.date)
    }
}

/// Orders on one list page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderList {
    /// Orders in page order; cards missing a date or link are skipped.
    pub list: Vec<OrderSummary>,

    /// `true` when the pagination has no "next page" link.
    pub is_last: bool,
}

/// One purchased item on a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Product title.
    pub name: String,

    /// Absolute product URL.
    pub url: String,

    /// Product id taken from the `/gp/product/<ASIN>/` segment of `url`.
    pub asin: String,

    /// Units bought (1 when the page shows no quantity).
    pub quantity: u64,

    /// Unit price multiplied by `quantity`.
    pub price: u64,

    /// Seller name.
    pub seller: String,

    /// Product image URL; the key is omitted when the image has no source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
}

/// Outcome of parsing a detail page.
///
/// The Rust type is an explicit success/failure tag. The JSON form keeps
/// the shape the messaging layer expects: `{"list": [...]}` on success and
/// a bare string on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderDetail {
    /// Items in (shipment, item) document order.
    Success {
        /// Extracted items.
        list: Vec<Item>,
    },
    /// Human-readable failure; prefixed with the site-message tag when the
    /// page itself showed an alert.
    Failure(String),
}

impl OrderDetail {
    /// Whether extraction succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Extracted items; empty on failure.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Success { list } => list,
            Self::Failure(_) => &[],
        }
    }

    /// Failure message, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(message) => Some(message),
        }
    }
}

/// Reply to a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// `target: "year_list"`
    YearList(YearList),
    /// `target: "order_count"`
    OrderCount(OrderCount),
    /// `target: "list"`
    OrderList(OrderList),
    /// `target: "detail"`
    OrderDetail(OrderDetail),
    /// `"ERROR: ..."` for commands this module does not understand.
    Error(String),
}

impl Response {
    /// JSON text of the response.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error; in practice these types always serialize.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item() -> Item {
        Item {
            name: "USB cable".into(),
            url: "https://www.amazon.co.jp/gp/product/B0TEST0001/".into(),
            asin: "B0TEST0001".into(),
            quantity: 2,
            price: 1000,
            seller: "Amazon".into(),
            img_url: None,
        }
    }

    #[test]
    fn test_detail_success_serializes_as_object() {
        let detail = OrderDetail::Success { list: vec![item()] };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["list"][0]["asin"], json!("B0TEST0001"));
        assert!(value["list"][0].get("img_url").is_none());
    }

    #[test]
    fn test_detail_failure_serializes_as_plain_string() {
        let detail = OrderDetail::Failure("[amazon]ご注意".into());
        assert_eq!(serde_json::to_string(&detail).unwrap(), r#""[amazon]ご注意""#);
        assert_eq!(detail.failure(), Some("[amazon]ご注意"));
        assert!(detail.items().is_empty());
    }

    #[test]
    fn test_detail_round_trips_through_json() {
        let detail: OrderDetail = serde_json::from_str(r#""oops""#).unwrap();
        assert!(!detail.is_success());
    }

    #[test]
    fn test_response_shapes() {
        let count = Response::OrderCount(OrderCount { count: None });
        assert_eq!(count.to_json().unwrap(), r#"{"count":null}"#);

        let list = Response::OrderList(OrderList {
            list: vec![OrderSummary {
                date: "2024/3/5".into(),
                url: "https://www.amazon.co.jp/gp/css/order-details?orderID=1".into(),
            }],
            is_last: true,
        });
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["is_last"], json!(true));
        assert_eq!(value["list"][0]["date"], json!("2024/3/5"));

        let error = Response::Error("ERROR: Unknown cmd target".into());
        assert_eq!(error.to_json().unwrap(), r#""ERROR: Unknown cmd target""#);
    }

    #[test]
    fn test_summary_parsed_date() {
        let summary = OrderSummary {
            date: "2024/3/5".into(),
            url: String::new(),
        };
        assert_eq!(summary.parsed_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }
}
