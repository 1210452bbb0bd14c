//! Configuration options for order-page extraction.
//!
//! The `Options` struct carries the page address and the localized labels
//! the extractors look for. Defaults target the Japanese storefront.

/// Configuration options for extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the Japanese storefront or [`Options::english`] for English pages.
///
/// # Example
///
/// ```rust
/// use rs_order_history::Options;
///
/// let options = Options {
///     page_url: Some("https://www.amazon.co.jp/gp/your-account/order-history".into()),
///     ..Options::default()
/// };
/// assert_eq!(options.seller_label, "販売:");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Address the page was loaded from, used to resolve relative links.
    ///
    /// A `<base href>` inside the page takes precedence.
    ///
    /// Default: `None`
    pub page_url: Option<String>,

    /// Smallest year accepted from the year filter.
    ///
    /// Default: `1900`
    pub min_year: u16,

    /// Largest year accepted from the year filter.
    ///
    /// Default: `2100`
    pub max_year: u16,

    /// Label preceding the seller name on detail pages.
    ///
    /// Default: `"販売:"`
    pub seller_label: String,

    /// Anchor texts that identify an order's detail link on list pages.
    ///
    /// Default: `["注文内容を表示", "View order details"]`
    pub detail_link_labels: Vec<String>,

    /// Prefix marking a failure message that the site itself displayed.
    ///
    /// Default: `"[amazon]"`
    pub site_message_tag: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            page_url: None,
            min_year: 1900,
            max_year: 2100,
            seller_label: "販売:".to_string(),
            detail_link_labels: vec!["注文内容を表示".to_string(), "View order details".to_string()],
            site_message_tag: "[amazon]".to_string(),
        }
    }
}

impl Options {
    /// Labels for the English storefront.
    #[must_use]
    pub fn english() -> Self {
        Self {
            seller_label: "Sold by:".to_string(),
            ..Self::default()
        }
    }

    /// Set [`Options::page_url`].
    #[must_use]
    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    /// Whether `year` is inside the accepted range.
    #[must_use]
    pub fn accepts_year(&self, year: u16) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}
