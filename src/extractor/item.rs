use crate::error::{Error, Result};
use crate::normalize::{parse_int_prefix, strip_thousands};
use crate::page::DocumentQuery;
use crate::patterns;
use crate::result::Item;
use crate::selector::rules;

use super::Extractor;

impl<Q: DocumentQuery + ?Sized> Extractor<'_, Q> {
    /// Extract the item whose block is selected by the path `prefix`.
    ///
    /// Link, price, seller and image are required. The quantity badge is
    /// optional; when present the returned price is the unit price times
    /// the quantity.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingElement`] if a required element is absent
    /// - [`Error::PatternMismatch`] if the link is not a `/gp/product/` URL,
    ///   the price has no digits or the seller label has nothing after it
    /// - [`Error::InvalidNumber`] if the quantity is not a positive number
    /// - [`Error::PriceOverflow`] if price times quantity overflows
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_order_history::dom;
    /// use rs_order_history::logging::NoopLog;
    /// use rs_order_history::page::HtmlPage;
    /// use rs_order_history::{Extractor, Options};
    ///
    /// let doc = dom::parse(r#"
    ///   <div class="a-fixed-left-grid a-spacing-none">
    ///     <div class="item-view-left-col-inner"><img src="/i/a.jpg"></div>
    ///     <div class="a-col-right">
    ///       <div class="a-row"><a class="a-link-normal" href="/gp/product/B0TEST0001/">Cable</a></div>
    ///       <div class="a-row"><span class="a-size-small">販売: Amazon</span></div>
    ///       <div class="a-row"><span class="a-color-price">￥980</span></div>
    ///     </div>
    ///   </div>"#);
    /// let page = HtmlPage::new(&doc, Some("https://www.amazon.co.jp/"));
    /// let options = Options::default();
    ///
    /// let item = Extractor::new(&page, &options, &NoopLog)
    ///     .item(r#"(//div[contains(@class, "a-fixed-left-grid")])[1]"#)?;
    /// assert_eq!(item.asin, "B0TEST0001");
    /// assert_eq!((item.quantity, item.price), (1, 980));
    /// # Ok::<(), rs_order_history::Error>(())
    /// ```
    pub fn item(&self, prefix: &str) -> Result<Item> {
        let link = self.required(prefix, rules::ITEM_LINK, "item link")?;
        let name = self.page.inner_text(link);
        let url = self.page.href(link).unwrap_or_default();
        let asin = patterns::PRODUCT_ASIN.captures(&url).map(|caps| caps[1].to_string());
        let Some(asin) = asin else {
            return Err(Error::PatternMismatch { what: "item url", text: url });
        };

        let price_text = self.page.inner_text(self.required(prefix, rules::ITEM_PRICE, "price")?);
        let unit_price = parse_price(&price_text)?;

        let seller_path = rules::item_seller(&self.options.seller_label);
        let seller_text = self.page.inner_text(self.required(prefix, &seller_path, "seller")?);
        let seller_pattern = patterns::seller_pattern(&self.options.seller_label)?;
        let seller = seller_pattern.captures(&seller_text).map(|caps| caps[1].trim().to_string());
        let Some(seller) = seller else {
            return Err(Error::PatternMismatch {
                what: "seller",
                text: seller_text,
            });
        };

        let image = self.required(prefix, rules::ITEM_IMAGE, "item image")?;
        let img_url = self.page.current_src(image);

        let quantity_path = format!("{prefix}{}", rules::ITEM_QUANTITY);
        let (quantity, price) = match self.page.evaluate_first(&quantity_path, None)? {
            None => (1, unit_price),
            Some(badge) => {
                let text = self.page.inner_text(badge);
                let quantity = parse_int_prefix(&text)
                    .and_then(|n| u64::try_from(n).ok())
                    .filter(|&q| q > 0)
                    .ok_or(Error::InvalidNumber { what: "quantity", text })?;
                let price = unit_price.checked_mul(quantity).ok_or(Error::PriceOverflow {
                    price: unit_price,
                    quantity,
                })?;
                (quantity, price)
            }
        };

        Ok(Item {
            name,
            url,
            asin,
            quantity,
            price,
            seller,
            img_url,
        })
    }

    /// First node of `prefix` + `relative`, which must exist.
    fn required(&self, prefix: &str, relative: &str, what: &'static str) -> Result<Q::Node> {
        let path = format!("{prefix}{relative}");
        match self.page.evaluate_first(&path, None)? {
            Some(node) => Ok(node),
            None => Err(Error::MissingElement { what, path }),
        }
    }
}

/// First digit run of a price label, separators removed.
fn parse_price(text: &str) -> Result<u64> {
    let digits = strip_thousands(text);
    let Some(found) = patterns::PRICE_DIGITS.find(&digits) else {
        return Err(Error::PatternMismatch {
            what: "price",
            text: text.to_string(),
        });
    };
    found.as_str().parse().map_err(|_| Error::InvalidNumber {
        what: "price",
        text: text.to_string(),
    })
}
