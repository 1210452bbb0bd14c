use serde_json::json;

use crate::error::{Error, Result};
use crate::normalize::normalize_order_date;
use crate::page::DocumentQuery;
use crate::result::{OrderList, OrderSummary};
use crate::selector::{self, rules};

use super::Extractor;

impl<Q: DocumentQuery + ?Sized> Extractor<'_, Q> {
    /// Order cards on a list page, plus whether this is the last page.
    ///
    /// Cards are handled independently: a card missing its date or link is
    /// skipped with a warning, a card that fails outright is logged, and
    /// neither stops the remaining cards.
    #[must_use]
    pub fn order_list(&self) -> OrderList {
        let cards = selector::resolve_all(self.page, None, rules::ORDER_CARD, self.options, self.log);
        self.log.info(json!({ "order_count": cards.len() }));

        let mut list = Vec::with_capacity(cards.len());
        for (index, card) in cards.into_iter().enumerate() {
            let position = index + 1;
            match self.order_summary(card) {
                Ok(Some(summary)) => list.push(summary),
                Ok(None) => self
                    .log
                    .warn(format!("Order {position}: Could not find date or detail link")),
                Err(err) => self.log.error(format!("Error parsing order {position}: {err}")),
            }
        }

        OrderList {
            list,
            is_last: self.is_last_page(),
        }
    }

    /// Date and detail link of one card; `None` when either is missing.
    fn order_summary(&self, card: Q::Node) -> Result<Option<OrderSummary>> {
        let date = selector::resolve_first(self.page, Some(card), rules::ORDER_DATE, self.options, self.log);
        let link = selector::resolve_first(self.page, Some(card), rules::DETAIL_LINK, self.options, self.log);
        let (Some(date), Some(link)) = (date, link) else {
            return Ok(None);
        };

        let url = self.page.href(link).ok_or_else(|| Error::MissingElement {
            what: "detail link target",
            path: "@href".to_string(),
        })?;

        Ok(Some(OrderSummary {
            date: normalize_order_date(&self.page.inner_text(date)),
            url,
        }))
    }

    /// No "next page" link, according to both CSS and a path count.
    fn is_last_page(&self) -> bool {
        if self.page.query_selector(None, rules::NEXT_PAGE_LINK).is_some() {
            return false;
        }
        match self.page.evaluate_count(rules::NEXT_PAGE_LINK_COUNT) {
            Ok(count) => count == 0,
            Err(err) => {
                self.log.debug(format!("next page count failed: {err}"));
                false
            }
        }
    }
}
