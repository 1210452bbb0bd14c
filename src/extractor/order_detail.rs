use serde_json::json;

use crate::error::{Error, Result};
use crate::page::DocumentQuery;
use crate::result::{Item, OrderDetail};
use crate::selector::rules;

use super::Extractor;

impl<Q: DocumentQuery + ?Sized> Extractor<'_, Q> {
    /// Items of the order shown on a detail page.
    ///
    /// Physical orders group items into shipment boxes and are read box by
    /// box. Pages without shipment boxes are digital orders whose item
    /// blocks are read straight through. Any failure while reading items is
    /// turned into [`OrderDetail::Failure`], preferring the site's own alert
    /// heading (tagged with [`Options::site_message_tag`]) over the internal
    /// error text.
    ///
    /// [`Options::site_message_tag`]: crate::Options::site_message_tag
    #[must_use]
    pub fn order_detail(&self) -> OrderDetail {
        match self.detail_items() {
            Ok(list) => OrderDetail::Success { list },
            Err(err) => {
                self.log.error(err.to_string());
                OrderDetail::Failure(self.failure_message(&err))
            }
        }
    }

    fn detail_items(&self) -> Result<Vec<Item>> {
        let shipments = self.page.evaluate_count(&rules::count(rules::SHIPMENT_BOX))?;
        if shipments > 0 {
            self.shipment_items(shipments)
        } else {
            self.digital_items()
        }
    }

    fn shipment_items(&self, shipments: usize) -> Result<Vec<Item>> {
        self.log.info("通常注文");

        let mut items = Vec::new();
        for shipment in 1..=shipments {
            let blocks = format!("{}{}", rules::nth(rules::SHIPMENT_BOX, shipment), rules::ITEM_BLOCK);
            let count = self.page.evaluate_count(&rules::count(&blocks))?;
            for block in 1..=count {
                items.push(self.item(&rules::nth(&blocks, block))?);
            }
        }
        Ok(items)
    }

    fn digital_items(&self) -> Result<Vec<Item>> {
        self.log.info("デジタル注文");

        let blocks = format!("{}{}", rules::CONTENT_BOX, rules::ITEM_BLOCK);
        let count = self.page.evaluate_count(&rules::count(&blocks))?;
        let items = (1..=count)
            .map(|block| self.item(&rules::nth(&blocks, block)))
            .collect::<Result<Vec<_>>>()?;

        if let Ok(list) = serde_json::to_value(&items) {
            self.log.info(json!({ "item_list": list }));
        }
        Ok(items)
    }

    fn failure_message(&self, err: &Error) -> String {
        let alert = self
            .page
            .evaluate_first(rules::ALERT_HEADING, None)
            .ok()
            .flatten()
            .map(|heading| self.page.inner_text(heading))
            .unwrap_or_default();

        if alert.is_empty() {
            err.to_string()
        } else {
            format!("{}{alert}", self.options.site_message_tag)
        }
    }
}
