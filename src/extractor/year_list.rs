use crate::page::DocumentQuery;
use crate::patterns;
use crate::result::YearList;
use crate::selector::{self, rules};

use super::Extractor;

impl<Q: DocumentQuery + ?Sized> Extractor<'_, Q> {
    /// Years offered by the year filter, in option order.
    ///
    /// The first four-digit run of each option's text is taken; options
    /// without one, or outside `min_year..=max_year`, are skipped.
    /// Duplicates are kept. A page without a year filter yields an empty
    /// list.
    #[must_use]
    pub fn year_list(&self) -> YearList {
        let Some(filter) = selector::resolve_first(self.page, None, rules::YEAR_FILTER, self.options, self.log)
        else {
            self.log.error("Year filter selector not found");
            return YearList::default();
        };

        let list = self
            .page
            .query_selector_all(Some(filter), rules::YEAR_OPTION)
            .into_iter()
            .filter_map(|option| {
                let text = self.page.inner_text(option);
                patterns::YEAR.find(&text)?.as_str().parse::<u16>().ok()
            })
            .filter(|&year| self.options.accepts_year(year))
            .collect();

        YearList { list }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom;
    use crate::logging::{MemoryLog, NoopLog};
    use crate::page::HtmlPage;
    use crate::{Extractor, Options};
    use tracing::Level;

    #[test]
    fn test_modern_filter_takes_priority() {
        let doc = dom::parse(
            r#"<select id="orderFilter"><option>2019年</option></select>
               <select id="time-filter">
                 <option value="last30">過去30日間</option>
                 <option value="year-2024">2024年</option>
                 <option value="year-2023">2023年</option>
               </select>"#,
        );
        let page = HtmlPage::new(&doc, None);
        let options = Options::default();
        let years = Extractor::new(&page, &options, &NoopLog).year_list();
        assert_eq!(years.list, vec![2024, 2023]);
    }

    #[test]
    fn test_missing_filter_logs_and_returns_empty() {
        let doc = dom::parse("<p>no filter here</p>");
        let page = HtmlPage::new(&doc, None);
        let options = Options::default();
        let memory = MemoryLog::new();
        let years = Extractor::new(&page, &options, &memory).year_list();
        assert!(years.list.is_empty());
        assert_eq!(memory.messages(Level::ERROR), vec!["Year filter selector not found"]);
    }

    #[test]
    fn test_configured_bounds_apply() {
        let doc = dom::parse(
            r#"<select id="orderFilter"><option>2024</option><option>2010</option></select>"#,
        );
        let page = HtmlPage::new(&doc, None);
        let options = Options {
            min_year: 2015,
            ..Options::default()
        };
        assert_eq!(Extractor::new(&page, &options, &NoopLog).year_list().list, vec![2024]);
    }
}
