//! The controls that filter a listing table.
//!
//! Filtering happens in the browser (see static/app.js): typing or picking a
//! status hides the rows already on the page without a request. The search
//! is a case-insensitive match over the whole row, the status filter a
//! case-sensitive match on the listing's status column.
//!
//! A filter does not survive a reload of the table body. When fresh rows are
//! swapped in, the controls are cleared and every row is shown.

use maud::{Markup, html};

use crate::html::FORM_TEXT_INPUT_STYLE;

/// The status filter value that shows every row.
pub const ALL_STATUSES: &str = "all";

/// The name of the search input on a listing page.
pub const SEARCH_FIELD: &str = "search";

/// The name of the status filter select on a listing page.
///
/// Distinct from the `status` field of edit forms, which may be open in a
/// modal on the same page.
pub const STATUS_FILTER_FIELD: &str = "status-filter";

/// The text input that filters rows by their text.
pub fn search_input(placeholder: &str) -> Markup {
    html! {
        input
            type="search"
            name=(SEARCH_FIELD)
            placeholder=(placeholder)
            aria-label=(placeholder)
            autocomplete="off"
            class=(FORM_TEXT_INPUT_STYLE)
            data-row-filter="search";
    }
}

/// The select that filters rows by status, starting with "All statuses".
pub fn status_select(statuses: &[&str]) -> Markup {
    html! {
        label for=(STATUS_FILTER_FIELD) class="sr-only" { "Filter by status" }
        select
            id=(STATUS_FILTER_FIELD)
            name=(STATUS_FILTER_FIELD)
            class=(FORM_TEXT_INPUT_STYLE)
            data-row-filter="status"
        {
            option value=(ALL_STATUSES) selected { "All statuses" }

            @for status in statuses {
                option value=(status) { (status) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::{search_input, status_select};

    const REQUEST_ATTRIBUTES: [&str; 5] = ["hx-get", "hx-post", "hx-trigger", "hx-target", "hx-include"];

    #[test]
    fn search_input_makes_no_request() {
        let html = Html::parse_fragment(&search_input("Search stations...").into_string());

        let input = html
            .select(&Selector::parse("input[type=search]").unwrap())
            .next()
            .expect("no search input");
        assert_eq!(input.value().attr("name"), Some("search"));
        assert_eq!(input.value().attr("data-row-filter"), Some("search"));
        assert_eq!(input.value().attr("placeholder"), Some("Search stations..."));
        for attribute in REQUEST_ATTRIBUTES {
            assert_eq!(input.value().attr(attribute), None, "search has {attribute}");
        }
    }

    #[test]
    fn status_select_starts_with_all_statuses() {
        let html = Html::parse_fragment(&status_select(&["Pending", "Resolved"]).into_string());

        let options: Vec<(&str, bool)> = html
            .select(&Selector::parse("select option").unwrap())
            .map(|option| {
                (
                    option.value().attr("value").unwrap_or_default(),
                    option.value().attr("selected").is_some(),
                )
            })
            .collect();
        assert_eq!(
            options,
            vec![("all", true), ("Pending", false), ("Resolved", false)]
        );
    }

    #[test]
    fn status_select_makes_no_request() {
        let html = Html::parse_fragment(&status_select(&["Pending"]).into_string());

        let select = html
            .select(&Selector::parse("select").unwrap())
            .next()
            .expect("no status select");
        assert_eq!(select.value().attr("id"), Some("status-filter"));
        assert_eq!(select.value().attr("name"), Some("status-filter"));
        assert_eq!(select.value().attr("data-row-filter"), Some("status"));
        for attribute in REQUEST_ATTRIBUTES {
            assert_eq!(select.value().attr(attribute), None, "select has {attribute}");
        }
    }
}
