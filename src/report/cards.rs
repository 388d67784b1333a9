//! Stat cards and number formatting for report rows.

use maud::{Markup, html};

use crate::{
    html::{format_count, format_currency},
    record::{self, PLACEHOLDER, Record},
};

/// A field as a currency amount, or "N/A" if it is not a number.
pub fn currency(record: &Record, key: &str) -> String {
    record::number(record, key)
        .map(format_currency)
        .unwrap_or_else(|| PLACEHOLDER.to_owned())
}

/// A field as a count, e.g. "1,204", or the raw text if it is not a number.
pub fn count(record: &Record, key: &str) -> String {
    match record::number(record, key) {
        Some(count) => format_count(count),
        None => record::display(record, key),
    }
}

/// The amount per item, e.g. revenue per booking.
///
/// Gives "N/A" when either number is missing or there are no items.
pub fn average(record: &Record, total_key: &str, count_key: &str) -> String {
    match (record::number(record, total_key), record::number(record, count_key)) {
        (Some(total), Some(count)) if count > 0.0 => format_currency(total / count),
        _ => PLACEHOLDER.to_owned(),
    }
}

/// A card with a large value over a short label.
pub fn stat_card(label: &str, value: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md text-center"
            data-stat-card
        {
            div class="text-2xl font-bold mb-1" { (value) }
            div class="text-sm text-gray-600 dark:text-gray-400" { (label) }
        }
    }
}

/// A grid of stat cards.
pub fn stat_cards(cards: &[(&str, String)]) -> Markup {
    html! {
        div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
        {
            @for (label, value) in cards {
                (stat_card(label, value))
            }
        }
    }
}
