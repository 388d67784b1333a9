//! The revenue report produced by the revenue report procedure.
//!
//! The procedure returns four result sets: a one-row summary, revenue by
//! payment method, revenue by type and the daily trend. Each section is
//! only shown when its result set is present and has rows.

use maud::{Markup, html};

use crate::{
    html::{
        CARD_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        format_date,
    },
    record::{self, Record},
    report::{
        cards::{count, currency, stat_card, stat_cards},
        charts::{ChartBar, bar_chart},
    },
};

const SUMMARY: usize = 0;
const BY_PAYMENT_METHOD: usize = 1;
const BY_TYPE: usize = 2;
const DAILY_TREND: usize = 3;

fn group(groups: &[Vec<Record>], index: usize) -> Option<&[Record]> {
    groups
        .get(index)
        .map(Vec::as_slice)
        .filter(|rows| !rows.is_empty())
}

fn section(title: &str, content: Markup) -> Markup {
    html! {
        section class=(CARD_STYLE) data-report-section=(title)
        {
            h3 class="text-lg font-semibold mb-4" { (title) }
            (content)
        }
    }
}

fn summary_view(summary: &Record) -> Markup {
    let min_max = format!(
        "{} / {}",
        currency(summary, "MinTransaction"),
        currency(summary, "MaxTransaction")
    );

    let title = format!("Revenue Summary ({})", currency(summary, "TotalRevenue"));

    section(
        &title,
        stat_cards(&[
            ("Total Transactions", count(summary, "TotalTransactions")),
            ("Total Revenue", currency(summary, "TotalRevenue")),
            ("Average Transaction", currency(summary, "AverageTransaction")),
            ("Min / Max Transaction", min_max),
        ]),
    )
}

fn table(headers: &[&str], rows: Markup) -> Markup {
    html! {
        div class="overflow-x-auto"
        {
            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for header in headers {
                            th scope="col" class=(TABLE_CELL_STYLE) { (header) }
                        }
                    }
                }

                tbody { (rows) }
            }
        }
    }
}

fn payment_methods_view(rows: &[Record]) -> Markup {
    section(
        "Revenue by Payment Method",
        table(
            &["Payment Method", "Transactions", "Revenue", "Share"],
            html! {
                @for row in rows {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (record::display(row, "PaymentMethod")) }
                        td class=(TABLE_CELL_STYLE) { (count(row, "TransactionCount")) }
                        td class=(TABLE_CELL_STYLE) { (currency(row, "MethodRevenue")) }
                        td class=(TABLE_CELL_STYLE) { (record::display(row, "RevenuePercentage")) "%" }
                    }
                }
            },
        ),
    )
}

fn revenue_types_view(rows: &[Record]) -> Markup {
    section(
        "Revenue by Type",
        html! {
            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                @for row in rows {
                    div
                    {
                        (stat_card(&record::display(row, "RevenueType"), &currency(row, "TypeRevenue")))
                        p class="mt-1 text-sm text-center text-gray-600 dark:text-gray-400"
                        {
                            (count(row, "SalesCount")) " transactions"
                        }
                    }
                }
            }
        },
    )
}

fn daily_trend_view(rows: &[Record]) -> Markup {
    let bars: Vec<ChartBar> = rows
        .iter()
        .map(|row| ChartBar {
            label: format_date(&record::form_value(row, "RevenueDate")),
            value: record::number(row, "DailyRevenue").unwrap_or_default(),
            caption: currency(row, "DailyRevenue"),
        })
        .collect();

    section(
        "Daily Revenue Trend",
        html! {
            div class="mb-6" { (bar_chart("Revenue per day", &bars)) }

            (table(
                &["Date", "Transactions", "Revenue"],
                html! {
                    @for (row, bar) in rows.iter().zip(&bars) {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (bar.label) }
                            td class=(TABLE_CELL_STYLE) { (count(row, "DailyTransactions")) }
                            td class=(TABLE_CELL_STYLE) { (bar.caption) }
                        }
                    }
                },
            ))
        },
    )
}

/// Render the sections of a revenue report that have data.
pub fn revenue_report_view(groups: &[Vec<Record>]) -> Markup {
    let summary = group(groups, SUMMARY).and_then(|rows| rows.first());
    let by_payment_method = group(groups, BY_PAYMENT_METHOD);
    let by_type = group(groups, BY_TYPE);
    let daily_trend = group(groups, DAILY_TREND);

    let is_empty = summary.is_none()
        && by_payment_method.is_none()
        && by_type.is_none()
        && daily_trend.is_none();

    html! {
        div id="revenue-report" class="space-y-6"
        {
            @if is_empty {
                p class="text-gray-600 dark:text-gray-400" { "No revenue recorded for this period." }
            }

            @if let Some(summary) = summary {
                (summary_view(summary))
            }

            @if let Some(rows) = by_payment_method {
                (payment_methods_view(rows))
            }

            @if let Some(rows) = by_type {
                (revenue_types_view(rows))
            }

            @if let Some(rows) = daily_trend {
                (daily_trend_view(rows))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use serde_json::json;

    use crate::record::Record;

    use super::revenue_report_view;

    fn groups(value: serde_json::Value) -> Vec<Vec<Record>> {
        serde_json::from_value(value).unwrap()
    }

    fn section_titles(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("[data-report-section]").unwrap())
            .filter_map(|section| section.value().attr("data-report-section"))
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn renders_every_present_section() {
        let groups = groups(json!([
            [{"TotalTransactions": 12, "TotalRevenue": "1800.00", "AverageTransaction": 150,
              "MinTransaction": 20, "MaxTransaction": 500}],
            [{"PaymentMethod": "UPI", "TransactionCount": 8, "MethodRevenue": 1200, "RevenuePercentage": "66.67"}],
            [{"RevenueType": "Ticket", "TypeRevenue": 1800, "SalesCount": 12}],
            [{"RevenueDate": "2025-01-01", "DailyTransactions": 4, "DailyRevenue": 600},
             {"RevenueDate": "2025-01-02", "DailyTransactions": 8, "DailyRevenue": 1200}],
        ]));

        let html = Html::parse_fragment(&revenue_report_view(&groups).into_string());

        assert_eq!(
            section_titles(&html),
            vec![
                "Revenue Summary (₹1,800.00)",
                "Revenue by Payment Method",
                "Revenue by Type",
                "Daily Revenue Trend",
            ]
        );
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("66.67%"));
        assert!(text.contains("₹150.00"));
        assert!(text.contains("2 Jan 2025"));
    }

    #[test]
    fn skips_missing_and_empty_sections() {
        let groups = groups(json!([
            [],
            [{"PaymentMethod": "Cash", "TransactionCount": 1, "MethodRevenue": 50, "RevenuePercentage": 100}],
        ]));

        let html = Html::parse_fragment(&revenue_report_view(&groups).into_string());

        assert_eq!(section_titles(&html), vec!["Revenue by Payment Method"]);
    }

    #[test]
    fn daily_trend_is_charted() {
        let groups = groups(json!([
            [], [], [],
            [{"RevenueDate": "2025-01-01", "DailyTransactions": 4, "DailyRevenue": 600},
             {"RevenueDate": "2025-01-02", "DailyTransactions": 8, "DailyRevenue": 1200}],
        ]));

        let html = Html::parse_fragment(&revenue_report_view(&groups).into_string());

        let widths: Vec<&str> = html
            .select(&Selector::parse("[role=progressbar] > div").unwrap())
            .filter_map(|fill| fill.value().attr("style"))
            .collect();
        assert_eq!(widths, vec!["width: 50.0%", "width: 100.0%"]);
    }

    #[test]
    fn no_groups_shows_empty_message() {
        let html = revenue_report_view(&[]).into_string();

        assert!(html.contains("No revenue recorded for this period."));
    }
}
