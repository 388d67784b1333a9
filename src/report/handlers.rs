//! The reports page and the fragments it loads.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    api_client::{ApiClient, paths},
    endpoints,
    html::{
        CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_STYLE, base, format_date, loading_spinner,
    },
    navigation::NavBar,
    record::{self, Record},
    report::{
        cards::{average, count, currency},
        charts::{ChartBar, bar_chart, share_chart},
    },
};

/// The state needed for the report handlers.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub api: ApiClient,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

fn lazy_section(title: &str, url: &str) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold mb-4" { (title) }

            div hx-get=(url) hx-trigger="load" hx-swap="innerHTML"
            {
                div class="text-gray-500 dark:text-gray-400" { (loading_spinner()) "Loading report..." }
            }
        }
    }
}

/// Renders the reports page. Each report loads on its own once the page is
/// shown.
pub async fn get_reports_page() -> Response {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-6 w-full lg:max-w-6xl"
            {
                h1 class="text-xl font-bold" { "Reports" }

                (lazy_section("Daily Bookings", endpoints::DAILY_BOOKINGS_REPORT))
                (lazy_section("Popular Routes", endpoints::POPULAR_ROUTES_REPORT))
                (lazy_section("Payment Methods", endpoints::PAYMENT_METHODS_REPORT))
            }
        }
    };

    base("Reports", &content).into_response()
}

fn report_table(headers: &[&str], rows: Markup) -> Markup {
    html! {
        div class="overflow-x-auto mt-6"
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

fn report_error(error: &Error) -> Markup {
    html! {
        p class="text-red-600 dark:text-red-400" data-report-error { (error) }
    }
}

fn no_data() -> Markup {
    html! {
        p class="text-gray-600 dark:text-gray-400" { "No data available." }
    }
}

/// Render a report from `rows`, or a message when the rows could not be
/// loaded or there are none.
fn render_report(
    name: &str,
    result: Result<Vec<Record>, Error>,
    view: fn(&[Record]) -> Markup,
) -> Response {
    match result {
        Ok(rows) if rows.is_empty() => no_data().into_response(),
        Ok(rows) => view(&rows).into_response(),
        Err(error) => {
            tracing::error!("Could not load the {name} report: {error}");
            report_error(&error).into_response()
        }
    }
}

fn daily_bookings_view(rows: &[Record]) -> Markup {
    let bars: Vec<ChartBar> = rows
        .iter()
        .map(|row| ChartBar {
            label: format_date(&record::form_value(row, "BookingDate")),
            value: record::number(row, "TotalBookings").unwrap_or_default(),
            caption: format!("{} bookings", count(row, "TotalBookings")),
        })
        .collect();

    html! {
        (bar_chart("Daily Bookings Trend", &bars))

        (report_table(
            &["Date", "Bookings", "Revenue", "Unique Passengers", "Avg per Booking"],
            html! {
                @for (row, bar) in rows.iter().zip(&bars) {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (bar.label) }
                        td class=(TABLE_CELL_STYLE) { (count(row, "TotalBookings")) }
                        td class=(TABLE_CELL_STYLE) { (currency(row, "Revenue")) }
                        td class=(TABLE_CELL_STYLE) { (count(row, "UniquePassengers")) }
                        td class=(TABLE_CELL_STYLE) { (average(row, "Revenue", "TotalBookings")) }
                    }
                }
            },
        ))
    }
}

fn popular_routes_view(rows: &[Record]) -> Markup {
    let bars: Vec<ChartBar> = rows
        .iter()
        .map(|row| ChartBar {
            label: format!(
                "{} - {}",
                record::display(row, "RouteCode"),
                record::display(row, "Name")
            ),
            value: record::number(row, "BookingCount").unwrap_or_default(),
            caption: format!("{} bookings", count(row, "BookingCount")),
        })
        .collect();

    html! {
        (bar_chart("Top Routes by Bookings", &bars))

        (report_table(
            &["Route", "Name", "Bookings", "Revenue", "Avg Fare"],
            html! {
                @for row in rows {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (record::display(row, "RouteCode")) }
                        td class=(TABLE_CELL_STYLE) { (record::display(row, "Name")) }
                        td class=(TABLE_CELL_STYLE) { (count(row, "BookingCount")) }
                        td class=(TABLE_CELL_STYLE) { (currency(row, "TotalRevenue")) }
                        td class=(TABLE_CELL_STYLE) { (average(row, "TotalRevenue", "BookingCount")) }
                    }
                }
            },
        ))
    }
}

fn payment_methods_view(rows: &[Record]) -> Markup {
    let slices: Vec<(String, f64)> = rows
        .iter()
        .map(|row| {
            (
                record::display(row, "PaymentMethod"),
                record::number(row, "TotalRevenue").unwrap_or_default(),
            )
        })
        .collect();

    share_chart("Payment Method Distribution", &slices)
}

/// Renders bookings and revenue per day.
pub async fn get_daily_bookings(State(state): State<ReportState>) -> Response {
    let result = state.api.list(paths::DAILY_BOOKINGS).await;

    render_report("daily bookings", result, daily_bookings_view)
}

/// Renders the routes with the most bookings.
pub async fn get_popular_routes(State(state): State<ReportState>) -> Response {
    let result = state.api.list(paths::POPULAR_ROUTES).await;

    render_report("popular routes", result, popular_routes_view)
}

/// Renders each payment method's share of revenue.
pub async fn get_payment_methods(State(state): State<ReportState>) -> Response {
    let result = state.api.list(paths::AGGREGATE_QUERY).await;

    render_report("payment methods", result, payment_methods_view)
}
