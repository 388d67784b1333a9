//! The ad-hoc queries page.
//!
//! Each query result is shown as a table with the row values in the order
//! the backend sent them. The performance panel shows the wall clock time
//! and row count of the last run, and how many runs this page has made.

use std::time::{Duration, Instant};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::Method,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    AppState, Error,
    api_client::{ApiClient, Envelope, paths},
    endpoints::{self, RUN_QUERY},
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base, format_count, format_currency,
    },
    navigation::NavBar,
    record::{self, Record},
};

/// Numbers above this are shown as currency in query results.
const CURRENCY_THRESHOLD: f64 = 100.0;

/// The state needed for the query handlers.
#[derive(Debug, Clone)]
pub struct QueriesState {
    pub api: ApiClient,
}

impl FromRef<AppState> for QueriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The name of the hidden input holding the page's run count.
const RUNS_FIELD: &str = "runs";

/// How many queries the page has run so far.
///
/// The count lives in the page: each run sends it and gets the next value
/// back, so it starts at zero whenever the page is loaded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QueryStats {
    #[serde(default)]
    pub runs: u64,
}

impl QueryStats {
    /// The count after one more run.
    fn next(self) -> Self {
        Self {
            runs: self.runs.saturating_add(1),
        }
    }
}

/// The queries that can be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Passengers who spend more than the average passenger.
    Nested,
    /// Routes with their stations.
    Join,
    /// Revenue per payment method.
    Aggregate,
}

impl QueryKind {
    const ALL: [QueryKind; 3] = [QueryKind::Nested, QueryKind::Join, QueryKind::Aggregate];

    fn slug(self) -> &'static str {
        match self {
            QueryKind::Nested => "nested",
            QueryKind::Join => "join",
            QueryKind::Aggregate => "aggregate",
        }
    }

    fn path(self) -> &'static str {
        match self {
            QueryKind::Nested => paths::NESTED_QUERY,
            QueryKind::Join => paths::JOIN_QUERY,
            QueryKind::Aggregate => paths::AGGREGATE_QUERY,
        }
    }

    fn title(self) -> &'static str {
        match self {
            QueryKind::Nested => "Nested Query: High-Value Passengers",
            QueryKind::Join => "Join Query: Route Details",
            QueryKind::Aggregate => "Aggregate Query: Payment Methods",
        }
    }

    fn description(self) -> &'static str {
        match self {
            QueryKind::Nested => "Passengers whose total ticket spending is above the average.",
            QueryKind::Join => "Each route with its stations in order.",
            QueryKind::Aggregate => "Completed payments grouped by payment method.",
        }
    }

    fn headers(self) -> &'static [&'static str] {
        match self {
            QueryKind::Nested => &["Passenger ID", "Name", "Total Tickets", "Total Spending"],
            QueryKind::Join => &[
                "Route Code",
                "Route Name",
                "Total Distance",
                "Stations",
                "Station Count",
            ],
            QueryKind::Aggregate => &[
                "Payment Method",
                "Transaction Count",
                "Total Revenue",
                "Average Amount",
                "Min Amount",
                "Max Amount",
            ],
        }
    }

    fn run_url(self) -> String {
        RUN_QUERY.replace("{kind}", self.slug())
    }

    fn result_id(self) -> String {
        format!("{}-result", self.slug())
    }
}

/// The outcome of one backend query.
struct QueryRun {
    kind: QueryKind,
    /// The rows, or the reason there are none.
    result: Result<Vec<Record>, Error>,
}

impl QueryRun {
    fn row_count(&self) -> usize {
        self.result.as_ref().map(Vec::len).unwrap_or_default()
    }
}

async fn run(api: &ApiClient, kind: QueryKind) -> QueryRun {
    let envelope: Envelope<Vec<Record>> = api
        .call::<Value>(kind.path(), Method::GET, None)
        .await
        .decode();

    QueryRun {
        kind,
        result: envelope.into_data(),
    }
}

const PERFORMANCE_PANEL_ID: &str = "query-performance";

fn performance_panel(elapsed: Option<Duration>, rows: usize, stats: QueryStats) -> Markup {
    let elapsed = elapsed
        .map(|elapsed| format!("{} ms", elapsed.as_millis()))
        .unwrap_or_else(|| "-".to_owned());

    html! {
        dl id=(PERFORMANCE_PANEL_ID) class="grid grid-cols-3 gap-4 text-center" data-performance
        {
            div
            {
                dt class="text-sm text-gray-600 dark:text-gray-400" { "Execution Time" }
                dd class="text-2xl font-bold" data-metric="time" { (elapsed) }
            }
            div
            {
                dt class="text-sm text-gray-600 dark:text-gray-400" { "Rows Processed" }
                dd class="text-2xl font-bold" data-metric="rows" { (format_count(rows as f64)) }
            }
            div
            {
                dt class="text-sm text-gray-600 dark:text-gray-400" { "Queries Run" }
                dd class="text-2xl font-bold" data-metric="runs" { (stats.runs) }
            }
        }

        input type="hidden" id=(RUNS_FIELD) name=(RUNS_FIELD) value=(stats.runs);
    }
}

/// The performance panel as an out-of-band swap, so any query response
/// also updates it.
fn performance_update(elapsed: Duration, rows: usize, stats: QueryStats) -> Markup {
    html! {
        div hx-swap-oob=(format!("innerHTML:#{PERFORMANCE_PANEL_ID}-container"))
        {
            (performance_panel(Some(elapsed), rows, stats))
        }
    }
}

/// Render a value from a query row.
fn query_cell(value: &Value) -> String {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(amount) if amount > CURRENCY_THRESHOLD => format_currency(amount),
            _ => number.to_string(),
        },
        value => record::display_value(value),
    }
}

fn query_result_view(run: &QueryRun) -> Markup {
    let rows = match &run.result {
        Ok(rows) => rows,
        Err(error) => {
            return html! {
                p class="text-red-600 dark:text-red-400" data-query-error { "Error: " (error) }
            };
        }
    };

    if rows.is_empty() {
        return html! {
            p class="text-gray-600 dark:text-gray-400" { "No data returned" }
        };
    }

    html! {
        div class="overflow-x-auto"
        {
            h3 class="font-semibold mb-2" { (run.kind.title()) }

            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for header in run.kind.headers() {
                            th scope="col" class=(TABLE_CELL_STYLE) { (header) }
                        }
                    }
                }

                tbody
                {
                    @for row in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            @for value in row.values() {
                                td class=(TABLE_CELL_STYLE) { (query_cell(value)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn query_card(kind: QueryKind) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            div class="flex flex-wrap items-center justify-between gap-4 mb-4"
            {
                div
                {
                    h2 class="text-lg font-semibold" { (kind.title()) }
                    p class="text-sm text-gray-600 dark:text-gray-400" { (kind.description()) }
                }

                button
                    type="button"
                    hx-post=(kind.run_url())
                    hx-include=(format!("#{RUNS_FIELD}"))
                    hx-target=(format!("#{}", kind.result_id()))
                    hx-target-error="#alert-container"
                    class=(format!("{BUTTON_PRIMARY_STYLE} md:w-auto"))
                {
                    "Run Query"
                }
            }

            div id=(kind.result_id()) {}
        }
    }
}

/// Renders the queries page.
pub async fn get_queries_page() -> Response {
    let nav_bar = NavBar::new(endpoints::QUERIES_VIEW).into_html();
    let performance_container_id = format!("{PERFORMANCE_PANEL_ID}-container");

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-6 w-full lg:max-w-6xl"
            {
                h1 class="text-xl font-bold" { "Advanced Queries" }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Performance" }
                    div id=(performance_container_id)
                    {
                        (performance_panel(None, 0, QueryStats::default()))
                    }
                }

                @for kind in QueryKind::ALL {
                    (query_card(kind))
                }

                section class=(CARD_STYLE)
                {
                    div class="flex flex-wrap items-center justify-between gap-4 mb-4"
                    {
                        h2 class="text-lg font-semibold" { "Run All Queries" }

                        button
                            type="button"
                            hx-post=(endpoints::RUN_ALL_QUERIES)
                            hx-include=(format!("#{RUNS_FIELD}"))
                            hx-target="#all-results"
                            hx-target-error="#alert-container"
                            class=(format!("{BUTTON_PRIMARY_STYLE} md:w-auto"))
                        {
                            "Run All"
                        }
                    }

                    div id="all-results" class="space-y-6" {}
                }
            }
        }
    };

    base("Queries", &content).into_response()
}

/// Runs one query and renders its result.
pub async fn run_query(
    State(state): State<QueriesState>,
    Path(kind): Path<QueryKind>,
    Form(stats): Form<QueryStats>,
) -> Response {
    let start = Instant::now();
    let run = run(&state.api, kind).await;
    let elapsed = start.elapsed();

    if let Err(error) = &run.result {
        tracing::error!("The {} query failed: {error}", kind.slug());
    }

    html! {
        (query_result_view(&run))
        (performance_update(elapsed, run.row_count(), stats.next()))
    }
    .into_response()
}

/// Runs every query at the same time and renders all the results.
pub async fn run_all_queries(
    State(state): State<QueriesState>,
    Form(stats): Form<QueryStats>,
) -> Response {
    let start = Instant::now();
    let (nested, join, aggregate) = tokio::join!(
        run(&state.api, QueryKind::Nested),
        run(&state.api, QueryKind::Join),
        run(&state.api, QueryKind::Aggregate),
    );
    let elapsed = start.elapsed();

    let runs = [nested, join, aggregate];
    let total_rows = runs.iter().map(QueryRun::row_count).sum();

    html! {
        @for run in &runs {
            div data-query-section=(run.kind.slug())
            {
                (query_result_view(run))
            }
        }
        (performance_update(elapsed, total_rows, stats.next()))
    }
    .into_response()
}
