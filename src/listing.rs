//! Pages that show one backend collection as a table.
//!
//! The page itself is rendered without calling the backend: its table body
//! starts with a loading row and then asks for [get_rows]. The body asks
//! again whenever the entity's changed event fires, so every successful
//! mutation reloads the rows exactly once.
//!
//! Rows are always rendered visible; the filter controls above the table
//! hide them in the browser, see [crate::filter].

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    api_client::ApiClient,
    endpoints::{self, nested},
    filter::search_input,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, Tone, badge, base, empty_row,
        error_row, format_currency, format_date, loading_row, status_tone,
    },
    navigation::NavBar,
    record::{self, PLACEHOLDER, Record},
};

/// The heading of the column holding row actions.
pub const ACTIONS_COLUMN: &str = "Actions";

/// One rendered table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Plain text.
    Text(String),
    /// Text shown as a coloured badge.
    Badge(String, Tone),
}

impl Cell {
    /// The field as display text, see [record::display].
    pub fn field(record: &Record, key: &str) -> Self {
        Cell::Text(record::display(record, key))
    }

    /// A date field formatted as e.g. "1 Jan 2025".
    pub fn date(record: &Record, key: &str) -> Self {
        match record.get(key).and_then(|value| value.as_str()) {
            Some(text) if !text.is_empty() => Cell::Text(format_date(text)),
            _ => Cell::Text(PLACEHOLDER.to_owned()),
        }
    }

    /// A currency field formatted as e.g. "₹150.00".
    pub fn currency(record: &Record, key: &str) -> Self {
        match record::number(record, key) {
            Some(amount) => Cell::Text(format_currency(amount)),
            None => Cell::Text(PLACEHOLDER.to_owned()),
        }
    }

    /// A status field shown as a badge coloured by status.
    pub fn status(record: &Record, key: &str) -> Self {
        let status = record::display(record, key);
        let tone = status_tone(&status);

        Cell::Badge(status, tone)
    }

    /// A field shown as a badge with a fixed colour.
    pub fn badge(record: &Record, key: &str, tone: Tone) -> Self {
        Cell::Badge(record::display(record, key), tone)
    }

    /// The text of the cell, as used for CSV export.
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(text) | Cell::Badge(text, _) => text,
        }
    }

    fn into_html(self) -> Markup {
        match self {
            Cell::Text(text) => html!((text)),
            Cell::Badge(text, tone) => badge(&text, tone),
        }
    }
}

/// A collection shown as a table.
pub trait Listing: Send + Sync + 'static {
    /// The page title, e.g. "Passengers".
    const TITLE: &'static str;
    /// The name of one record, e.g. "Passenger".
    const SINGULAR: &'static str;
    /// The URI of the page on this server.
    const VIEW: &'static str;
    /// The backend path of the collection.
    const COLLECTION: &'static str;
    /// Column headings, including [ACTIONS_COLUMN] if rows have actions.
    const COLUMNS: &'static [&'static str];
    /// The index of the status column used by the status filter.
    const STATUS_COLUMN: Option<usize> = None;
    /// The htmx event that makes the table reload its rows.
    const CHANGED_EVENT: &'static str;

    /// The cells of one row, not including the actions column.
    fn cells(record: &Record) -> Vec<Cell>;

    /// The content of the actions column.
    fn row_actions(_record: &Record) -> Option<Markup> {
        None
    }

    /// Controls shown above the table, e.g. an add button.
    fn toolbar() -> Markup {
        html!()
    }
}

/// The state needed for the listing route handlers.
#[derive(Debug, Clone)]
pub struct ListingState {
    pub api: ApiClient,
}

impl FromRef<AppState> for ListingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

const TABLE_BODY_ID: &str = "table-body";

fn listing_view<L: Listing>() -> Markup {
    let nav_bar = NavBar::new(L::VIEW).into_html();
    let rows_url = nested(L::VIEW, endpoints::ROWS);
    let export_url = nested(L::VIEW, endpoints::EXPORT_CSV);
    let reload_trigger = format!("load, {} from:body", L::CHANGED_EVENT);
    let search_placeholder = format!("Search {}...", L::TITLE.to_lowercase());

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { (L::TITLE) }

                    div class="flex flex-wrap items-center gap-4"
                    {
                        (L::toolbar())

                        a href=(export_url) class=(LINK_STYLE) download { "Export CSV" }
                    }
                }

                (search_input(&search_placeholder))

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                @for column in L::COLUMNS {
                                    th scope="col" class=(TABLE_CELL_STYLE) { (column) }
                                }
                            }
                        }

                        tbody
                            id=(TABLE_BODY_ID)
                            hx-get=(rows_url)
                            hx-trigger=(reload_trigger)
                            data-status-column=[L::STATUS_COLUMN]
                        {
                            (loading_row(L::COLUMNS.len()))
                        }
                    }
                }
            }
        }
    );

    base(L::TITLE, &content)
}

fn table_row<L: Listing>(record: &Record) -> Markup {
    let cells = L::cells(record);
    let actions = L::row_actions(record);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            @for cell in cells {
                td class=(TABLE_CELL_STYLE) { (cell.into_html()) }
            }

            @if let Some(actions) = actions {
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4" { (actions) }
                }
            }
        }
    )
}

/// Render table rows for `records`, or the single placeholder row when
/// there are none.
fn rows_view<L: Listing>(records: &[Record]) -> Markup {
    if records.is_empty() {
        let message = format!("No {} found", L::TITLE.to_lowercase());
        return empty_row(L::COLUMNS.len(), &message);
    }

    html!(
        @for record in records {
            (table_row::<L>(record))
        }
    )
}

fn load_error_message<L: Listing>(error: &Error) -> String {
    match error {
        Error::Backend(message) => message.clone(),
        error => format!("Failed to load {}: {error}", L::TITLE.to_lowercase()),
    }
}

/// Renders the page for a collection.
pub async fn get_listing_page<L: Listing>() -> Response {
    listing_view::<L>().into_response()
}

/// Renders the table body for a collection.
///
/// Load failures render a single error row so that htmx still swaps the
/// table body.
pub async fn get_rows<L: Listing>(State(state): State<ListingState>) -> Response {
    match state.api.list(L::COLLECTION).await {
        Ok(records) => rows_view::<L>(&records).into_response(),
        Err(error) => {
            tracing::error!("Could not load {}: {error}", L::TITLE.to_lowercase());
            error_row(L::COLUMNS.len(), &load_error_message::<L>(&error)).into_response()
        }
    }
}

/// Writes the cells of `records` as CSV with a header row.
fn records_to_csv<L: Listing>(records: &[Record]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let headers = L::COLUMNS
        .iter()
        .filter(|&&column| column != ACTIONS_COLUMN);
    writer
        .write_record(headers)
        .map_err(|error| Error::CsvExport(error.to_string()))?;

    for record in records {
        let cells = L::cells(record);
        writer
            .write_record(cells.iter().map(Cell::text))
            .map_err(|error| Error::CsvExport(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvExport(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvExport(error.to_string()))
}

/// Download a collection as CSV, with the same cells as the table.
pub async fn export_csv<L: Listing>(State(state): State<ListingState>) -> Result<Response, Error> {
    let records = state
        .api
        .list(L::COLLECTION)
        .await
        .inspect_err(|error| tracing::error!("Could not export {}: {error}", L::TITLE))?;

    let csv = records_to_csv::<L>(&records)?;
    let file_name = format!(
        "attachment; filename=\"{}.csv\"",
        L::TITLE.to_lowercase()
    );

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (CONTENT_DISPOSITION, file_name),
        ],
        csv,
    )
        .into_response())
}
