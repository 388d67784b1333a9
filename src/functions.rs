//! The database functions page: passenger age, seat availability and a
//! combined lookup that asks for several ages at once.

use std::time::Instant;

use axum::{
    Form,
    extract::{FromRef, State},
    http::Method,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    AppState, Error,
    alert::Alert,
    api_client::{ApiClient, paths},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, Tone, badge, base, format_date,
        input_field,
    },
    navigation::NavBar,
    record::{self, PLACEHOLDER, Record},
};

/// The passengers looked up by the combined lookup.
const COMBINED_PASSENGER_IDS: std::ops::RangeInclusive<i64> = 1..=5;

/// The seat status the seat check function returns for a free seat.
const SEAT_AVAILABLE: &str = "AVAILABLE";

/// The state needed for the function handlers.
#[derive(Debug, Clone)]
pub struct FunctionsState {
    pub api: ApiClient,
}

impl FromRef<AppState> for FunctionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The form data for the age lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeForm {
    pub passenger_id: i64,
}

/// A seat to check. This is both the form data and the JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatCheck {
    pub schedule_id: i64,
    /// The journey date as "YYYY-MM-DD".
    pub journey_date: String,
    pub seat_number: String,
}

fn function_card(title: &str, description: &str, body: Markup) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold" { (title) }
            p class="mb-4 text-sm text-gray-600 dark:text-gray-400" { (description) }
            (body)
        }
    }
}

/// Renders the functions page.
pub async fn get_functions_page() -> Response {
    let nav_bar = NavBar::new(endpoints::FUNCTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-6 w-full lg:max-w-6xl"
            {
                h1 class="text-xl font-bold" { "Database Functions" }

                (function_card(
                    "Passenger Age",
                    "Calculates a passenger's age from their date of birth.",
                    html! {
                        form
                            hx-post=(endpoints::PASSENGER_AGE)
                            hx-target="#age-result"
                            hx-target-error="#alert-container"
                            class="space-y-4"
                        {
                            (input_field("passengerId", "Passenger ID", "number"))
                            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Calculate Age" }
                        }
                        div id="age-result" class="mt-4" {}
                    },
                ))

                (function_card(
                    "Seat Availability",
                    "Checks whether a seat is free on a schedule for a given day.",
                    html! {
                        form
                            hx-post=(endpoints::CHECK_SEAT)
                            hx-target="#seat-result"
                            hx-target-error="#alert-container"
                            class="space-y-4"
                        {
                            (input_field("scheduleId", "Schedule ID", "number"))
                            (input_field("journeyDate", "Journey Date", "date"))
                            (input_field("seatNumber", "Seat Number", "text"))
                            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Check Seat" }
                        }
                        div id="seat-result" class="mt-4" {}
                    },
                ))

                (function_card(
                    "Combined Lookup",
                    "Calculates the ages of passengers 1 to 5 at the same time.",
                    html! {
                        button
                            type="button"
                            hx-post=(endpoints::COMBINED_LOOKUP)
                            hx-target="#combined-result"
                            hx-target-error="#alert-container"
                            class=(BUTTON_PRIMARY_STYLE)
                        {
                            "Run Combined Lookup"
                        }
                        div id="combined-result" class="mt-4" {}
                    },
                ))
            }
        }
    };

    base("Functions", &content).into_response()
}

fn result_panel(is_success: bool, title: &str, lines: &[(&str, String)], note: Option<&str>) -> Markup {
    let style = if is_success {
        "p-4 rounded-lg border border-green-300 bg-green-50 text-green-900 \
        dark:bg-gray-800 dark:text-green-300 dark:border-green-800"
    } else {
        "p-4 rounded-lg border border-red-300 bg-red-50 text-red-900 \
        dark:bg-gray-800 dark:text-red-300 dark:border-red-800"
    };

    html! {
        div class=(style) data-result=(if is_success { "success" } else { "error" })
        {
            h3 class="font-semibold mb-2" { (title) }

            @for (label, value) in lines {
                p { (label) ": " strong { (value) } }
            }

            @if let Some(note) = note {
                p class="mt-2" { (note) }
            }
        }
    }
}

/// The first row of a function result.
fn first_row(rows: Vec<Record>) -> Result<Record, Error> {
    rows.into_iter()
        .next()
        .ok_or_else(|| Error::InvalidResponse("the function returned no rows".to_owned()))
}

/// The age in a passenger age result, or `None` if there is no such
/// passenger.
fn age_of(row: &Record) -> Option<String> {
    match row.get("age") {
        None | Some(Value::Null) => None,
        Some(value) => Some(record::display_value(value)),
    }
}

fn function_error_response(message: &str, error: Error) -> Response {
    let status_code = error.status_code();
    let alert = Alert::Error {
        message: message.to_owned(),
        details: error.to_string(),
    };

    (status_code, alert).into_response()
}

/// Looks up a passenger's age.
pub async fn get_passenger_age(
    State(state): State<FunctionsState>,
    Form(form): Form<AgeForm>,
) -> Response {
    let passenger_id = form.passenger_id;
    let result = async {
        first_row(
            state
                .api
                .list(&paths::passenger_age(passenger_id))
                .await?,
        )
    }
    .await;

    match result {
        Ok(row) => match age_of(&row) {
            Some(age) => result_panel(
                true,
                "Age Calculated",
                &[
                    ("Passenger ID", passenger_id.to_string()),
                    ("Age", format!("{age} years")),
                ],
                None,
            )
            .into_response(),
            None => result_panel(
                false,
                "Passenger Not Found",
                &[],
                Some(&format!("No passenger found with ID: {passenger_id}")),
            )
            .into_response(),
        },
        Err(error) => {
            tracing::error!("Could not calculate age of passenger {passenger_id}: {error}");
            function_error_response("Error calculating age", error)
        }
    }
}

/// Checks whether a seat is free.
pub async fn check_seat(
    State(state): State<FunctionsState>,
    Form(seat): Form<SeatCheck>,
) -> Response {
    let result = async {
        let rows = state
            .api
            .post(paths::CHECK_SEAT, &seat)
            .await?
            .decode::<Vec<Record>>()
            .into_data()?;
        first_row(rows)
    }
    .await;

    let row = match result {
        Ok(row) => row,
        Err(error) => {
            tracing::error!("Could not check seat {}: {error}", seat.seat_number);
            return function_error_response("Error checking seat availability", error);
        }
    };

    let is_available = record::form_value(&row, "status") == SEAT_AVAILABLE;
    let lines = [
        ("Schedule ID", seat.schedule_id.to_string()),
        ("Journey Date", format_date(&seat.journey_date)),
        ("Seat", seat.seat_number.clone()),
    ];

    if is_available {
        result_panel(
            true,
            "Seat Available",
            &lines,
            Some("This seat is available for booking!"),
        )
        .into_response()
    } else {
        result_panel(
            false,
            "Seat Not Available",
            &lines,
            Some("This seat is already booked!"),
        )
        .into_response()
    }
}

/// The outcome of looking up one passenger in the combined lookup.
#[derive(Debug, Clone, PartialEq)]
struct AgeLookup {
    passenger_id: i64,
    /// `None` if the lookup failed.
    age: Option<String>,
}

async fn lookup_age(api: ApiClient, passenger_id: i64) -> AgeLookup {
    let envelope = api
        .call::<Value>(&paths::passenger_age(passenger_id), Method::GET, None)
        .await;

    let age = envelope
        .decode::<Vec<Record>>()
        .into_data()
        .ok()
        .and_then(|rows| rows.into_iter().next())
        .map(|row| age_of(&row).unwrap_or_else(|| PLACEHOLDER.to_owned()));

    AgeLookup { passenger_id, age }
}

/// Look up the ages of `passenger_ids` concurrently, in the given order.
async fn lookup_ages(api: &ApiClient, passenger_ids: impl Iterator<Item = i64>) -> Vec<AgeLookup> {
    let tasks: Vec<_> = passenger_ids
        .map(|passenger_id| (passenger_id, tokio::spawn(lookup_age(api.clone(), passenger_id))))
        .collect();

    let mut lookups = Vec::with_capacity(tasks.len());

    for (passenger_id, task) in tasks {
        let lookup = task.await.unwrap_or_else(|error| {
            tracing::error!("Age lookup for passenger {passenger_id} panicked: {error}");
            AgeLookup {
                passenger_id,
                age: None,
            }
        });
        lookups.push(lookup);
    }

    lookups
}

/// Looks up the ages of several passengers at once.
pub async fn run_combined_lookup(State(state): State<FunctionsState>) -> Response {
    let start = Instant::now();
    let lookups = lookup_ages(&state.api, COMBINED_PASSENGER_IDS).await;
    let elapsed = start.elapsed();

    html! {
        div data-combined-result
        {
            h3 class="font-semibold mb-2" { "Combined Lookup Results" }

            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Passenger ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Age" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    }
                }

                tbody
                {
                    @for lookup in &lookups {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (lookup.passenger_id) }
                            @match &lookup.age {
                                Some(age) => {
                                    td class=(TABLE_CELL_STYLE) { (age) }
                                    td class=(TABLE_CELL_STYLE) { (badge("Success", Tone::Success)) }
                                }
                                None => {
                                    td class=(TABLE_CELL_STYLE) { "-" }
                                    td class=(TABLE_CELL_STYLE) { (badge("Error", Tone::Danger)) }
                                }
                            }
                        }
                    }
                }
            }

            p class="mt-2 text-sm text-gray-600 dark:text-gray-400"
            {
                "Completed in " (elapsed.as_millis()) " ms"
            }
        }
    }
    .into_response()
}
