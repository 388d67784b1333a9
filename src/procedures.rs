//! The stored procedures page: booking a ticket and generating a revenue
//! report for a date range.

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::Alert,
    api_client::{ApiClient, paths},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, format_currency, format_date, input_field,
    },
    navigation::NavBar,
    record::{self, Record},
    report::revenue_report_view,
};

const PAYMENT_METHODS: [&str; 5] = ["UPI", "Card", "Cash", "Net Banking", "Wallet"];

/// The state needed for the procedure handlers.
#[derive(Debug, Clone)]
pub struct ProceduresState {
    pub api: ApiClient,
}

impl FromRef<AppState> for ProceduresState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// A ticket booking. This is both the form data and the JSON payload for
/// the booking procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub passenger_id: i64,
    pub schedule_id: i64,
    pub source_station_id: i64,
    pub dest_station_id: i64,
    pub seat_number: String,
    /// The journey date as "YYYY-MM-DD".
    pub journey_date: String,
    pub fare: f64,
    pub payment_method: String,
}

/// The date range of a revenue report, both ends included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReportRequest {
    pub start_date: String,
    pub end_date: String,
}

fn booking_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::BOOK_TICKET)
            hx-target="#booking-result"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            class="grid grid-cols-1 md:grid-cols-2 gap-4"
        {
            (input_field("passengerId", "Passenger ID", "number"))
            (input_field("scheduleId", "Schedule ID", "number"))
            (input_field("sourceStationId", "Source Station ID", "number"))
            (input_field("destStationId", "Destination Station ID", "number"))
            (input_field("seatNumber", "Seat Number", "text"))
            (input_field("journeyDate", "Journey Date", "date"))
            (input_field("fare", "Fare", "number"))

            div
            {
                label for="paymentMethod" class=(FORM_LABEL_STYLE) { "Payment Method" }
                select id="paymentMethod" name="paymentMethod" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for method in PAYMENT_METHODS {
                        option value=(method) { (method) }
                    }
                }
            }

            div class="md:col-span-2"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Book Ticket" }
            }
        }

        div id="booking-result" class="mt-4" {}
    }
}

fn revenue_report_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::REVENUE_REPORT)
            hx-target="#revenue-report-result"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            class="grid grid-cols-1 md:grid-cols-2 gap-4"
        {
            (input_field("startDate", "Start Date", "date"))
            (input_field("endDate", "End Date", "date"))

            div class="md:col-span-2"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Generate Report" }
            }
        }

        div id="revenue-report-result" class="mt-6" {}
    }
}

/// Renders the procedures page.
pub async fn get_procedures_page() -> Response {
    let nav_bar = NavBar::new(endpoints::PROCEDURES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-6 w-full lg:max-w-6xl"
            {
                h1 class="text-xl font-bold" { "Stored Procedures" }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Book Ticket" }
                    (booking_form_view())
                }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Revenue Report" }
                    (revenue_report_form_view())
                }
            }
        }
    };

    base("Procedures", &content).into_response()
}

fn booking_success_view(details: &Record) -> Markup {
    let amount = record::number(details, "Amount")
        .map(format_currency)
        .unwrap_or_else(|| record::display(details, "Amount"));
    let journey_date = match record::form_value(details, "JourneyDate") {
        date if date.is_empty() => record::PLACEHOLDER.to_owned(),
        date => format_date(&date),
    };

    let rows = [
        ("Ticket Number", record::display(details, "TicketNumber")),
        ("Ticket Code", record::display(details, "TicketCode")),
        ("Transaction Code", record::display(details, "TransactionCode")),
        ("Seat", record::display(details, "SeatNumber")),
        ("Journey Date", journey_date),
        ("Amount Paid", amount),
    ];

    html! {
        div
            class="p-4 rounded-lg border border-green-300 bg-green-50 text-green-900
                dark:bg-gray-800 dark:text-green-300 dark:border-green-800"
            data-booking-success
        {
            h3 class="text-lg font-semibold mb-2" { "Ticket Booked Successfully!" }

            dl class="grid grid-cols-2 gap-x-4 gap-y-1 text-sm"
            {
                @for (label, value) in rows {
                    dt class="font-medium" { (label) }
                    dd { (value) }
                }
            }
        }
    }
}

/// A failure toast prefixed with what was being attempted.
fn failure_response(action: &str, error: Error) -> Response {
    let status_code = error.status_code();
    let alert = Alert::ErrorSimple {
        message: format!("{action} failed: {error}"),
    };

    (status_code, alert).into_response()
}

async fn book(api: &ApiClient, booking: &BookingRequest) -> Result<Record, Error> {
    let result_sets = api
        .post(paths::BOOK_TICKET, booking)
        .await?
        .decode::<Vec<Vec<Record>>>()
        .into_data()?;

    result_sets
        .into_iter()
        .next()
        .and_then(|rows| rows.into_iter().next())
        .ok_or_else(|| Error::InvalidResponse("the booking returned no ticket".to_owned()))
}

/// Books a ticket and shows the booking details.
pub async fn book_ticket(
    State(state): State<ProceduresState>,
    Form(booking): Form<BookingRequest>,
) -> Response {
    match book(&state.api, &booking).await {
        Ok(details) => {
            tracing::info!(
                "Booked seat {} on schedule {} for passenger {}",
                booking.seat_number,
                booking.schedule_id,
                booking.passenger_id
            );
            booking_success_view(&details).into_response()
        }
        Err(error) => {
            tracing::error!("Could not book ticket: {error}");
            failure_response("Booking", error)
        }
    }
}

/// Runs the revenue report procedure and renders its result sets.
pub async fn generate_revenue_report(
    State(state): State<ProceduresState>,
    Form(request): Form<RevenueReportRequest>,
) -> Response {
    let result = async {
        state
            .api
            .post(paths::REVENUE_REPORT, &request)
            .await?
            .decode::<Vec<Vec<Record>>>()
            .into_data()
    }
    .await;

    match result {
        Ok(groups) => revenue_report_view(&groups).into_response(),
        Err(error) => {
            tracing::error!("Could not generate revenue report: {error}");
            failure_response("Report generation", error)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Form,
        extract::State,
        http::{Method, StatusCode},
    };
    use serde_json::json;

    use crate::{
        api_client::ApiClient,
        test_utils::{
            MockBackend, assert_form_input, assert_hx_endpoint, assert_status, assert_valid_html,
            must_get_form, parse_html_document, response_text,
        },
    };

    use super::{
        BookingRequest, ProceduresState, RevenueReportRequest, book_ticket,
        generate_revenue_report, get_procedures_page,
    };

    fn state_for(backend: &MockBackend) -> State<ProceduresState> {
        State(ProceduresState {
            api: ApiClient::new(&backend.base_url()),
        })
    }

    fn booking() -> BookingRequest {
        BookingRequest {
            passenger_id: 1,
            schedule_id: 2,
            source_station_id: 1,
            dest_station_id: 2,
            seat_number: "A1".to_owned(),
            journey_date: "2025-01-01".to_owned(),
            fare: 150.0,
            payment_method: "UPI".to_owned(),
        }
    }

    #[tokio::test]
    async fn page_has_booking_form() {
        let response = get_procedures_page().await;

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/procedures/book-ticket", "hx-post");
        assert_form_input(&form, "passengerId", "number");
        assert_form_input(&form, "journeyDate", "date");
        assert_form_input(&form, "paymentMethod", "select");
    }

    #[tokio::test]
    async fn successful_booking_shows_ticket_details() {
        let backend = MockBackend::start().await.respond(
            Method::POST,
            "/api/book-ticket",
            json!({"success": true, "data": [[{
                "TicketNumber": 1001,
                "TicketCode": "TKT-1001",
                "TransactionCode": "TXN-5001",
                "SeatNumber": "A1",
                "JourneyDate": "Wed, 01 Jan 2025 00:00:00 GMT",
                "Amount": 150.0,
            }]]}),
        );

        let response = book_ticket(state_for(&backend), Form(booking())).await;

        assert_status(&response, StatusCode::OK);
        let text = response_text(response).await;
        assert!(text.contains("Ticket Booked Successfully!"));
        assert!(text.contains("A1"));
        assert!(text.contains("₹150.00"));
        assert!(text.contains("1 Jan 2025"));
    }

    #[tokio::test]
    async fn booking_sends_camel_case_payload() {
        let backend = MockBackend::start().await.respond(
            Method::POST,
            "/api/book-ticket",
            json!({"success": true, "data": [[{"SeatNumber": "A1", "Amount": 150}]]}),
        );

        let _ = book_ticket(state_for(&backend), Form(booking())).await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body,
            Some(json!({
                "passengerId": 1,
                "scheduleId": 2,
                "sourceStationId": 1,
                "destStationId": 2,
                "seatNumber": "A1",
                "journeyDate": "2025-01-01",
                "fare": 150.0,
                "paymentMethod": "UPI",
            }))
        );
        assert_eq!(calls[0].content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn failed_booking_shows_toast() {
        let backend = MockBackend::start().await.respond(
            Method::POST,
            "/api/book-ticket",
            json!({"success": false, "error": "Seat A1 is already booked"}),
        );

        let response = book_ticket(state_for(&backend), Form(booking())).await;

        assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
        let text = response_text(response).await;
        assert!(text.contains("Booking failed: Seat A1 is already booked"));
    }

    #[tokio::test]
    async fn booking_without_rows_is_a_failure() {
        let backend = MockBackend::start().await.respond(
            Method::POST,
            "/api/book-ticket",
            json!({"success": true, "data": []}),
        );

        let response = book_ticket(state_for(&backend), Form(booking())).await;

        assert_status(&response, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn revenue_report_renders_result_sets() {
        let backend = MockBackend::start().await.respond(
            Method::POST,
            "/api/revenue-report",
            json!({"success": true, "data": [
                [{"TotalTransactions": 3, "TotalRevenue": 450, "AverageTransaction": 150,
                  "MinTransaction": 100, "MaxTransaction": 200}],
            ]}),
        );
        let request = RevenueReportRequest {
            start_date: "2025-01-01".to_owned(),
            end_date: "2025-01-31".to_owned(),
        };

        let response = generate_revenue_report(state_for(&backend), Form(request)).await;

        let text = response_text(response).await;
        assert!(text.contains("Revenue Summary (₹450.00)"));
        assert_eq!(
            backend.calls()[0].body,
            Some(json!({"startDate": "2025-01-01", "endDate": "2025-01-31"}))
        );
    }

    #[tokio::test]
    async fn failed_revenue_report_shows_toast() {
        let backend = MockBackend::start().await.respond(
            Method::POST,
            "/api/revenue-report",
            json!({"success": false, "error": "Invalid date range"}),
        );
        let request = RevenueReportRequest {
            start_date: "2025-02-01".to_owned(),
            end_date: "2025-01-01".to_owned(),
        };

        let response = generate_revenue_report(state_for(&backend), Form(request)).await;

        let text = response_text(response).await;
        assert!(text.contains("Report generation failed: Invalid date range"));
    }
}
