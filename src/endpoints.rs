//! The URIs of this server's pages and htmx endpoints.
//!
//! For endpoints that take a parameter, e.g., '/complaints/{complaint_id}/resolve', use [format_endpoint].

/// The root route which redirects to the passengers page.
pub const ROOT: &str = "/";
/// The page listing passengers.
pub const PASSENGERS_VIEW: &str = "/passengers";
/// The page listing stations.
pub const STATIONS_VIEW: &str = "/stations";
/// The page listing vehicles.
pub const VEHICLES_VIEW: &str = "/vehicles";
/// The page listing tickets.
pub const TICKETS_VIEW: &str = "/tickets";
/// The page listing passes.
pub const PASSES_VIEW: &str = "/passes";
/// The page listing complaints.
pub const COMPLAINTS_VIEW: &str = "/complaints";
/// The modal for resolving a complaint.
pub const RESOLVE_COMPLAINT_VIEW: &str = "/complaints/{complaint_id}/resolve";
/// The route to update a complaint's status.
pub const COMPLAINT_STATUS: &str = "/complaints/{complaint_id}/status";
/// The reports page.
pub const REPORTS_VIEW: &str = "/reports";
/// The daily bookings report fragment.
pub const DAILY_BOOKINGS_REPORT: &str = "/reports/daily-bookings";
/// The popular routes report fragment.
pub const POPULAR_ROUTES_REPORT: &str = "/reports/popular-routes";
/// The payment methods report fragment.
pub const PAYMENT_METHODS_REPORT: &str = "/reports/payment-methods";
/// The stored procedures page.
pub const PROCEDURES_VIEW: &str = "/procedures";
/// The route to book a ticket.
pub const BOOK_TICKET: &str = "/procedures/book-ticket";
/// The route to generate a revenue report.
pub const REVENUE_REPORT: &str = "/procedures/revenue-report";
/// The database functions page.
pub const FUNCTIONS_VIEW: &str = "/functions";
/// The route to look up a passenger's age.
pub const PASSENGER_AGE: &str = "/functions/passenger-age";
/// The route to check whether a seat is free.
pub const CHECK_SEAT: &str = "/functions/check-seat";
/// The route to look up several passengers' ages at once.
pub const COMBINED_LOOKUP: &str = "/functions/combined";
/// The ad-hoc queries page.
pub const QUERIES_VIEW: &str = "/queries";
/// The route to run a single query.
pub const RUN_QUERY: &str = "/queries/run/{kind}";
/// The route to run every query at once.
pub const RUN_ALL_QUERIES: &str = "/queries/run-all";
/// The trigger demonstrations page.
pub const TRIGGERS_VIEW: &str = "/triggers";
/// The modal describing a single trigger test.
pub const TRIGGER_TEST: &str = "/triggers/{test}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The table body of a listing page, relative to the page.
pub const ROWS: &str = "/rows";
/// The CSV export of a listing page, relative to the page.
pub const EXPORT_CSV: &str = "/export.csv";
/// The modal for creating a record, relative to the listing page.
pub const NEW: &str = "/new";
/// The modal for editing a record, relative to the listing page.
pub const EDIT: &str = "/{id}/edit";
/// A single record, relative to the listing page.
pub const RECORD: &str = "/{id}";

/// Join a listing page and one of its sub-routes, e.g. `/passengers` and
/// [ROWS] gives `/passengers/rows`.
pub fn nested(view: &str, route: &str) -> String {
    format!("{view}{route}")
}

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/complaints/{complaint_id}/status', '{complaint_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
