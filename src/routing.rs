//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    complaint::{Complaint, get_resolve_modal, update_complaint_status},
    endpoints::{self, nested},
    functions::{check_seat, get_functions_page, get_passenger_age, run_combined_lookup},
    internal_server_error::get_internal_server_error_page,
    listing::{Listing, export_csv, get_listing_page, get_rows},
    modal::{Editable, delete_record, get_edit_modal, get_new_modal, save_record},
    not_found::get_404_not_found,
    pass::Pass,
    passenger::Passenger,
    procedures::{book_ticket, generate_revenue_report, get_procedures_page},
    queries::{get_queries_page, run_all_queries, run_query},
    report::{
        get_daily_bookings, get_payment_methods, get_popular_routes, get_reports_page,
    },
    station::Station,
    ticket::Ticket,
    triggers::{get_trigger_test, get_triggers_page},
    vehicle::Vehicle,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .merge(editable_routes::<Passenger>())
        .merge(editable_routes::<Station>())
        .merge(editable_routes::<Vehicle>())
        .merge(listing_routes::<Ticket>())
        .merge(listing_routes::<Pass>())
        .merge(listing_routes::<Complaint>())
        .route(endpoints::RESOLVE_COMPLAINT_VIEW, get(get_resolve_modal))
        .route(endpoints::COMPLAINT_STATUS, put(update_complaint_status))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::DAILY_BOOKINGS_REPORT, get(get_daily_bookings))
        .route(endpoints::POPULAR_ROUTES_REPORT, get(get_popular_routes))
        .route(endpoints::PAYMENT_METHODS_REPORT, get(get_payment_methods))
        .route(endpoints::PROCEDURES_VIEW, get(get_procedures_page))
        .route(endpoints::BOOK_TICKET, post(book_ticket))
        .route(endpoints::REVENUE_REPORT, post(generate_revenue_report))
        .route(endpoints::FUNCTIONS_VIEW, get(get_functions_page))
        .route(endpoints::PASSENGER_AGE, post(get_passenger_age))
        .route(endpoints::CHECK_SEAT, post(check_seat))
        .route(endpoints::COMBINED_LOOKUP, post(run_combined_lookup))
        .route(endpoints::QUERIES_VIEW, get(get_queries_page))
        .route(endpoints::RUN_QUERY, post(run_query))
        .route(endpoints::RUN_ALL_QUERIES, post(run_all_queries))
        .route(endpoints::TRIGGERS_VIEW, get(get_triggers_page))
        .route(endpoints::TRIGGER_TEST, get(get_trigger_test))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The read-only routes of a listing page.
fn listing_routes<L: Listing>() -> Router<AppState> {
    Router::new()
        .route(L::VIEW, get(get_listing_page::<L>))
        .route(&nested(L::VIEW, endpoints::ROWS), get(get_rows::<L>))
        .route(&nested(L::VIEW, endpoints::EXPORT_CSV), get(export_csv::<L>))
}

/// The routes of a listing page whose records can be added, edited and
/// deleted.
fn editable_routes<E: Editable>() -> Router<AppState> {
    Router::new()
        .route(
            E::VIEW,
            get(get_listing_page::<E>).post(save_record::<E>),
        )
        .route(&nested(E::VIEW, endpoints::ROWS), get(get_rows::<E>))
        .route(&nested(E::VIEW, endpoints::EXPORT_CSV), get(export_csv::<E>))
        .route(&nested(E::VIEW, endpoints::NEW), get(get_new_modal::<E>))
        .route(&nested(E::VIEW, endpoints::EDIT), get(get_edit_modal::<E>))
        .route(
            &nested(E::VIEW, endpoints::RECORD),
            axum::routing::delete(delete_record::<E>),
        )
}

/// The root path '/' redirects to the passengers page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::PASSENGERS_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::{Method, StatusCode};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{AppState, routing::build_router, test_utils::MockBackend};

    fn server_for(backend: &MockBackend) -> TestServer {
        let app = build_router(AppState::new(&backend.base_url()));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let backend = MockBackend::start().await;
        let server = server_for(&backend);

        let response = server.get("/timetables").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn rows_route_filters_records() {
        let backend = MockBackend::start().await.respond(
            Method::GET,
            "/api/stations",
            json!({"success": true, "data": [
                {"StationID": 1, "StationCode": "CST", "Name": "Central", "Location": "Fort",
                 "Type": "Railway", "Zone": "A", "Status": "Operational"},
                {"StationID": 2, "StationCode": "AND", "Name": "Andheri", "Location": "West",
                 "Type": "Metro", "Zone": "B", "Status": "Operational"},
            ]}),
        );
        let server = server_for(&backend);

        let response = server
            .get("/stations/rows")
            .add_query_param("search", "andheri")
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("Andheri"));
    }

    #[tokio::test]
    async fn edit_route_renders_modal() {
        let backend = MockBackend::start().await.respond(
            Method::GET,
            "/api/vehicles/7",
            json!({"success": true, "data": [
                {"VehicleID": 7, "VehicleNumber": "MH-01-1234", "Type": "Bus", "Status": "Active"},
            ]}),
        );
        let server = server_for(&backend);

        let response = server.get("/vehicles/7/edit").await;

        response.assert_status_ok();
        assert!(response.text().contains("MH-01-1234"));
    }

    #[tokio::test]
    async fn delete_route_needs_confirmation() {
        let backend = MockBackend::start().await;
        let server = server_for(&backend);

        let response = server.delete("/passengers/3").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_route_calls_backend() {
        let backend = MockBackend::start().await.respond(
            Method::DELETE,
            "/api/passengers/3",
            json!({"success": true, "message": "Passenger deleted"}),
        );
        let server = server_for(&backend);

        let response = server
            .delete("/passengers/3")
            .add_query_param("confirmed", "true")
            .await;

        response.assert_status_ok();
        assert_eq!(backend.calls_with_method(Method::DELETE).len(), 1);
    }

    #[tokio::test]
    async fn unknown_query_kind_is_rejected() {
        let backend = MockBackend::start().await;
        let server = server_for(&backend);

        let response = server.post("/queries/run/cartesian").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn query_runs_are_counted_by_each_page() {
        let backend = MockBackend::start().await.respond(
            Method::GET,
            "/api/query/aggregate",
            json!({"success": true, "data": []}),
        );
        let server = server_for(&backend);

        let first_run = server
            .post("/queries/run/aggregate")
            .form(&[("runs", "0")])
            .await;
        first_run.assert_status_ok();
        assert!(first_run.text().contains(r#"name="runs" value="1""#));

        // Another tab loaded after that run still starts from zero.
        let page = server.get("/queries").await;
        page.assert_status_ok();
        assert!(page.text().contains(r#"name="runs" value="0""#));

        let second_run = server
            .post("/queries/run/aggregate")
            .form(&[("runs", "0")])
            .await;
        assert!(second_run.text().contains(r#"name="runs" value="1""#));
    }

    #[tokio::test]
    async fn trigger_route_renders_modal() {
        let backend = MockBackend::start().await;
        let server = server_for(&backend);

        let response = server.get("/triggers/payment-no-ref").await;

        response.assert_status_ok();
        assert!(
            response
                .text()
                .contains("Payment must be associated with either a Ticket or a Pass")
        );
    }
}
