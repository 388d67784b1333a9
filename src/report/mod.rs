//! Reports built from rows the backend has already aggregated.
//!
//! Includes the reports page, the bar charts and stat cards it is drawn
//! with, and the revenue report view used by the procedures page.

mod cards;
mod charts;
mod handlers;
mod revenue;

pub use handlers::{
    ReportState, get_daily_bookings, get_payment_methods, get_popular_routes, get_reports_page,
};
pub use revenue::revenue_report_view;
