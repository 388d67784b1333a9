//! The passes page, read-only.

use crate::{
    api_client::paths,
    endpoints,
    html::Tone,
    listing::{Cell, Listing},
    record::Record,
};

/// Travel passes held by passengers.
pub struct Pass;

impl Listing for Pass {
    const TITLE: &'static str = "Passes";
    const SINGULAR: &'static str = "Pass";
    const VIEW: &'static str = endpoints::PASSES_VIEW;
    const COLLECTION: &'static str = paths::PASSES;
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Code",
        "Passenger",
        "Type",
        "Start Date",
        "End Date",
        "Price",
        "Status",
    ];
    const CHANGED_EVENT: &'static str = "passes-changed";

    fn cells(record: &Record) -> Vec<Cell> {
        vec![
            Cell::field(record, "PassID"),
            Cell::field(record, "PassCode"),
            Cell::field(record, "PassengerName"),
            Cell::badge(record, "PassType", Tone::Primary),
            Cell::date(record, "StartDate"),
            Cell::date(record, "EndDate"),
            Cell::currency(record, "Price"),
            Cell::status(record, "PassStatus"),
        ]
    }
}
