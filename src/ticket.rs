//! The tickets page. Tickets are created through the booking procedure, so
//! the page is read-only.

use crate::{
    api_client::paths,
    endpoints,
    listing::{Cell, Listing},
    record::Record,
};

/// Booked journeys.
pub struct Ticket;

impl Listing for Ticket {
    const TITLE: &'static str = "Tickets";
    const SINGULAR: &'static str = "Ticket";
    const VIEW: &'static str = endpoints::TICKETS_VIEW;
    const COLLECTION: &'static str = paths::TICKETS;
    const COLUMNS: &'static [&'static str] = &[
        "Ticket No.",
        "Code",
        "Passenger",
        "From",
        "To",
        "Journey Date",
        "Seat",
        "Fare",
        "Status",
    ];
    const CHANGED_EVENT: &'static str = "tickets-changed";

    fn cells(record: &Record) -> Vec<Cell> {
        vec![
            Cell::field(record, "TicketNumber"),
            Cell::field(record, "TicketCode"),
            Cell::field(record, "PassengerName"),
            Cell::field(record, "SourceStation"),
            Cell::field(record, "DestinationStation"),
            Cell::date(record, "JourneyDate"),
            Cell::field(record, "SeatNumber"),
            Cell::currency(record, "Fare"),
            Cell::status(record, "TicketStatus"),
        ]
    }
}
