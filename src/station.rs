//! The stations page.

use maud::Markup;

use crate::{
    api_client::paths,
    endpoints,
    html::Tone,
    listing::{Cell, Listing},
    modal::{Editable, FieldKind, FormField, add_button, edit_delete_actions},
    record::Record,
};

/// Stations and stops on the network.
pub struct Station;

impl Listing for Station {
    const TITLE: &'static str = "Stations";
    const SINGULAR: &'static str = "Station";
    const VIEW: &'static str = endpoints::STATIONS_VIEW;
    const COLLECTION: &'static str = paths::STATIONS;
    const COLUMNS: &'static [&'static str] = &[
        "ID", "Code", "Name", "Location", "Type", "Zone", "Status", "Actions",
    ];
    const CHANGED_EVENT: &'static str = "stations-changed";

    fn cells(record: &Record) -> Vec<Cell> {
        vec![
            Cell::field(record, "StationID"),
            Cell::field(record, "StationCode"),
            Cell::field(record, "Name"),
            Cell::field(record, "Location"),
            Cell::badge(record, "Type", Tone::Info),
            Cell::field(record, "Zone"),
            Cell::status(record, "Status"),
        ]
    }

    fn row_actions(record: &Record) -> Option<Markup> {
        edit_delete_actions::<Self>(record)
    }

    fn toolbar() -> Markup {
        add_button::<Self>()
    }
}

impl Editable for Station {
    const ID_KEY: &'static str = "StationID";
    const FIELDS: &'static [FormField] = &[
        FormField {
            name: "stationCode",
            label: "Station Code",
            record_key: Some("StationCode"),
            kind: FieldKind::Text,
            required: true,
        },
        FormField {
            name: "name",
            label: "Name",
            record_key: Some("Name"),
            kind: FieldKind::Text,
            required: true,
        },
        FormField {
            name: "location",
            label: "Location",
            record_key: Some("Location"),
            kind: FieldKind::Text,
            required: true,
        },
        FormField {
            name: "type",
            label: "Type",
            record_key: Some("Type"),
            kind: FieldKind::Select(&["Bus Stop", "Metro", "Railway", "Terminal"]),
            required: true,
        },
        FormField {
            name: "capacity",
            label: "Capacity",
            record_key: Some("Capacity"),
            kind: FieldKind::Number,
            required: false,
        },
        FormField {
            name: "zone",
            label: "Zone",
            record_key: Some("Zone"),
            kind: FieldKind::Text,
            required: false,
        },
        FormField {
            name: "status",
            label: "Status",
            record_key: Some("Status"),
            kind: FieldKind::Select(&["Operational", "Maintenance", "Closed"]),
            required: true,
        },
    ];
}
