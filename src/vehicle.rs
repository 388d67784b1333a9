//! The vehicles page.

use maud::Markup;

use crate::{
    api_client::paths,
    endpoints,
    html::Tone,
    listing::{Cell, Listing},
    modal::{Editable, FieldKind, FormField, add_button, edit_delete_actions},
    record::Record,
};

/// The fleet.
pub struct Vehicle;

impl Listing for Vehicle {
    const TITLE: &'static str = "Vehicles";
    const SINGULAR: &'static str = "Vehicle";
    const VIEW: &'static str = endpoints::VEHICLES_VIEW;
    const COLLECTION: &'static str = paths::VEHICLES;
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Number",
        "Type",
        "Model",
        "Capacity",
        "Registration",
        "Fuel",
        "Status",
        "Actions",
    ];
    const CHANGED_EVENT: &'static str = "vehicles-changed";

    fn cells(record: &Record) -> Vec<Cell> {
        vec![
            Cell::field(record, "VehicleID"),
            Cell::field(record, "VehicleNumber"),
            Cell::badge(record, "Type", Tone::Primary),
            Cell::field(record, "Model"),
            Cell::field(record, "Capacity"),
            Cell::field(record, "RegistrationNumber"),
            Cell::badge(record, "FuelType", Tone::Info),
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

impl Editable for Vehicle {
    const ID_KEY: &'static str = "VehicleID";
    const FIELDS: &'static [FormField] = &[
        FormField {
            name: "vehicleNumber",
            label: "Vehicle Number",
            record_key: Some("VehicleNumber"),
            kind: FieldKind::Text,
            required: true,
        },
        FormField {
            name: "type",
            label: "Type",
            record_key: Some("Type"),
            kind: FieldKind::Select(&["Bus", "Metro", "Train", "Tram"]),
            required: true,
        },
        FormField {
            name: "model",
            label: "Model",
            record_key: Some("Model"),
            kind: FieldKind::Text,
            required: false,
        },
        FormField {
            name: "capacity",
            label: "Capacity",
            record_key: Some("Capacity"),
            kind: FieldKind::Number,
            required: true,
        },
        FormField {
            name: "registrationNumber",
            label: "Registration Number",
            record_key: Some("RegistrationNumber"),
            kind: FieldKind::Text,
            required: true,
        },
        FormField {
            name: "fuelType",
            label: "Fuel Type",
            record_key: Some("FuelType"),
            kind: FieldKind::Select(&["Diesel", "CNG", "Electric", "Hybrid"]),
            required: true,
        },
        FormField {
            name: "status",
            label: "Status",
            record_key: Some("Status"),
            kind: FieldKind::Select(&["Active", "Maintenance", "Retired"]),
            required: true,
        },
    ];
}
