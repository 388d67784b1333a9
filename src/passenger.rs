//! The passengers page.

use maud::Markup;

use crate::{
    api_client::paths,
    endpoints,
    listing::{Cell, Listing},
    modal::{Editable, FieldKind, FormField, add_button, edit_delete_actions},
    record::{self, PLACEHOLDER, Record},
};

/// Registered passengers.
pub struct Passenger;

/// The passenger's full name, or "N/A" if neither name is set.
fn full_name(record: &Record) -> String {
    let names: Vec<String> = ["FirstName", "LastName"]
        .iter()
        .map(|key| record::form_value(record, key))
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        PLACEHOLDER.to_owned()
    } else {
        names.join(" ")
    }
}

impl Listing for Passenger {
    const TITLE: &'static str = "Passengers";
    const SINGULAR: &'static str = "Passenger";
    const VIEW: &'static str = endpoints::PASSENGERS_VIEW;
    const COLLECTION: &'static str = paths::PASSENGERS;
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Name",
        "Email",
        "Phone",
        "Date of Birth",
        "City",
        "Status",
        "Actions",
    ];
    const CHANGED_EVENT: &'static str = "passengers-changed";

    fn cells(record: &Record) -> Vec<Cell> {
        vec![
            Cell::field(record, "PassengerID"),
            Cell::Text(full_name(record)),
            Cell::field(record, "Email"),
            Cell::field(record, "PhoneNumbers"),
            Cell::date(record, "DateOfBirth"),
            Cell::field(record, "City"),
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

impl Editable for Passenger {
    const ID_KEY: &'static str = "PassengerID";
    const FIELDS: &'static [FormField] = &[
        FormField {
            name: "firstName",
            label: "First Name",
            record_key: Some("FirstName"),
            kind: FieldKind::Text,
            required: true,
        },
        FormField {
            name: "lastName",
            label: "Last Name",
            record_key: Some("LastName"),
            kind: FieldKind::Text,
            required: true,
        },
        FormField {
            name: "email",
            label: "Email",
            record_key: Some("Email"),
            kind: FieldKind::Email,
            required: true,
        },
        // Phone numbers live in their own table and are only set on creation.
        FormField {
            name: "phone",
            label: "Phone",
            record_key: None,
            kind: FieldKind::Tel,
            required: false,
        },
        FormField {
            name: "dateOfBirth",
            label: "Date of Birth",
            record_key: Some("DateOfBirth"),
            kind: FieldKind::Date,
            required: true,
        },
        FormField {
            name: "city",
            label: "City",
            record_key: Some("City"),
            kind: FieldKind::Text,
            required: false,
        },
        FormField {
            name: "address",
            label: "Address",
            record_key: Some("Address"),
            kind: FieldKind::TextArea,
            required: false,
        },
        FormField {
            name: "status",
            label: "Status",
            record_key: Some("Status"),
            kind: FieldKind::Select(&["Active", "Inactive", "Suspended"]),
            required: true,
        },
    ];
}
