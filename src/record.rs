//! Records are the rows the transit backend sends back, kept as opaque JSON
//! objects. The helpers here turn fields into display text, form values and
//! numbers.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// A flat row from the transit backend, with keys in the order the server
/// sent them.
pub type Record = Map<String, Value>;

/// The text shown for a missing, `null` or empty field.
pub const PLACEHOLDER: &str = "N/A";

/// The text to display for `key`.
///
/// Missing, `null` and empty string fields render as [PLACEHOLDER].
pub fn display(record: &Record, key: &str) -> String {
    match record.get(key) {
        Some(value) => display_value(value),
        None => PLACEHOLDER.to_owned(),
    }
}

/// The text to display for a single JSON value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_owned(),
        Value::String(text) if text.is_empty() => PLACEHOLDER.to_owned(),
        Value::String(text) => text.clone(),
        Value::Array(values) => values
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// The value to pre-fill a form input with.
///
/// Missing and `null` fields give the empty string.
pub fn form_value(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => display_value(other),
    }
}

/// Read a numeric field. The backend sends decimals either as JSON numbers
/// or as strings, so both are accepted.
pub fn number(record: &Record, key: &str) -> Option<f64> {
    record.get(key).and_then(value_as_number)
}

/// Interpret a JSON value as a number, see [number].
fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Read an integer identifier, e.g. `PassengerID`.
pub fn id(record: &Record, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// A fingerprint of the record as the server sent it.
///
/// Two records have the same fingerprint only if they have the same fields
/// with the same values in the same order.
pub fn fingerprint(record: &Record) -> String {
    let json = Value::Object(record.clone()).to_string();
    let digest = Sha256::digest(json.as_bytes());

    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}
