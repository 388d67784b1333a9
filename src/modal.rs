//! Add, edit and delete for collections that can be changed.
//!
//! Modals are swapped into `#modal-container`. Submitting a form answers
//! with a toast for `#alert-container`; on success the response also fires
//! the collection's changed event (the table reloads once) and
//! [CLOSE_MODAL_EVENT]. On failure the modal stays open with the entered
//! values, and no event fires. Cancelling is handled in the browser and
//! never reaches the server.

use std::collections::HashMap;

use axum::{
    Form,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HX_TRIGGER;
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    AppState, Error,
    alert::Alert,
    api_client::{ApiClient, paths},
    endpoints::{self, format_endpoint, nested},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, date_input_value,
    },
    listing::Listing,
    record::{self, Record},
};

/// The htmx event that closes the open modal.
pub const CLOSE_MODAL_EVENT: &str = "close-modal";

/// The name of the hidden input holding the record identifier.
const ID_FIELD: &str = "id";
/// The name of the hidden input holding the record fingerprint.
const VERSION_FIELD: &str = "version";

/// The kind of input used for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Date,
    Number,
    /// A drop down with fixed options.
    Select(&'static [&'static str]),
    TextArea,
}

/// A field in an add/edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    /// The input name, which is also the key in the payload sent to the backend.
    pub name: &'static str,
    pub label: &'static str,
    /// The record field used to fill the input when editing. Fields without
    /// one start empty.
    pub record_key: Option<&'static str>,
    pub kind: FieldKind,
    pub required: bool,
}

/// A collection whose records can be added, edited and deleted.
pub trait Editable: Listing {
    /// The record field holding the identifier, e.g. "PassengerID".
    const ID_KEY: &'static str;
    /// The fields of the add/edit form, in payload order.
    const FIELDS: &'static [FormField];
}

/// The state needed for the modal route handlers.
#[derive(Debug, Clone)]
pub struct ModalState {
    pub api: ApiClient,
}

impl FromRef<AppState> for ModalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The outer frame of a modal: an overlay with a dialog box.
///
/// A click on the overlay outside the box, or on any `data-modal-close`
/// element, closes the modal (see `static/app.js`).
pub fn modal_view(title: &str, body: &Markup) -> Markup {
    html!(
        div
            data-modal-overlay
            class="fixed inset-0 z-50 flex items-center justify-center bg-gray-900/50 px-4"
        {
            div
                role="dialog"
                aria-modal="true"
                class="w-full max-w-lg max-h-[90vh] overflow-y-auto rounded-lg bg-white p-6
                    shadow-xl text-gray-900 dark:bg-gray-800 dark:text-white"
            {
                header class="flex items-center justify-between mb-4"
                {
                    h2 class="text-lg font-semibold" { (title) }

                    button
                        type="button"
                        data-modal-close
                        aria-label="Close"
                        class="text-2xl leading-none opacity-70 hover:opacity-100"
                    {
                        "×"
                    }
                }

                (body)
            }
        }
    )
}

fn field_view(field: &FormField, value: &str) -> Markup {
    let input_type = match field.kind {
        FieldKind::Email => "email",
        FieldKind::Tel => "tel",
        FieldKind::Date => "date",
        FieldKind::Number => "number",
        _ => "text",
    };

    html!(
        div
        {
            label for=(field.name) class=(FORM_LABEL_STYLE) { (field.label) }

            @match field.kind {
                FieldKind::Select(options) => {
                    select
                        id=(field.name)
                        name=(field.name)
                        required[field.required]
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for option in options {
                            option value=(option) selected[*option == value] { (option) }
                        }
                    }
                }
                FieldKind::TextArea => {
                    textarea
                        id=(field.name)
                        name=(field.name)
                        rows="3"
                        required[field.required]
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        (value)
                    }
                }
                _ => {
                    input
                        type=(input_type)
                        id=(field.name)
                        name=(field.name)
                        value=(value)
                        required[field.required]
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }
        }
    )
}

fn field_value(field: &FormField, record: Option<&Record>) -> String {
    let (Some(record), Some(key)) = (record, field.record_key) else {
        return String::new();
    };

    let value = record::form_value(record, key);

    match field.kind {
        FieldKind::Date if !value.is_empty() => date_input_value(&value),
        _ => value,
    }
}

/// The add/edit form. `record` is `None` when adding.
fn form_view<E: Editable>(record: Option<&Record>) -> Markup {
    let id = record
        .and_then(|record| record::id(record, E::ID_KEY))
        .map(|id| id.to_string())
        .unwrap_or_default();
    let version = record.map(record::fingerprint).unwrap_or_default();

    html!(
        form
            hx-post=(E::VIEW)
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            hx-swap="beforeend"
            class="space-y-4"
        {
            input type="hidden" name=(ID_FIELD) value=(id);
            input type="hidden" name=(VERSION_FIELD) value=(version);

            @for field in E::FIELDS {
                (field_view(field, &field_value(field, record)))
            }

            div class="flex gap-4 pt-2"
            {
                button type="button" data-modal-close class=(BUTTON_SECONDARY_STYLE) { "Cancel" }
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }
        }
    )
}

/// The button that opens the add modal.
pub fn add_button<E: Editable>() -> Markup {
    html!(
        button
            type="button"
            hx-get=(nested(E::VIEW, endpoints::NEW))
            hx-target="#modal-container"
            class=(LINK_STYLE)
        {
            "Add " (E::SINGULAR)
        }
    )
}

/// The edit and delete buttons for a row.
pub fn edit_delete_actions<E: Editable>(record: &Record) -> Option<Markup> {
    let id = record::id(record, E::ID_KEY)?;
    let edit_url = format_endpoint(&nested(E::VIEW, endpoints::EDIT), id);
    let delete_url = format_endpoint(&nested(E::VIEW, endpoints::RECORD), id);
    let confirm_message = format!(
        "Are you sure you want to delete this {}?",
        E::SINGULAR.to_lowercase()
    );

    Some(html!(
        button
            type="button"
            hx-get=(edit_url)
            hx-target="#modal-container"
            hx-target-error="#alert-container"
            class=(LINK_STYLE)
        {
            "Edit"
        }

        button
            type="button"
            hx-delete=(delete_url)
            hx-confirm=(confirm_message)
            hx-vals=r#"{"confirmed": "true"}"#
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            hx-swap="beforeend"
            class=(BUTTON_DELETE_STYLE)
        {
            "Delete"
        }
    ))
}

/// The response for a successful mutation: a toast plus the events that
/// reload the table and, if `close_modal`, close the modal.
pub fn mutation_success_response(message: String, changed_event: &str, close_modal: bool) -> Response {
    let events = if close_modal {
        format!("{changed_event}, {CLOSE_MODAL_EVENT}")
    } else {
        changed_event.to_owned()
    };

    ([(HX_TRIGGER, events)], Alert::SuccessSimple { message }).into_response()
}

/// Renders the empty add modal.
pub async fn get_new_modal<E: Editable>() -> Response {
    let title = format!("Add {}", E::SINGULAR);

    modal_view(&title, &form_view::<E>(None)).into_response()
}

/// Fetches a record and renders the edit modal filled with its fields.
pub async fn get_edit_modal<E: Editable>(
    State(state): State<ModalState>,
    Path(id): Path<i64>,
) -> Response {
    match state
        .api
        .fetch_one(&paths::record(E::COLLECTION, id))
        .await
    {
        Ok(record) => {
            let title = format!("Edit {}", E::SINGULAR);
            modal_view(&title, &form_view::<E>(Some(&record))).into_response()
        }
        Err(error) => {
            tracing::error!("Could not load {} {id} for editing: {error}", E::SINGULAR);
            error.into_alert_response()
        }
    }
}

/// Build the JSON payload from the submitted form, in field order.
///
/// Fields missing from the form are sent as empty strings.
fn payload<E: Editable>(form: &HashMap<String, String>) -> Map<String, Value> {
    E::FIELDS
        .iter()
        .map(|field| {
            let value = form.get(field.name).cloned().unwrap_or_default();
            (field.name.to_owned(), Value::String(value))
        })
        .collect()
}

async fn save<E: Editable>(api: &ApiClient, form: &HashMap<String, String>) -> Result<String, Error> {
    let id = form.get(ID_FIELD).map(|id| id.trim()).unwrap_or_default();
    let payload = payload::<E>(form);

    if id.is_empty() {
        api.post(E::COLLECTION, &payload).await?.into_success()?;
        return Ok(format!("{} added successfully", E::SINGULAR));
    }

    let id: i64 = id.parse().map_err(|_| Error::NotFound)?;
    let path = paths::record(E::COLLECTION, id);

    let version = form.get(VERSION_FIELD).map(String::as_str).unwrap_or_default();
    if !version.is_empty() {
        let current = api.fetch_one(&path).await?;

        if record::fingerprint(&current) != version {
            return Err(Error::EditConflict);
        }
    }

    api.put(&path, &payload).await?.into_success()?;
    Ok(format!("{} updated successfully", E::SINGULAR))
}

/// Creates the record when the hidden identifier is empty, updates it
/// otherwise.
pub async fn save_record<E: Editable>(
    State(state): State<ModalState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    match save::<E>(&state.api, &form).await {
        Ok(message) => mutation_success_response(message, E::CHANGED_EVENT, true),
        Err(error) => {
            tracing::error!("Could not save {}: {error}", E::SINGULAR);
            error.into_alert_response()
        }
    }
}

/// The confirmation sent by the delete button.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default)]
    confirmed: Option<String>,
}

impl DeleteConfirmation {
    fn is_confirmed(&self) -> bool {
        self.confirmed.as_deref() == Some("true")
    }
}

/// Deletes a record once the user has confirmed.
pub async fn delete_record<E: Editable>(
    State(state): State<ModalState>,
    Path(id): Path<i64>,
    Query(confirmation): Query<DeleteConfirmation>,
) -> Response {
    if !confirmation.is_confirmed() {
        return Error::DeleteNotConfirmed.into_alert_response();
    }

    let result = async {
        state
            .api
            .delete(&paths::record(E::COLLECTION, id))
            .await?
            .into_success()
    }
    .await;

    match result {
        Ok(()) => mutation_success_response(
            format!("{} deleted successfully", E::SINGULAR),
            E::CHANGED_EVENT,
            false,
        ),
        Err(error) => {
            tracing::error!("Could not delete {} {id}: {error}", E::SINGULAR);
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        Form,
        extract::{Path, Query, State},
        http::{Method, StatusCode},
    };
    use serde_json::{Value, json};

    use crate::{
        api_client::ApiClient,
        listing::{Cell, Listing},
        modal::{
            DeleteConfirmation, Editable, FieldKind, FormField, ModalState, delete_record,
            get_edit_modal, get_new_modal, save_record,
        },
        record::{self, Record},
        test_utils::{
            MockBackend, assert_form_input, assert_form_input_with_value, assert_hx_endpoint,
            assert_valid_html, get_header, must_get_form, parse_html_fragment,
        },
    };

    struct Depot;

    impl Listing for Depot {
        const TITLE: &'static str = "Depots";
        const SINGULAR: &'static str = "Depot";
        const VIEW: &'static str = "/depots";
        const COLLECTION: &'static str = "/api/depots";
        const COLUMNS: &'static [&'static str] = &["ID", "Name", "Actions"];
        const CHANGED_EVENT: &'static str = "depots-changed";

        fn cells(record: &Record) -> Vec<Cell> {
            vec![Cell::field(record, "DepotID"), Cell::field(record, "Name")]
        }
    }

    impl Editable for Depot {
        const ID_KEY: &'static str = "DepotID";
        const FIELDS: &'static [FormField] = &[
            FormField {
                name: "name",
                label: "Name",
                record_key: Some("Name"),
                kind: FieldKind::Text,
                required: true,
            },
            FormField {
                name: "openedOn",
                label: "Opened On",
                record_key: Some("OpenedOn"),
                kind: FieldKind::Date,
                required: false,
            },
            FormField {
                name: "status",
                label: "Status",
                record_key: Some("Status"),
                kind: FieldKind::Select(&["Operational", "Closed"]),
                required: true,
            },
            FormField {
                name: "notes",
                label: "Notes",
                record_key: None,
                kind: FieldKind::TextArea,
                required: false,
            },
        ];
    }

    fn depot() -> Record {
        serde_json::from_value(json!({
            "DepotID": 3,
            "Name": "Kurla",
            "OpenedOn": "Wed, 01 Jan 2025 00:00:00 GMT",
            "Status": "Closed",
        }))
        .unwrap()
    }

    fn state_for(backend: &MockBackend) -> State<ModalState> {
        State(ModalState {
            api: ApiClient::new(&backend.base_url()),
        })
    }

    fn form(fields: &[(&str, &str)]) -> Form<HashMap<String, String>> {
        Form(
            fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn add_modal_has_empty_identifier() {
        let response = get_new_modal::<Depot>().await;

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/depots", "hx-post");
        assert_form_input_with_value(&form, "id", "");
        assert_form_input_with_value(&form, "version", "");
        assert_form_input_with_value(&form, "name", "");
        assert_form_input(&form, "openedOn", "date");
        assert_form_input(&form, "status", "select");
        assert_form_input(&form, "notes", "textarea");
    }

    #[tokio::test]
    async fn edit_modal_is_filled_from_record() {
        let backend = MockBackend::start().await.respond(
            Method::GET,
            "/api/depots/3",
            json!({"success": true, "data": [depot()]}),
        );

        let response = get_edit_modal::<Depot>(state_for(&backend), Path(3)).await;

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "id", "3");
        assert_form_input_with_value(&form, "version", &record::fingerprint(&depot()));
        assert_form_input_with_value(&form, "name", "Kurla");
        assert_form_input_with_value(&form, "openedOn", "2025-01-01");
        assert_form_input_with_value(&form, "status", "Closed");
        assert_form_input_with_value(&form, "notes", "");
    }

    #[tokio::test]
    async fn opening_edit_modal_does_not_mutate() {
        let backend = MockBackend::start().await.respond(
            Method::GET,
            "/api/depots/3",
            json!({"success": true, "data": [depot()]}),
        );

        let _ = get_edit_modal::<Depot>(state_for(&backend), Path(3)).await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::GET);
    }

    #[tokio::test]
    async fn edit_modal_for_missing_record_is_not_found() {
        let backend = MockBackend::start().await.respond(
            Method::GET,
            "/api/depots/9",
            json!({"success": true, "data": []}),
        );

        let response = get_edit_modal::<Depot>(state_for(&backend), Path(9)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_posts_payload_and_fires_one_reload() {
        let backend = MockBackend::start().await.respond(
            Method::POST,
            "/api/depots",
            json!({"success": true, "affected_rows": 1, "lastrowid": 4}),
        );

        let response = save_record::<Depot>(
            state_for(&backend),
            form(&[
                ("id", ""),
                ("version", ""),
                ("name", "Thane"),
                ("openedOn", "2025-02-01"),
                ("status", "Operational"),
            ]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-trigger"), "depots-changed, close-modal");
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Depot added successfully"));

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::POST);
        assert_eq!(
            calls[0].body,
            Some(json!({
                "name": "Thane",
                "openedOn": "2025-02-01",
                "status": "Operational",
                "notes": "",
            }))
        );
    }

    #[tokio::test]
    async fn update_puts_to_record_path() {
        let backend = MockBackend::start()
            .await
            .respond(
                Method::GET,
                "/api/depots/3",
                json!({"success": true, "data": [depot()]}),
            )
            .respond(
                Method::PUT,
                "/api/depots/3",
                json!({"success": true, "affected_rows": 1}),
            );
        let version = record::fingerprint(&depot());

        let response = save_record::<Depot>(
            state_for(&backend),
            form(&[
                ("id", "3"),
                ("version", &version),
                ("name", "Kurla East"),
                ("status", "Operational"),
            ]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-trigger"), "depots-changed, close-modal");
        let puts = backend.calls_with_method(Method::PUT);
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].path, "/api/depots/3");
        assert_eq!(
            puts[0].body.as_ref().and_then(|body| body.get("name")),
            Some(&Value::String("Kurla East".to_owned()))
        );
        assert!(backend.calls_with_method(Method::POST).is_empty());
    }

    #[tokio::test]
    async fn changed_record_is_a_conflict_and_not_updated() {
        let mut changed = depot();
        changed.insert("Status".to_owned(), json!("Operational"));
        let backend = MockBackend::start()
            .await
            .respond(
                Method::GET,
                "/api/depots/3",
                json!({"success": true, "data": [changed]}),
            )
            .respond(
                Method::PUT,
                "/api/depots/3",
                json!({"success": true, "affected_rows": 1}),
            );
        let stale_version = record::fingerprint(&depot());

        let response = save_record::<Depot>(
            state_for(&backend),
            form(&[("id", "3"), ("version", &stale_version), ("name", "Kurla")]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(response.headers().get("hx-trigger").is_none());
        assert!(backend.calls_with_method(Method::PUT).is_empty());
    }

    #[tokio::test]
    async fn backend_failure_shows_error_without_reload() {
        let backend = MockBackend::start().await.respond(
            Method::POST,
            "/api/depots",
            json!({"success": false, "error": "Duplicate entry 'Thane'"}),
        );

        let response = save_record::<Depot>(
            state_for(&backend),
            form(&[("id", ""), ("name", "Thane")]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get("hx-trigger").is_none());
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Error: Duplicate entry 'Thane'"));
    }

    #[tokio::test]
    async fn unconfirmed_delete_makes_no_backend_call() {
        let backend = MockBackend::start().await.respond(
            Method::DELETE,
            "/api/depots/3",
            json!({"success": true, "affected_rows": 1}),
        );

        let response = delete_record::<Depot>(
            state_for(&backend),
            Path(3),
            Query(DeleteConfirmation::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_sends_exactly_one_delete() {
        let backend = MockBackend::start().await.respond(
            Method::DELETE,
            "/api/depots/3",
            json!({"success": true, "affected_rows": 1}),
        );

        let response = delete_record::<Depot>(
            state_for(&backend),
            Path(3),
            Query(DeleteConfirmation {
                confirmed: Some("true".to_owned()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-trigger"), "depots-changed");
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::DELETE);
        assert_eq!(calls[0].path, "/api/depots/3");
    }

    #[tokio::test]
    async fn failed_delete_does_not_reload() {
        let backend = MockBackend::start().await.respond(
            Method::DELETE,
            "/api/depots/3",
            json!({"success": false, "error": "Cannot delete a referenced depot"}),
        );

        let response = delete_record::<Depot>(
            state_for(&backend),
            Path(3),
            Query(DeleteConfirmation {
                confirmed: Some("true".to_owned()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get("hx-trigger").is_none());
    }
}
