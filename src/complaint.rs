//! The complaints page and the modal for resolving a complaint.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HX_TRIGGER;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    alert::Alert,
    api_client::paths,
    endpoints::{self, format_endpoint},
    filter::status_select,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, Tone,
    },
    listing::{Cell, Listing},
    modal::{CLOSE_MODAL_EVENT, ModalState, modal_view},
    record::{self, Record},
};

/// The statuses a complaint can be in.
const STATUSES: [&str; 4] = ["Pending", "In Progress", "Resolved", "Rejected"];

/// Complaints raised by passengers.
pub struct Complaint;

fn priority_tone(priority: &str) -> Tone {
    match priority {
        "Low" => Tone::Info,
        "Medium" => Tone::Warning,
        "High" | "Critical" => Tone::Danger,
        _ => Tone::Primary,
    }
}

impl Listing for Complaint {
    const TITLE: &'static str = "Complaints";
    const SINGULAR: &'static str = "Complaint";
    const VIEW: &'static str = endpoints::COMPLAINTS_VIEW;
    const COLLECTION: &'static str = paths::COMPLAINTS;
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Code",
        "Passenger",
        "Title",
        "Category",
        "Priority",
        "Status",
        "Raised",
        "Actions",
    ];
    const STATUS_COLUMN: Option<usize> = Some(6);
    const CHANGED_EVENT: &'static str = "complaints-changed";

    fn cells(record: &Record) -> Vec<Cell> {
        let priority = record::display(record, "Priority");
        let priority_tone = priority_tone(&priority);

        vec![
            Cell::field(record, "ComplaintID"),
            Cell::field(record, "ComplaintCode"),
            Cell::field(record, "PassengerName"),
            Cell::field(record, "Title"),
            Cell::badge(record, "Category", Tone::Info),
            Cell::Badge(priority, priority_tone),
            Cell::status(record, "Status"),
            Cell::date(record, "Timestamp"),
        ]
    }

    fn row_actions(record: &Record) -> Option<Markup> {
        let id = record::id(record, "ComplaintID")?;

        Some(html!(
            button
                type="button"
                hx-get=(format_endpoint(endpoints::RESOLVE_COMPLAINT_VIEW, id))
                hx-target="#modal-container"
                class=(LINK_STYLE)
            {
                "Resolve"
            }
        ))
    }

    fn toolbar() -> Markup {
        status_select(&STATUSES)
    }
}

fn resolve_form_view(complaint_id: i64) -> Markup {
    html!(
        form
            hx-put=(format_endpoint(endpoints::COMPLAINT_STATUS, complaint_id))
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            hx-swap="beforeend"
            class="space-y-4"
        {
            div
            {
                label for="status" class=(FORM_LABEL_STYLE) { "Status" }

                select id="status" name="status" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for status in STATUSES {
                        option value=(status) selected[status == "Resolved"] { (status) }
                    }
                }
            }

            div
            {
                label for="resolution" class=(FORM_LABEL_STYLE) { "Resolution" }

                textarea
                    id="resolution"
                    name="resolution"
                    rows="4"
                    placeholder="Describe how the complaint was handled"
                    class=(FORM_TEXT_INPUT_STYLE)
                {}
            }

            div class="flex gap-4 pt-2"
            {
                button type="button" data-modal-close class=(BUTTON_SECONDARY_STYLE) { "Cancel" }
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update" }
            }
        }
    )
}

/// Renders the modal for changing a complaint's status.
pub async fn get_resolve_modal(Path(complaint_id): Path<i64>) -> Response {
    let title = format!("Resolve Complaint #{complaint_id}");

    modal_view(&title, &resolve_form_view(complaint_id)).into_response()
}

/// The form data for changing a complaint's status. This is also the JSON
/// payload sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintStatusForm {
    pub status: String,
    #[serde(default)]
    pub resolution: String,
}

/// Sets the status and resolution of a complaint.
pub async fn update_complaint_status(
    State(state): State<ModalState>,
    Path(complaint_id): Path<i64>,
    Form(form): Form<ComplaintStatusForm>,
) -> Response {
    let result: Result<(), Error> = async {
        state
            .api
            .put(&paths::complaint_status(complaint_id), &form)
            .await?
            .into_success()
    }
    .await;

    match result {
        Ok(()) => (
            [(
                HX_TRIGGER,
                format!("{}, {CLOSE_MODAL_EVENT}", Complaint::CHANGED_EVENT),
            )],
            Alert::Success {
                message: "Complaint updated successfully".to_owned(),
                details: format!("Complaint #{complaint_id} is now {}.", form.status),
            },
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update complaint {complaint_id}: {error}");
            error.into_alert_response()
        }
    }
}
