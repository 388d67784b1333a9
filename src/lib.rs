//! Transit Admin is the operations panel for a transit network: passengers,
//! stations, vehicles, tickets, passes, complaints and revenue reports.
//!
//! This library serves HTML pages and htmx fragments. All data is owned by
//! the transit backend, which this server reaches over its JSON API through
//! [ApiClient].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod api_client;
mod app_state;
mod complaint;
mod endpoints;
mod filter;
mod functions;
mod html;
mod internal_server_error;
mod listing;
mod logging;
mod modal;
mod navigation;
mod not_found;
mod pass;
mod passenger;
mod procedures;
mod queries;
mod record;
mod report;
mod routing;
mod station;
mod ticket;
mod triggers;
mod vehicle;

#[cfg(test)]
mod test_utils;

pub use api_client::{ApiClient, Envelope};
pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFound};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transit API could not be reached, e.g. connection refused.
    #[error("could not reach the transit API: {0}")]
    Transport(String),

    /// The transit API responded, but the body was not a valid envelope, or
    /// the envelope was missing the data the caller needed.
    #[error("the transit API sent an invalid response: {0}")]
    InvalidResponse(String),

    /// The transit API reported a failure (`success: false`).
    ///
    /// The string is the message from the envelope and is safe to show to
    /// the user.
    #[error("{0}")]
    Backend(String),

    /// The requested record does not exist.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A delete request arrived without the user's confirmation.
    #[error("the deletion was not confirmed")]
    DeleteNotConfirmed,

    /// The record changed on the server after the edit form was opened.
    #[error("the record was changed by someone else while it was being edited")]
    EditConflict,

    /// Writing records as CSV failed.
    #[error("could not export CSV: {0}")]
    CsvExport(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFound.into_response(),
            Error::Transport(_) | Error::InvalidResponse(_) => {
                tracing::error!("The transit API failed: {}", self);
                InternalServerError {
                    description: "The transit API is unavailable.",
                    fix: "Check that the backend is running and try again.",
                }
                .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// The HTTP status code to send alongside an alert for this error.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Transport(_) | Error::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            Error::Backend(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DeleteNotConfirmed => StatusCode::BAD_REQUEST,
            Error::EditConflict => StatusCode::CONFLICT,
            Error::CsvExport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error as a toast for htmx requests.
    ///
    /// Transport and backend failures are shown to the user the same way;
    /// the difference only shows up in the status code and the logs.
    fn into_alert_response(self) -> Response {
        let status_code = self.status_code();

        let alert = match self {
            Error::Transport(message) | Error::InvalidResponse(message) => {
                tracing::error!("The transit API failed: {message}");
                Alert::Error {
                    message: format!("Error: {message}"),
                    details: "The transit API could not be reached. Try again in a moment."
                        .to_owned(),
                }
            }
            Error::Backend(message) => Alert::ErrorSimple {
                message: format!("Error: {message}"),
            },
            Error::NotFound => Alert::Error {
                message: "Error: Record not found".to_owned(),
                details: "Try refreshing the page to see if it has already been deleted."
                    .to_owned(),
            },
            Error::DeleteNotConfirmed => Alert::ErrorSimple {
                message: "Error: Deletion was not confirmed".to_owned(),
            },
            Error::EditConflict => Alert::Error {
                message: "Error: This record was changed by someone else".to_owned(),
                details: "Close the form and open it again to edit the latest version."
                    .to_owned(),
            },
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
            }
        };

        (status_code, alert).into_response()
    }
}
