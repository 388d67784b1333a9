//! Toast alerts for displaying success and error messages to users.
//!
//! Alerts are swapped into the `#alert-container` element defined in
//! [base](crate::html::base) and dismiss themselves after a few seconds
//! (see `static/app.js`). They can also be closed by hand.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// How long a toast stays on screen, in milliseconds.
pub const ALERT_DISPLAY_MS: u32 = 3000;

/// A toast message.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with extra details.
    Error { message: String, details: String },
    /// An error message on its own.
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (is_success, message, details) = match self {
            Alert::Success { message, details } => (true, message, Some(details)),
            Alert::SuccessSimple { message } => (true, message, None),
            Alert::Error { message, details } => (false, message, Some(details)),
            Alert::ErrorSimple { message } => (false, message, None),
        };

        let container_style = if is_success {
            "flex items-start justify-between gap-4 p-4 mb-4 rounded-lg shadow-lg \
            text-green-800 bg-green-50 border border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        } else {
            "flex items-start justify-between gap-4 p-4 mb-4 rounded-lg shadow-lg \
            text-red-800 bg-red-50 border border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        };

        html! {
            div
                role="alert"
                class=(container_style)
                data-toast=(if is_success { "success" } else { "danger" })
                data-auto-dismiss=(ALERT_DISPLAY_MS)
            {
                div
                {
                    p class="font-medium" { (message) }

                    @if let Some(details) = details.filter(|details| !details.is_empty()) {
                        p class="mt-1 text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    data-dismiss-toast
                    aria-label="Dismiss"
                    class="text-lg leading-none opacity-70 hover:opacity-100"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
