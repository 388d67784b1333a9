use maud::{DOCTYPE, Markup, html};
use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc2822},
    macros::format_description,
};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full py-2 px-4 \
    text-sm font-medium text-gray-900 bg-white rounded border border-gray-200 \
    hover:bg-gray-100 hover:text-blue-700 focus:z-10 dark:bg-gray-800 \
    dark:text-gray-400 dark:border-gray-600 dark:hover:text-white \
    dark:hover:bg-gray-700";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_STYLE: &str = "w-full text-sm text-left rtl:text-right \
    text-gray-500 dark:text-gray-400";

pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Panels and cards
pub const CARD_STYLE: &str = "w-full rounded-lg border border-gray-200 bg-white p-6 \
    shadow-sm dark:border-gray-700 dark:bg-gray-800";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Transit Admin" }
                link href="/static/main.css" rel="stylesheet";

                script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/dist/response-targets.js" {}

                script src="/static/app.js" defer {}
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Modals are swapped in here and removed on close.
                div id="modal-container" {}

                // Toasts
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &content)
}

pub fn loading_spinner() -> Markup {
    // Spinner SVG adapted from https://flowbite.com/docs/components/spinner/
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-blue-600 w-4 h-4 me-2 mb-1 animate-spin"
            viewBox="0 0 100 101"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            path
                d="M100 50.5908C100 78.2051 77.6142 100.591 50 100.591C22.3858 100.591 0 78.2051 0 50.5908C0 22.9766 22.3858 0.59082 50 0.59082C77.6142 0.59082 100 22.9766 100 50.5908ZM9.08144 50.5908C9.08144 73.1895 27.4013 91.5094 50 91.5094C72.5987 91.5094 90.9186 73.1895 90.9186 50.5908C90.9186 27.9921 72.5987 9.67226 50 9.67226C27.4013 9.67226 9.08144 27.9921 9.08144 50.5908Z"
                fill="#E5E7EB" {}
            path
                d="M93.9676 39.0409C96.393 38.4038 97.8624 35.9116 97.0079 33.5539C95.2932 28.8227 92.871 24.3692 89.8167 20.348C85.8452 15.1192 80.8826 10.7238 75.2124 7.41289C69.5422 4.10194 63.2754 1.94025 56.7698 1.05124C51.7666 0.367541 46.6976 0.446843 41.7345 1.27873C39.2613 1.69328 37.813 4.19778 38.4501 6.62326C39.0873 9.04874 41.5694 10.4717 44.0505 10.1071C47.8511 9.54855 51.7191 9.52689 55.5402 10.0491C60.8642 10.7766 65.9928 12.5457 70.6331 15.2552C75.2735 17.9648 79.3347 21.5619 82.5849 25.841C84.9175 28.9121 86.7997 32.2913 88.1811 35.8758C89.083 38.2158 91.5421 39.6781 93.9676 39.0409Z"
                fill="currentColor" {}
        }
    }
}

/// The single row shown while a table body is waiting for its rows.
pub fn loading_row(colspan: usize) -> Markup {
    html! {
        tr data-placeholder="loading"
        {
            td colspan=(colspan) class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
            {
                (loading_spinner())
                "Loading data..."
            }
        }
    }
}

/// The single row shown when a table has no rows.
pub fn empty_row(colspan: usize, message: &str) -> Markup {
    html! {
        tr data-placeholder="empty"
        {
            td colspan=(colspan) class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
            {
                (message)
            }
        }
    }
}

/// The single row shown when the rows could not be loaded.
pub fn error_row(colspan: usize, message: &str) -> Markup {
    html! {
        tr data-placeholder="error"
        {
            td colspan=(colspan) class="px-6 py-4 text-center text-red-600 dark:text-red-400"
            {
                (message)
            }
        }
    }
}

/// The colour of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
    Warning,
    Info,
    Primary,
}

impl Tone {
    fn class(self) -> &'static str {
        match self {
            Tone::Success => {
                "text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300"
            }
            Tone::Danger => "text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300",
            Tone::Warning => {
                "text-yellow-800 bg-yellow-100 dark:bg-yellow-900 dark:text-yellow-300"
            }
            Tone::Info => "text-cyan-800 bg-cyan-100 dark:bg-cyan-900 dark:text-cyan-300",
            Tone::Primary => "text-blue-800 bg-blue-100 dark:bg-blue-900 dark:text-blue-300",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Danger => "danger",
            Tone::Warning => "warning",
            Tone::Info => "info",
            Tone::Primary => "primary",
        }
    }
}

/// The badge colour for a record status such as "Active" or "In Progress".
pub fn status_tone(status: &str) -> Tone {
    match status {
        "Active" | "Operational" | "Booked" | "Resolved" | "Completed" => Tone::Success,
        "Inactive" | "Closed" | "Cancelled" | "Rejected" | "Failed" => Tone::Danger,
        "Suspended" | "Maintenance" | "Expired" | "Pending" => Tone::Warning,
        "Used" | "In Progress" => Tone::Info,
        _ => Tone::Primary,
    }
}

pub fn badge(text: &str, tone: Tone) -> Markup {
    let class = format!(
        "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full {}",
        tone.class()
    );

    html! {
        span data-badge=(tone.name()) class=(class)
        {
            (text)
        }
    }
}

/// Group the digits of a whole number the Indian way: the last three digits,
/// then groups of two, e.g. "12,34,567".
fn group_digits(whole: u64) -> String {
    let digits = whole.to_string();

    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();

    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }

    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format an amount in Indian rupees, e.g. "₹1,23,456.70" or "-₹5.00".
///
/// Amounts that are not finite render as "N/A".
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "N/A".to_owned();
    }

    let paise = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && paise != 0 { "-" } else { "" };

    format!("{sign}₹{}.{:02}", group_digits(paise / 100), paise % 100)
}

/// Format a count with Indian digit grouping, e.g. "1,00,000".
pub fn format_count(count: f64) -> String {
    if !count.is_finite() {
        return "N/A".to_owned();
    }

    let whole = count.abs().round() as u64;
    let sign = if count < 0.0 && whole != 0 { "-" } else { "" };

    format!("{sign}{}", group_digits(whole))
}

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:none] [month repr:short] [year]");

/// Parse a date sent by the backend.
///
/// Accepts ISO 8601 dates and datetimes ("2025-01-01", "2025-01-01T10:00:00")
/// and RFC 2822 datetimes ("Wed, 01 Jan 2025 00:00:00 GMT").
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    if let Some(date) = text
        .get(..10)
        .and_then(|prefix| Date::parse(prefix, ISO_DATE_FORMAT).ok())
    {
        return Some(date);
    }

    let text = match text.strip_suffix(" GMT") {
        Some(text) => format!("{text} +0000"),
        None => text.to_owned(),
    };

    OffsetDateTime::parse(&text, &Rfc2822)
        .ok()
        .map(|datetime| datetime.date())
}

/// Format a date sent by the backend as e.g. "1 Jan 2025".
///
/// Text that is not a date is returned as is.
pub fn format_date(text: &str) -> String {
    parse_date(text)
        .and_then(|date| date.format(DISPLAY_DATE_FORMAT).ok())
        .unwrap_or_else(|| text.to_owned())
}

/// The value for an `<input type="date">`, e.g. "2025-01-01".
///
/// Text that is not a date is returned as is.
pub fn date_input_value(text: &str) -> String {
    parse_date(text)
        .and_then(|date| date.format(ISO_DATE_FORMAT).ok())
        .unwrap_or_else(|| text.to_owned())
}

/// A required input with a label above it.
pub fn input_field(name: &str, label: &str, input_type: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            input
                type=(input_type)
                id=(name)
                name=(name)
                required
                step=[(input_type == "number").then_some("any")]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}


#[cfg(test)]
mod date_tests {
    use super::{date_input_value, format_date};

    #[test]
    fn formats_iso_dates() {
        assert_eq!(format_date("2025-01-01"), "1 Jan 2025");
        assert_eq!(format_date("2025-03-15T10:30:00"), "15 Mar 2025");
    }

    #[test]
    fn formats_rfc_2822_dates() {
        assert_eq!(format_date("Wed, 01 Jan 2025 00:00:00 GMT"), "1 Jan 2025");
    }

    #[test]
    fn unparseable_text_is_returned_verbatim() {
        assert_eq!(format_date("tomorrow"), "tomorrow");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn date_inputs_use_iso_format() {
        assert_eq!(date_input_value("Wed, 01 Jan 2025 00:00:00 GMT"), "2025-01-01");
        assert_eq!(date_input_value("1990-05-20"), "1990-05-20");
    }
}
