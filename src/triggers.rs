//! Demonstrations of the database triggers that guard payments and passes.
//!
//! The outcomes are fixed; nothing here runs against the backend.

use axum::{
    extract::Path,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    endpoints::{self, TRIGGER_TEST},
    html::{BUTTON_SECONDARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, Tone, badge, base},
    modal::modal_view,
    navigation::NavBar,
};

/// Which table a trigger guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerGroup {
    Payment,
    Pass,
}

/// One trigger test and the outcome the database gives for it.
#[derive(Debug)]
struct TriggerTest {
    slug: &'static str,
    group: TriggerGroup,
    title: &'static str,
    sql: &'static str,
    /// Whether the insert succeeds.
    accepted: bool,
    outcome: &'static str,
    explanation: &'static str,
}

static TRIGGER_TESTS: [TriggerTest; 7] = [
    TriggerTest {
        slug: "payment-valid",
        group: TriggerGroup::Payment,
        title: "Test 1: Valid Payment",
        sql: "INSERT INTO PAYMENT (
    TransactionCode, Amount, PaymentMethod,
    PassengerID, TicketNumber, Status
) VALUES (
    'TXN_TEST001', 50.00, 'UPI', 1, 1, 'Completed'
);",
        accepted: true,
        outcome: "Query OK, 1 row affected",
        explanation: "Payment inserted with a ticket reference.",
    },
    TriggerTest {
        slug: "payment-invalid",
        group: TriggerGroup::Payment,
        title: "Test 2: Both Ticket & Pass",
        sql: "INSERT INTO PAYMENT (
    TransactionCode, Amount, PaymentMethod,
    PassengerID, TicketNumber, PassID, Status
) VALUES (
    'TXN_TEST002', 50.00, 'UPI', 1, 1, 1, 'Completed'
);",
        accepted: false,
        outcome: "Payment cannot be associated with both a Ticket and a Pass",
        explanation: "The trigger rejects a payment that references a ticket and a pass.",
    },
    TriggerTest {
        slug: "payment-no-ref",
        group: TriggerGroup::Payment,
        title: "Test 3: No Reference",
        sql: "INSERT INTO PAYMENT (
    TransactionCode, Amount, PaymentMethod,
    PassengerID, Status
) VALUES (
    'TXN_TEST003', 50.00, 'UPI', 1, 'Completed'
);",
        accepted: false,
        outcome: "Payment must be associated with either a Ticket or a Pass",
        explanation: "The trigger requires every payment to reference something.",
    },
    TriggerTest {
        slug: "payment-refund",
        group: TriggerGroup::Payment,
        title: "Test 4: Excessive Refund",
        sql: "INSERT INTO PAYMENT (
    TransactionCode, Amount, PaymentMethod,
    PassengerID, TicketNumber, RefundAmount, Status
) VALUES (
    'TXN_TEST004', 50.00, 'UPI', 1, 1, 60.00, 'Refunded'
);",
        accepted: false,
        outcome: "Refund amount cannot exceed original amount",
        explanation: "The trigger caps refunds at the amount paid.",
    },
    TriggerTest {
        slug: "pass-future",
        group: TriggerGroup::Pass,
        title: "Test 1: Future Pass",
        sql: "INSERT INTO PASS (
    PassCode, PassType, StartDate, EndDate,
    Price, PassengerID
) VALUES (
    'PASS_TEST001', 'Monthly', '2025-12-01', '2025-12-31',
    1500.00, 1
);",
        accepted: true,
        outcome: "Query OK, PassStatus automatically set to 'Active'",
        explanation: "A pass that has not ended yet starts out Active.",
    },
    TriggerTest {
        slug: "pass-expired",
        group: TriggerGroup::Pass,
        title: "Test 2: Expired Pass",
        sql: "INSERT INTO PASS (
    PassCode, PassType, StartDate, EndDate,
    Price, PassengerID
) VALUES (
    'PASS_TEST002', 'Daily', '2024-01-01', '2024-01-02',
    100.00, 2
);",
        accepted: true,
        outcome: "Query OK, PassStatus automatically set to 'Expired'",
        explanation: "A pass whose end date has passed is stored as Expired.",
    },
    TriggerTest {
        slug: "pass-invalid",
        group: TriggerGroup::Pass,
        title: "Test 3: Invalid Dates",
        sql: "INSERT INTO PASS (
    PassCode, PassType, StartDate, EndDate,
    Price, PassengerID
) VALUES (
    'PASS_TEST003', 'Monthly', '2024-02-28', '2024-02-01',
    1500.00, 3
);",
        accepted: false,
        outcome: "Pass end date must be after start date",
        explanation: "The trigger rejects a pass that ends before it starts.",
    },
];

fn find_test(slug: &str) -> Option<&'static TriggerTest> {
    TRIGGER_TESTS.iter().find(|test| test.slug == slug)
}

fn test_url(test: &TriggerTest) -> String {
    TRIGGER_TEST.replace("{test}", test.slug)
}

fn test_button(test: &TriggerTest) -> Markup {
    html! {
        button
            type="button"
            hx-get=(test_url(test))
            hx-target="#modal-container"
            hx-target-error="#alert-container"
            class=(format!("{BUTTON_SECONDARY_STYLE} text-left"))
        {
            (test.title)
        }
    }
}

fn group_card(title: &str, description: &str, group: TriggerGroup) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold" { (title) }
            p class="text-sm text-gray-600 dark:text-gray-400 mb-4" { (description) }

            div class="grid gap-3 sm:grid-cols-2"
            {
                @for test in TRIGGER_TESTS.iter().filter(|test| test.group == group) {
                    (test_button(test))
                }
            }
        }
    }
}

/// Renders the triggers page.
pub async fn get_triggers_page() -> Response {
    let nav_bar = NavBar::new(endpoints::TRIGGERS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-6 w-full lg:max-w-6xl"
            {
                h1 class="text-xl font-bold" { "Database Triggers" }

                (group_card(
                    "Payment Validation",
                    "Runs before a payment is inserted.",
                    TriggerGroup::Payment,
                ))

                (group_card(
                    "Pass Status",
                    "Sets the status of a new pass from its dates.",
                    TriggerGroup::Pass,
                ))
            }
        }
    };

    base("Triggers", &content).into_response()
}

fn test_view(test: &TriggerTest) -> Markup {
    let (verdict, tone, label) = if test.accepted {
        ("Test Passed", Tone::Success, "Result:")
    } else {
        ("Test Failed (Expected)", Tone::Danger, "Error:")
    };

    html! {
        div class="space-y-4" data-trigger-test=(test.slug)
        {
            (badge(verdict, tone))

            div
            {
                p class="font-semibold mb-1" { "Test SQL:" }
                pre class="overflow-x-auto rounded bg-gray-100 p-3 text-xs dark:bg-gray-900"
                {
                    code { (test.sql) }
                }
            }

            p
            {
                strong { (label) }
                " "
                span data-trigger-outcome { (test.outcome) }
            }

            p class="text-sm text-gray-600 dark:text-gray-400" { (test.explanation) }
        }
    }
}

/// Renders a modal with a trigger test's SQL and outcome.
pub async fn get_trigger_test(Path(slug): Path<String>) -> Response {
    match find_test(&slug) {
        Some(test) => modal_view(test.title, &test_view(test)).into_response(),
        None => Error::NotFound.into_alert_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::Path, http::StatusCode};
    use scraper::Selector;

    use crate::test_utils::{assert_status, assert_valid_html, parse_html_document, parse_html_fragment};

    use super::{TRIGGER_TESTS, get_trigger_test, get_triggers_page};

    #[tokio::test]
    async fn page_links_every_test() {
        let response = get_triggers_page().await;

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let urls: Vec<&str> = html
            .select(&Selector::parse("button[hx-get]").unwrap())
            .filter_map(|button| button.value().attr("hx-get"))
            .collect();
        assert_eq!(urls.len(), TRIGGER_TESTS.len());
        assert_eq!(urls[0], "/triggers/payment-valid");
        assert_eq!(urls[6], "/triggers/pass-invalid");
    }

    #[tokio::test]
    async fn rejected_insert_shows_error() {
        let response = get_trigger_test(Path("payment-refund".to_owned())).await;

        assert_status(&response, StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let title: String = html
            .select(&Selector::parse("[role=dialog] h2").unwrap())
            .next()
            .expect("modal title missing")
            .text()
            .collect();
        assert_eq!(title, "Test 4: Excessive Refund");

        let outcome: String = html
            .select(&Selector::parse("[data-trigger-outcome]").unwrap())
            .next()
            .expect("outcome missing")
            .text()
            .collect();
        assert_eq!(outcome, "Refund amount cannot exceed original amount");
        assert!(
            html.select(&Selector::parse("[data-badge=danger]").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn accepted_insert_shows_success() {
        let response = get_trigger_test(Path("pass-expired".to_owned())).await;

        let html = parse_html_fragment(response).await;
        assert!(
            html.select(&Selector::parse("[data-badge=success]").unwrap())
                .next()
                .is_some()
        );
        let sql: String = html
            .select(&Selector::parse("pre code").unwrap())
            .next()
            .expect("SQL missing")
            .text()
            .collect();
        assert!(sql.contains("'PASS_TEST002'"));
    }

    #[tokio::test]
    async fn unknown_test_is_not_found() {
        let response = get_trigger_test(Path("pass-unknown".to_owned())).await;

        assert_status(&response, StatusCode::NOT_FOUND);
    }
}
