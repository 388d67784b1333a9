use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

use super::http::response_text;

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&response_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&response_text(response).await)
}

/// Parse a fragment made of `tr` elements.
///
/// Table rows outside of a table are dropped by the HTML parser, so the rows
/// are wrapped in a table first.
pub(crate) async fn parse_table_rows(response: Response<Body>) -> Html {
    let rows = response_text(response).await;

    Html::parse_fragment(&format!("<table><tbody>{rows}</tbody></table>"))
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The text of each `tr`, with a flag for whether it is hidden.
pub(crate) fn row_texts(html: &Html) -> Vec<(String, bool)> {
    html.select(&Selector::parse("tr").unwrap())
        .map(|row| {
            let text = row.text().collect::<Vec<_>>().join(" ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (text, row.value().attr("hidden").is_some())
        })
        .collect()
}
