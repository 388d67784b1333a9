#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod mock_backend;

pub(crate) use form::{assert_form_input, assert_form_input_with_value, assert_hx_endpoint, must_get_form};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, parse_table_rows, row_texts};
pub(crate) use http::{assert_status, get_header, response_text};
pub(crate) use mock_backend::MockBackend;
