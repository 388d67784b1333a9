//! The state shared by every route handler.

use crate::api_client::ApiClient;

/// The state of the server.
///
/// Handlers take the narrower state they need, e.g. `ModalState`, which is
/// built from this through `FromRef`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the transit backend.
    pub api: ApiClient,
}

impl AppState {
    /// Create the state for a server that talks to the backend at
    /// `api_url`, e.g. "http://127.0.0.1:5000".
    pub fn new(api_url: &str) -> Self {
        Self {
            api: ApiClient::new(api_url),
        }
    }
}
