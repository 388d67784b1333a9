//! An in-process stand-in for the transit backend.
//!
//! Responses are registered per method and path. Every request is recorded
//! so tests can check which calls were made. Unknown routes answer with a
//! plain-text 404.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// A request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<(Method, String), (StatusCode, Value)>,
    calls: Vec<RecordedCall>,
}

type SharedState = Arc<Mutex<MockState>>;

pub(crate) struct MockBackend {
    address: SocketAddr,
    state: SharedState,
    shutdown_signal: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl MockBackend {
    /// Start serving on an ephemeral port.
    pub(crate) async fn start() -> Self {
        let state = SharedState::default();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind mock backend");
        let address = listener
            .local_addr()
            .expect("Could not get mock backend address");

        let router = Router::new().fallback(handle).with_state(state.clone());
        let (shutdown_signal, shutdown) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown.await;
                })
                .await
                .expect("Mock backend failed");
        });

        Self {
            address,
            state,
            shutdown_signal,
            task,
        }
    }

    /// Answer `method path` with `body` and status 200.
    pub(crate) fn respond(self, method: Method, path: &str, body: Value) -> Self {
        self.respond_with_status(method, path, 200, body)
    }

    /// Answer `method path` with `body` and `status`.
    pub(crate) fn respond_with_status(
        self,
        method: Method,
        path: &str,
        status: u16,
        body: Value,
    ) -> Self {
        let status = StatusCode::from_u16(status).expect("Invalid status code");

        self.state
            .lock()
            .expect("Could not lock mock backend state")
            .responses
            .insert((method, path.to_owned()), (status, body));

        self
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// The requests received so far, oldest first.
    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.state
            .lock()
            .expect("Could not lock mock backend state")
            .calls
            .clone()
    }

    /// The requests received so far with the given method.
    pub(crate) fn calls_with_method(&self, method: Method) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect()
    }

    /// Stop serving and wait until the port is released.
    pub(crate) async fn shutdown(self) {
        let _ = self.shutdown_signal.send(());
        self.task.await.expect("Mock backend task panicked");
    }
}

async fn handle(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_owned();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = serde_json::from_slice::<Value>(&body).ok();

    let mut state = state.lock().expect("Could not lock mock backend state");

    state.calls.push(RecordedCall {
        method: method.clone(),
        path: path.clone(),
        body,
        content_type,
    });

    match state.responses.get(&(method, path)) {
        Some((status, body)) => (*status, Json(body.clone())).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
