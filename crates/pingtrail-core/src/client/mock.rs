//! Scripted in-memory transport for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use super::{ApiRequest, ApiResponse, Transport};
use crate::error::{Error, Result};
use crate::types::PingId;

/// Replays queued responses in order and records every request.
///
/// After [`hold`](MockTransport::hold) each request is recorded, then waits
/// for one notification on the returned gate before it is answered.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    responses: Arc<Mutex<VecDeque<Result<ApiResponse>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, body: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse { status, body }));
    }

    pub(crate) fn fail(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(Error::Network(message.to_string())));
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Network("no scripted response".into())))
    }
}

/// Wire form of a ping owned by user 1.
pub(crate) fn ping_json(id: PingId, parent: Option<PingId>) -> serde_json::Value {
    json!({
        "id": id,
        "parent_ping": parent,
        "latitude": 51.5,
        "longitude": -0.12,
        "timestamp": "2025-06-01T10:15:00Z",
        "user": { "id": 1, "code_name": "bond007" }
    })
}

/// Yield to sibling futures until `done` holds, for at most a few rounds.
pub(crate) async fn until(done: impl Fn() -> bool) {
    for _ in 0..32 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
}

/// Successful login/refresh body.
pub(crate) fn token_json(code_name: &str, access: &str) -> serde_json::Value {
    json!({
        "user": { "id": 1, "code_name": code_name },
        "access": access
    })
}
