// A scripted, recording `RemoteApi` for reconciler unit tests.

use crate::gateway::{ApiResponse, RemoteApi};
use async_trait::async_trait;
use fleet_common::{FleetError, Result};
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Replies are queued per (method, path); the last one repeats.
/// Unscripted calls fail with 501.
#[derive(Default)]
pub(crate) struct FakeApi {
    replies: Mutex<HashMap<(Method, String), VecDeque<(u16, Value)>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.replies
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back((status, body));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// `"METHOD path"` for every call, in order.
    pub fn summary(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    pub fn mutating_calls(&self) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.method != Method::GET).collect()
    }

    pub fn body_of(&self, method: Method, path: &str) -> Option<Value> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|c| c.method == method && c.path == path)
            .and_then(|c| c.body.clone())
    }

    fn next_reply(&self, method: &Method, path: &str) -> Option<(u16, Value)> {
        let mut replies = self.replies.lock();
        let queue = replies.get_mut(&(method.clone(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl RemoteApi for FakeApi {
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        self.calls.lock().push(RecordedCall {
            method: method.clone(),
            path: path.to_string(),
            body,
        });

        let (status, reply) = self
            .next_reply(&method, path)
            .unwrap_or((501, Value::String("unscripted call".into())));

        if (200..300).contains(&status) || (method == Method::DELETE && status == 404) {
            let body = if reply.is_null() {
                Vec::new()
            } else {
                serde_json::to_vec(&reply).unwrap_or_default()
            };
            return Ok(ApiResponse {
                status,
                path: path.to_string(),
                body,
            });
        }

        Err(FleetError::Remote {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: reply.to_string(),
        })
    }
}
