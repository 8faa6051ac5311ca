//! Recording in-memory transport shared by the client integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use hubsync_client::{JsonObject, JsonValue, Parameter, Result, Transport};
use parking_lot::Mutex;

/// Route test logs through the test writer; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("hubsync=debug")
        .try_init();
}

/// One call seen by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<Parameter>,
    pub body: Option<JsonValue>,
}

impl Recorded {
    /// `METHOD path?k=v&k=v`, for compact assertions
    pub fn line(&self) -> String {
        let query: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{}={}", p.key, p.value))
            .collect();
        if query.is_empty() {
            format!("{} {}", self.method, self.path)
        } else {
            format!("{} {}?{}", self.method, self.path, query.join("&"))
        }
    }
}

/// Answers calls from a queue of canned responses and records every call.
///
/// With an empty queue every call answers with no content.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Option<JsonObject>>>,
    calls: Mutex<Vec<Recorded>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport answering the next call with `response`
    pub fn answering(response: &str) -> Arc<Self> {
        let transport = Self::new();
        transport.push(response);
        transport
    }

    pub fn push(&self, response: &str) {
        let value: JsonValue = serde_json::from_str(response).unwrap();
        self.responses
            .lock()
            .push_back(value.as_object().cloned());
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().clone()
    }

    pub fn last(&self) -> Recorded {
        self.calls.lock().last().cloned().expect("no calls recorded")
    }

    pub fn last_line(&self) -> String {
        self.last().line()
    }

    pub fn last_body(&self) -> JsonValue {
        self.last().body.expect("last call had no body")
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        params: &[Parameter],
        body: Option<&JsonValue>,
    ) -> Option<JsonObject> {
        self.calls.lock().push(Recorded {
            method,
            path: path.to_string(),
            params: params.to_vec(),
            body: body.cloned(),
        });
        self.responses.lock().pop_front().flatten()
    }
}

impl Transport for RecordingTransport {
    fn get(&self, path: &str, params: &[Parameter]) -> Result<Option<JsonObject>> {
        Ok(self.record("GET", path, params, None))
    }

    fn post(&self, path: &str, body: &JsonValue, params: &[Parameter]) -> Result<Option<JsonObject>> {
        Ok(self.record("POST", path, params, Some(body)))
    }

    fn put(&self, path: &str, body: &JsonValue, params: &[Parameter]) -> Result<Option<JsonObject>> {
        Ok(self.record("PUT", path, params, Some(body)))
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.record("DELETE", path, &[], None);
        Ok(())
    }
}
