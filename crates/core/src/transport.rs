//! Transport abstraction
//!
//! Resource APIs and the query builder talk to HubSpot only through this
//! trait. The HTTP implementation lives in `hubsync-client`; tests use
//! in-memory implementations.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Decoded JSON object
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One query string pair. Keys may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub key: String,
    /// Parameter value, already formatted
    pub value: String,
}

impl Parameter {
    /// Pair formatting `value` with `ToString`
    pub fn new(key: impl Into<String>, value: impl ToString) -> Self {
        Parameter {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// REST verbs used by the resource APIs.
///
/// Paths are relative to the API address (`contacts/v1/contact/vid/1/profile`).
/// `Ok(None)` means the server answered 204 or with an empty body.
pub trait Transport: Send + Sync {
    /// GET `path` with query parameters
    fn get(&self, path: &str, params: &[Parameter]) -> Result<Option<JsonObject>>;

    /// POST a JSON body
    fn post(&self, path: &str, body: &JsonValue, params: &[Parameter])
        -> Result<Option<JsonObject>>;

    /// PUT a JSON body
    fn put(&self, path: &str, body: &JsonValue, params: &[Parameter])
        -> Result<Option<JsonObject>>;

    /// DELETE `path`
    fn delete(&self, path: &str) -> Result<()>;
}
