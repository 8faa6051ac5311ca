//! Error types for hubsync
//!
//! Value coercion never produces an error; everything else that can fail
//! while talking to HubSpot is represented here.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for hubsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the mapping engine and its transport
#[derive(Debug, Error)]
pub enum Error {
    /// Entity schema misconfiguration, detected while building a model.
    ///
    /// Raised at startup; callers are expected to abort initialization.
    #[error("Invalid model field '{field}': {reason}")]
    Config {
        /// Field name as registered with the model builder
        field: String,
        /// What is wrong with the field
        reason: String,
    },

    /// HubSpot answered with a non-2xx status
    #[error("HTTP status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, or the status text when the body was empty
        body: String,
    },

    /// Network failure (connection refused, timeout, etc.)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request encoding or response decoding failed
    #[error("JSON error: {0}")]
    Json(String),

    /// A response did not have the structure the caller relies on
    #[error("Unexpected response structure: {0}")]
    Shape(String),

    /// The requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client configuration could not be read or is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a schema configuration error
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a response shape error
    pub fn shape(message: impl Into<String>) -> Self {
        Error::Shape(message.into())
    }

    /// Whether the error came from the HTTP layer (status or network)
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Status { .. } | Error::Transport(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
