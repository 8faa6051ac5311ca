//! Blocking HTTP transport
//!
//! Sends JSON requests to the configured address with `ureq`. Credentials
//! are attached per request: a private app token as bearer header, or a
//! legacy API key as the `hapikey` query parameter.

use std::time::Duration;

use hubsync_core::{Error, JsonObject, JsonValue, Parameter, Result, Transport};
use tracing::{debug, warn};

use crate::config::ClientConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Credentials {
    Bearer(String),
    ApiKey(String),
}

/// [`Transport`] talking to the HubSpot REST API
pub struct HttpTransport {
    agent: ureq::Agent,
    address: String,
    credentials: Credentials,
}

impl HttpTransport {
    /// Build a transport from validated configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let credentials = match (&config.access_token, &config.api_key) {
            (Some(token), _) if !token.is_empty() => Credentials::Bearer(token.clone()),
            (_, Some(key)) => Credentials::ApiKey(key.clone()),
            _ => return Err(Error::InvalidConfig("missing credentials".into())),
        };

        Ok(Self::with_agent(
            build_agent(config.timeout()),
            &config.address,
            credentials,
        ))
    }

    fn with_agent(agent: ureq::Agent, address: &str, credentials: Credentials) -> Self {
        let mut address = address.to_string();
        if !address.ends_with('/') {
            address.push('/');
        }
        HttpTransport {
            agent,
            address,
            credentials,
        }
    }

    /// Base address with a trailing slash
    pub fn address(&self) -> &str {
        &self.address
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path.trim_start_matches('/'))
    }

    fn prepare<B>(&self, mut request: ureq::RequestBuilder<B>, params: &[Parameter]) -> ureq::RequestBuilder<B> {
        match &self.credentials {
            Credentials::Bearer(token) => {
                request = request.header("Authorization", &format!("Bearer {}", token));
            }
            Credentials::ApiKey(key) => {
                request = request.query("hapikey", key);
            }
        }
        for param in params {
            request = request.query(&param.key, &param.value);
        }
        request.header("Accept", "application/json")
    }

    fn send_json(
        &self,
        method: &'static str,
        request: ureq::RequestBuilder<ureq::typestate::WithBody>,
        path: &str,
        body: &JsonValue,
        params: &[Parameter],
    ) -> Result<Option<JsonObject>> {
        let bytes = serde_json::to_vec(body)?;
        debug!(target: "hubsync::http", method, path, bytes = bytes.len(), "Sending request");

        let response = self
            .prepare(request, params)
            .header("Content-Type", "application/json")
            .send(&bytes[..])
            .map_err(|e| network_error(method, path, e))?;
        read_response(method, path, response)
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, params: &[Parameter]) -> Result<Option<JsonObject>> {
        debug!(target: "hubsync::http", method = "GET", path, "Sending request");
        let response = self
            .prepare(self.agent.get(&self.url(path)), params)
            .call()
            .map_err(|e| network_error("GET", path, e))?;
        read_response("GET", path, response)
    }

    fn post(&self, path: &str, body: &JsonValue, params: &[Parameter]) -> Result<Option<JsonObject>> {
        self.send_json("POST", self.agent.post(&self.url(path)), path, body, params)
    }

    fn put(&self, path: &str, body: &JsonValue, params: &[Parameter]) -> Result<Option<JsonObject>> {
        self.send_json("PUT", self.agent.put(&self.url(path)), path, body, params)
    }

    fn delete(&self, path: &str) -> Result<()> {
        debug!(target: "hubsync::http", method = "DELETE", path, "Sending request");
        let response = self
            .prepare(self.agent.delete(&self.url(path)), &[])
            .call()
            .map_err(|e| network_error("DELETE", path, e))?;
        read_response("DELETE", path, response).map(|_| ())
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}

fn network_error(method: &str, path: &str, e: ureq::Error) -> Error {
    warn!(target: "hubsync::http", method, path, error = %e, "Request failed");
    Error::Transport(e.to_string())
}

fn read_response(
    method: &str,
    path: &str,
    mut response: ureq::http::Response<ureq::Body>,
) -> Result<Option<JsonObject>> {
    let status = response.status();
    let text = response
        .body_mut()
        .read_to_string()
        .map_err(|e| Error::Transport(format!("failed to read response: {}", e)))?;

    if !status.is_success() {
        warn!(
            target: "hubsync::http",
            method,
            path,
            status = status.as_u16(),
            "HubSpot returned an error status"
        );
        let body = if text.trim().is_empty() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            text
        };
        return Err(Error::Status {
            status: status.as_u16(),
            body,
        });
    }

    debug!(
        target: "hubsync::http",
        method,
        path,
        status = status.as_u16(),
        bytes = text.len(),
        "Received response"
    );
    parse_body(&text)
}

/// Decode a success body; empty means no content
fn parse_body(text: &str) -> Result<Option<JsonObject>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<JsonValue>(text)? {
        JsonValue::Object(object) => Ok(Some(object)),
        other => Err(Error::shape(format!(
            "expected a JSON object, found {}",
            match other {
                JsonValue::Array(_) => "an array",
                JsonValue::Null => "null",
                _ => "a scalar",
            }
        ))),
    }
}
