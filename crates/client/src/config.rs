//! Client configuration via `hubsync.toml`
//!
//! Holds the API address, credentials, quota spacing and request timeout.
//! A commented default file can be written on first start and edited from
//! there.

use std::path::Path;
use std::time::Duration;

use hubsync_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Config file name used by applications that keep one next to their data
pub const CONFIG_FILE_NAME: &str = "hubsync.toml";

/// Default API address
pub const DEFAULT_ADDRESS: &str = "https://api.hubapi.com/";

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_quota_interval_ms() -> u64 {
    1050
}

fn default_timeout_ms() -> u64 {
    30_000
}

/// HubSpot client configuration loaded from `hubsync.toml`.
///
/// # Example
///
/// ```toml
/// address = "https://api.hubapi.com/"
/// access_token = "pat-eu1-..."
/// quota_interval_ms = 1050
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base address all resource paths are appended to
    #[serde(default = "default_address")]
    pub address: String,
    /// Legacy API key, sent as the `hapikey` query parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Private app token, sent as a bearer token. Takes precedence over `api_key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Minimum spacing between search calls in milliseconds (default: 1050)
    #[serde(default = "default_quota_interval_ms")]
    pub quota_interval_ms: u64,
    /// Request timeout in milliseconds (default: 30000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            api_key: None,
            access_token: None,
            quota_interval_ms: default_quota_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Config for the default address using a private app token
    pub fn with_access_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Config for the default address using a legacy API key
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// `quota_interval_ms` as a `Duration`
    pub fn quota_interval(&self) -> Duration {
        Duration::from_millis(self.quota_interval_ms)
    }

    /// `timeout_ms` as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check the values a transport cannot work without.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an empty address, a zero timeout
    /// or missing credentials.
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(Error::InvalidConfig("address must not be empty".into()));
        }
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfig("timeout_ms must be greater than 0".into()));
        }
        let has_token = self.access_token.as_deref().is_some_and(|t| !t.is_empty());
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty());
        if !has_token && !has_key {
            return Err(Error::InvalidConfig(
                "either access_token or api_key must be set".into(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# hubsync client configuration
#
# Base address of the HubSpot API
address = "https://api.hubapi.com/"

# Credentials: a private app token (preferred) or a legacy API key.
# access_token = "pat-..."
# api_key = "..."

# Minimum spacing between search requests in milliseconds (default: 1050)
quota_interval_ms = 1050

# Request timeout in milliseconds (default: 30000)
timeout_ms = 30000
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::InvalidConfig(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::InvalidConfig(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::InvalidConfig(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
