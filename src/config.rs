//! Host-provided configuration.
//!
//! The query-execution host stores data source settings as a JSON object and
//! hands them to the adapter verbatim. Defaults for the optional fields are
//! applied during deserialization; validation of the fields the descriptor
//! builder needs happens in [`crate::descriptor`], independent of whatever
//! the host's own schema declares as required.

use crate::error::{AdapterError, Result};
use secrecy::SecretString;
use serde::Deserialize;

/// Default Dremio wire port.
fn default_port() -> u16 {
    31010
}

fn default_charset() -> String {
    "UTF-8".to_string()
}

fn default_driver() -> String {
    "{Dremio ODBC Driver 64-bit}".to_string()
}

/// Data source configuration as stored by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    /// Server host name or address.
    pub server: Option<String>,

    /// User name for plain authentication.
    pub user: Option<String>,

    /// Password for plain authentication. Redacted in `Debug` output and
    /// never rendered into log or error text.
    pub password: Option<SecretString>,

    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Character set. Accepted for host-schema compatibility; the descriptor
    /// does not carry it.
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Schema (catalog entry) queries run against. May be empty.
    pub db: Option<String>,

    /// ODBC driver identifier.
    #[serde(default = "default_driver")]
    pub driver: String,
}

impl Configuration {
    /// Deserializes a configuration from the host's stored JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| AdapterError::config(format!("Invalid configuration: {e}")))
    }

    /// Returns a display-safe string (no credentials) for log lines.
    pub fn display_string(&self) -> String {
        let server = self.server.as_deref().unwrap_or("127.0.0.1");
        let db = self.db.as_deref().unwrap_or("");
        format!("{db} @ {server}:{}", self.port)
    }
}
