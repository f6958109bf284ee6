//! Connection descriptor assembly.
//!
//! Builds the ODBC connection string handed to the native driver. Assembly is
//! purely syntactic: reachability is the driver's problem. The rendered field
//! set and ordering are a wire contract with existing driver configurations,
//! so they must not be reordered or reformatted.

use crate::config::Configuration;
use crate::error::{AdapterError, Result};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Handshake timeout baked into the descriptor, in seconds.
const HANDSHAKE_TIMEOUT_SECS: u32 = 5;

/// Server-side query timeout baked into the descriptor, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 180;

/// Number of prefetch buffers the driver keeps per cursor.
const PREFETCH_BUFFERS: u32 = 5;

/// Fixed catalog name Dremio exposes over ODBC.
const CATALOG: &str = "DREMIO";

/// Resolved connection parameters for one session.
///
/// Built fresh for every query; never cached or reused across executions.
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    driver: String,
    host: String,
    port: u16,
    user: String,
    password: SecretString,
    schema: String,
}

impl ConnectionDescriptor {
    /// Builds a descriptor from the host configuration.
    ///
    /// Fails if any of `server`, `user`, `password`, or `db` is absent. An
    /// empty `db` is accepted and substituted verbatim into the `Schema=`
    /// field.
    pub fn build(config: &Configuration) -> Result<Self> {
        let host = require(&config.server, "server")?;
        let user = require(&config.user, "user")?;
        let password = config
            .password
            .clone()
            .ok_or_else(|| missing("password"))?;
        let schema = require(&config.db, "db")?;

        Ok(Self {
            driver: config.driver.clone(),
            host,
            port: config.port,
            user,
            password,
            schema,
        })
    }

    /// Renders the full connection string, credentials included.
    ///
    /// The returned value wraps the credentials; expose it only at the driver
    /// boundary.
    pub fn connection_string(&self) -> SecretString {
        SecretString::new(format!(
            "DRIVER={};ConnectionType=Direct;HOST={};PORT={};AuthenticationType=Plain;UID={};PWD={};AdvancedProperties=CastAnyToVarchar=true;HandshakeTimeout={};QueryTimeout={};TimestampTZDisplayTimezone=utc;NumberOfPrefetchBuffers={};Catalog={};Schema={}",
            self.driver,
            self.host,
            self.port,
            self.user,
            self.password.expose_secret(),
            HANDSHAKE_TIMEOUT_SECS,
            QUERY_TIMEOUT_SECS,
            PREFETCH_BUFFERS,
            CATALOG,
            self.schema,
        ))
    }

    /// Target host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Target port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Schema queries run against. May be empty.
    pub fn schema(&self) -> &str {
        &self.schema
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} schema={}", self.host, self.port, self.schema)
    }
}

fn require(field: &Option<String>, name: &str) -> Result<String> {
    field.clone().ok_or_else(|| missing(name))
}

fn missing(name: &str) -> AdapterError {
    AdapterError::config(format!("{name} is required"))
}
