//! Error types for the adapter.
//!
//! This is the fatal channel: anything surfacing here aborts the host request
//! instead of being rendered as a query error message. Driver-level failures
//! that are recovered into a message live in [`crate::driver::DriverError`].

use thiserror::Error;

/// Fatal adapter errors.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Configuration errors (missing required fields, malformed host config).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema introspection failures.
    #[error("Failed getting schema: {0}")]
    Schema(String),

    /// Unclassified faults, carried with their original cause chain intact.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdapterError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a schema introspection error with the given message.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Schema(_) => "Schema Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using AdapterError.
pub type Result<T> = std::result::Result<T, AdapterError>;
