//! Native driver abstraction.
//!
//! The native ODBC connectivity layer is an external collaborator; this
//! module is the seam the rest of the adapter talks through. Implementations
//! classify their failures into [`DriverError`] variants once, at this
//! boundary — callers match on tags instead of re-inspecting diagnostic
//! payloads.

mod mock;

pub use mock::{MockDriver, MockSession};

use crate::descriptor::ConnectionDescriptor;
use crate::result::Row;
use async_trait::async_trait;
use thiserror::Error;

/// Fixed message reported when the user interrupts an in-flight query.
pub const CANCELLED_MESSAGE: &str = "Query cancelled by user.";

/// Fixed message reported when a driver error carries no usable diagnostics.
const UNRECOGNIZED_MESSAGE: &str = "Unknown driver error.";

/// A failure reported by the native driver, classified at the boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// SQL or runtime failure while executing a statement.
    #[error("{0}")]
    Statement(String),

    /// Failure establishing a session.
    #[error("{0}")]
    Connection(String),

    /// The in-flight operation was cancelled at the user's request.
    #[error("query cancelled")]
    Cancelled,

    /// The driver raised an error whose diagnostic payload matched no known
    /// shape. Surfaced as generic text rather than crashing classification.
    #[error("unrecognized driver error")]
    Unrecognized,
}

impl DriverError {
    /// The human-readable message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Statement(msg) | Self::Connection(msg) => msg.clone(),
            Self::Cancelled => CANCELLED_MESSAGE.to_string(),
            Self::Unrecognized => UNRECOGNIZED_MESSAGE.to_string(),
        }
    }
}

/// Result type alias for driver operations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Column metadata as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeColumn {
    /// Column name.
    pub name: String,

    /// Driver-specific type code; opaque outside the portable mapping.
    pub type_code: i32,
}

impl NativeColumn {
    /// Creates a new native column description.
    pub fn new(name: impl Into<String>, type_code: i32) -> Self {
        Self {
            name: name.into(),
            type_code,
        }
    }
}

/// Everything a cursor yields for one statement.
#[derive(Debug, Clone, Default)]
pub struct RawQueryOutput {
    /// Column metadata, or `None` when the statement produced no result set
    /// (DDL and the like).
    pub columns: Option<Vec<NativeColumn>>,

    /// Fetched rows, values in column order.
    pub rows: Vec<Row>,
}

impl RawQueryOutput {
    /// Output for a statement that produced a result set.
    pub fn with_rows(columns: Vec<NativeColumn>, rows: Vec<Row>) -> Self {
        Self {
            columns: Some(columns),
            rows,
        }
    }

    /// Output for a statement that produced no result set.
    pub fn no_result_set() -> Self {
        Self::default()
    }
}

/// Connectivity entry point for a native driver.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Opens a session against the server described by `descriptor`.
    ///
    /// Sessions are opened in auto-commit mode: every statement commits
    /// immediately, there are no multi-statement transactions.
    async fn connect(&self, descriptor: &ConnectionDescriptor) -> DriverResult<Box<dyn Session>>;
}

/// A live connection handle to the analytics server.
///
/// Owned exclusively by the single in-flight execution; never shared across
/// calls. Callers must `close` the session on every exit path.
#[async_trait]
pub trait Session: Send + Sync {
    /// Executes a statement and fetches all of its output.
    async fn execute(&self, sql: &str) -> DriverResult<RawQueryOutput>;

    /// Best-effort cancellation of the in-flight statement.
    async fn cancel(&self) -> DriverResult<()>;

    /// Releases the session.
    async fn close(&self) -> DriverResult<()>;
}
