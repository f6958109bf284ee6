//! Dremio ODBC driver adapter.
//!
//! Lets a query-execution host run SQL against a Dremio server over ODBC and
//! get back a normalized `{columns, rows}` result it can render and cache.
//! The native connectivity layer sits behind the [`driver`] seam; everything
//! else — descriptor assembly, execution, result shaping, error
//! classification, schema introspection — lives here.

pub mod config;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod logging;
pub mod query;
pub mod result;
pub mod schema;

/// Display name of this data source in the host UI.
pub const RUNNER_NAME: &str = "Dremio Server (ODBC)";

/// Host-facing data source type identifier.
pub const RUNNER_TYPE: &str = "dremio_odbc";

/// Statement used to verify connectivity.
pub const NOOP_QUERY: &str = "SELECT 1";

/// Queries are sent to the server exactly as written; the host must not
/// prepend metadata comments.
pub const ANNOTATE_QUERY: bool = false;
