//! Query execution.
//!
//! This module isolates statement execution and outcome handling from the
//! host surface: descriptor build, session lifecycle, cancellation, and the
//! success/error split the host renders.

pub mod executor;

pub use executor::{ExecutionOutcome, QueryExecutor};
