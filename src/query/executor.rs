//! Query execution pipeline.
//!
//! Orchestrates one statement: build the descriptor, acquire a session,
//! execute, shape or classify, release. The session acquired here is closed
//! on every exit path before control returns to the caller, and the host's
//! stop signal is observed between the blocking driver calls.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::descriptor::ConnectionDescriptor;
use crate::driver::{Driver, Session, CANCELLED_MESSAGE};
use crate::error::Result;
use crate::result::ResultSet;
use crate::NOOP_QUERY;

/// Fixed message for statements that produce no result set.
pub const NO_DATA_MESSAGE: &str = "No data was returned.";

/// The outcome of a recovered execution: rows, or a user-facing error.
///
/// Exactly one side exists by construction; fatal faults travel the `Err`
/// channel of [`QueryExecutor::execute`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The statement produced a result set.
    Completed(ResultSet),

    /// The statement failed in a way the user can act on.
    Failed(String),
}

impl ExecutionOutcome {
    /// The shaped result, if execution completed.
    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Failed(_) => None,
        }
    }

    /// The user-facing error message, if execution failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(message) => Some(message),
        }
    }

    /// Serialized payload for the host: the result JSON on completion,
    /// `None` on failure.
    pub fn json_payload(&self) -> Result<Option<String>> {
        match self {
            Self::Completed(result) => Ok(Some(result.to_json_payload()?)),
            Self::Failed(_) => Ok(None),
        }
    }
}

/// Executes statements against a driver, one independent session per call.
#[derive(Clone)]
pub struct QueryExecutor {
    driver: Arc<dyn Driver>,
}

impl QueryExecutor {
    /// Creates an executor over the given driver.
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    /// Runs a statement to completion with no external stop signal.
    pub async fn run_query(&self, config: &Configuration, sql: &str) -> Result<ExecutionOutcome> {
        self.execute(config, sql, CancellationToken::new()).await
    }

    /// Runs a statement, observing `cancel` between pipeline steps.
    ///
    /// Configuration problems are fatal and return `Err` before any driver
    /// call. Connection failures, statement failures, cancellation, and
    /// empty result sets are recovered into [`ExecutionOutcome::Failed`].
    pub async fn execute(
        &self,
        config: &Configuration,
        sql: &str,
        cancel: CancellationToken,
    ) -> Result<ExecutionOutcome> {
        let descriptor = ConnectionDescriptor::build(config)?;

        debug!("Running query against {}: {}", descriptor, sql);
        let start = Instant::now();

        // The stop signal may fire while the handshake is still in flight;
        // there is no session to cancel or release yet in that case.
        let session = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Ok(ExecutionOutcome::Failed(CANCELLED_MESSAGE.to_string()));
            }
            connected = self.driver.connect(&descriptor) => match connected {
                Ok(session) => session,
                Err(error) => return Ok(ExecutionOutcome::Failed(error.user_message())),
            }
        };

        let outcome = self.execute_on(session.as_ref(), sql, &cancel).await;

        // Release on every path that acquired a session.
        if let Err(error) = session.close().await {
            warn!("Failed to close session: {error}");
        }

        debug!("Query finished in {:?}", start.elapsed());

        outcome
    }

    async fn execute_on(
        &self,
        session: &dyn Session,
        sql: &str,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome> {
        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                if let Err(error) = session.cancel().await {
                    warn!("Cancel request failed: {error}");
                }
                return Ok(ExecutionOutcome::Failed(CANCELLED_MESSAGE.to_string()));
            }
            executed = session.execute(sql) => match executed {
                Ok(output) => output,
                Err(error) => return Ok(ExecutionOutcome::Failed(error.user_message())),
            }
        };

        // Statements without a result set (DDL and the like) are a soft
        // failure, not an exception.
        let Some(columns) = output.columns else {
            return Ok(ExecutionOutcome::Failed(NO_DATA_MESSAGE.to_string()));
        };

        Ok(ExecutionOutcome::Completed(ResultSet::shape(
            &columns,
            output.rows,
        )))
    }

    /// Verifies the data source is reachable by running the no-op query.
    pub async fn test_connection(&self, config: &Configuration) -> Result<()> {
        match self.run_query(config, NOOP_QUERY).await? {
            ExecutionOutcome::Completed(_) => Ok(()),
            ExecutionOutcome::Failed(message) => {
                Err(anyhow::anyhow!("{message}").context("connection test failed").into())
            }
        }
    }
}
