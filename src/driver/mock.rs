//! Mock driver for testing.
//!
//! Scripted implementation of the driver seam: fixed outputs, failure
//! injection at connect or execute, and a hang mode for exercising
//! cancellation. Sessions expose close/cancel counters so tests can assert
//! the release discipline.

use super::{Driver, DriverError, DriverResult, RawQueryOutput, Session};
use crate::descriptor::ConnectionDescriptor;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a mock session does when asked to execute.
#[derive(Debug, Clone)]
enum ExecutePlan {
    /// Return this output.
    Output(RawQueryOutput),
    /// Fail with this error.
    Fail(DriverError),
    /// Never complete; only a cancellation can end the call.
    Hang,
}

/// A mock driver that hands out scripted sessions.
pub struct MockDriver {
    connect_failure: Option<DriverError>,
    plan: ExecutePlan,
    sessions: Mutex<Vec<Arc<MockSession>>>,
}

impl MockDriver {
    /// Driver whose sessions return the given output for every statement.
    pub fn returning(output: RawQueryOutput) -> Self {
        Self::with_plan(ExecutePlan::Output(output))
    }

    /// Driver whose sessions report no result set (DDL-style statements).
    pub fn empty() -> Self {
        Self::with_plan(ExecutePlan::Output(RawQueryOutput::no_result_set()))
    }

    /// Driver that refuses to open sessions.
    pub fn failing_connect(error: DriverError) -> Self {
        Self {
            connect_failure: Some(error),
            plan: ExecutePlan::Output(RawQueryOutput::no_result_set()),
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Driver whose sessions fail every statement.
    pub fn failing_execute(error: DriverError) -> Self {
        Self::with_plan(ExecutePlan::Fail(error))
    }

    /// Driver whose sessions block forever on execute.
    pub fn hanging() -> Self {
        Self::with_plan(ExecutePlan::Hang)
    }

    fn with_plan(plan: ExecutePlan) -> Self {
        Self {
            connect_failure: None,
            plan,
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// The most recently opened session, if any.
    pub fn last_session(&self) -> Option<Arc<MockSession>> {
        self.sessions.lock().unwrap().last().cloned()
    }

    /// Number of sessions this driver has opened.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn connect(&self, _descriptor: &ConnectionDescriptor) -> DriverResult<Box<dyn Session>> {
        if let Some(error) = &self.connect_failure {
            return Err(error.clone());
        }

        let session = Arc::new(MockSession::new(self.plan.clone()));
        self.sessions.lock().unwrap().push(session.clone());
        Ok(Box::new(session))
    }
}

/// A scripted session handed out by [`MockDriver`].
pub struct MockSession {
    plan: ExecutePlan,
    executed: Mutex<Vec<String>>,
    cancel_calls: AtomicUsize,
    close_calls: AtomicUsize,
}

impl MockSession {
    fn new(plan: ExecutePlan) -> Self {
        Self {
            plan,
            executed: Mutex::new(Vec::new()),
            cancel_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
        }
    }

    /// Statements this session was asked to execute.
    pub fn executed_sql(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// How many times `cancel` was invoked.
    pub fn cancel_count(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    /// How many times `close` was invoked.
    pub fn close_count(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Session for Arc<MockSession> {
    async fn execute(&self, sql: &str) -> DriverResult<RawQueryOutput> {
        self.executed.lock().unwrap().push(sql.to_string());

        match &self.plan {
            ExecutePlan::Output(output) => Ok(output.clone()),
            ExecutePlan::Fail(error) => Err(error.clone()),
            ExecutePlan::Hang => std::future::pending().await,
        }
    }

    async fn cancel(&self) -> DriverResult<()> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> DriverResult<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
