//! Query pipeline integration tests.
//!
//! Exercises descriptor build, execution, result shaping, error recovery,
//! and the session release discipline end to end against the mock driver.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use dremio_odbc::config::Configuration;
use dremio_odbc::driver::{DriverError, MockDriver, NativeColumn, RawQueryOutput};
use dremio_odbc::query::QueryExecutor;
use dremio_odbc::result::Value;

/// Helper matching the minimal host configuration.
fn test_config() -> Configuration {
    Configuration::from_json(json!({
        "server": "127.0.0.1",
        "user": "a",
        "password": "b",
        "db": ""
    }))
    .unwrap()
}

fn executor_for(driver: &Arc<MockDriver>) -> QueryExecutor {
    QueryExecutor::new(driver.clone())
}

#[tokio::test]
async fn test_select_one_end_to_end() {
    let driver = Arc::new(MockDriver::returning(RawQueryOutput::with_rows(
        vec![NativeColumn::new("EXPR$0", 3)],
        vec![vec![Value::Int(1)]],
    )));
    let executor = executor_for(&driver);

    let outcome = executor.run_query(&test_config(), "SELECT 1").await.unwrap();

    let payload: serde_json::Value =
        serde_json::from_str(&outcome.json_payload().unwrap().unwrap()).unwrap();
    assert_eq!(
        payload,
        json!({
            "columns": [{"name": "EXPR$0", "type": "integer"}],
            "rows": [{"EXPR$0": 1}]
        })
    );
    assert_eq!(driver.last_session().unwrap().executed_sql(), vec!["SELECT 1"]);
}

#[tokio::test]
async fn test_ddl_reports_no_data() {
    let driver = Arc::new(MockDriver::empty());
    let executor = executor_for(&driver);

    let outcome = executor
        .run_query(&test_config(), "DROP TABLE x")
        .await
        .unwrap();

    assert_eq!(outcome.error_message(), Some("No data was returned."));
    assert_eq!(outcome.json_payload().unwrap(), None);
    assert_eq!(driver.last_session().unwrap().close_count(), 1);
}

#[tokio::test]
async fn test_statement_error_becomes_query_error_message() {
    let driver = Arc::new(MockDriver::failing_execute(DriverError::Statement(
        "table not found".to_string(),
    )));
    let executor = executor_for(&driver);

    let outcome = executor
        .run_query(&test_config(), "SELECT * FROM nope")
        .await
        .unwrap();

    assert_eq!(outcome.error_message(), Some("table not found"));
    assert_eq!(driver.last_session().unwrap().close_count(), 1);
}

#[tokio::test]
async fn test_connection_error_becomes_query_error_message() {
    let driver = Arc::new(MockDriver::failing_connect(DriverError::Connection(
        "Connection refused".to_string(),
    )));
    let executor = executor_for(&driver);

    let outcome = executor.run_query(&test_config(), "SELECT 1").await.unwrap();

    assert_eq!(outcome.error_message(), Some("Connection refused"));
}

#[tokio::test]
async fn test_interrupt_cancels_and_releases_exactly_once() {
    let driver = Arc::new(MockDriver::hanging());
    let executor = executor_for(&driver);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let outcome = executor
        .execute(&test_config(), "SELECT * FROM slow_table", cancel)
        .await
        .unwrap();

    assert_eq!(outcome.error_message(), Some("Query cancelled by user."));
    let session = driver.last_session().unwrap();
    assert_eq!(session.cancel_count(), 1);
    assert_eq!(session.close_count(), 1);
}

#[tokio::test]
async fn test_missing_required_fields_fail_before_any_network_attempt() {
    let driver = Arc::new(MockDriver::empty());
    let executor = executor_for(&driver);

    for config in [
        json!({ "user": "a", "password": "b", "db": "" }),
        json!({ "server": "s", "password": "b", "db": "" }),
        json!({ "server": "s", "user": "a", "db": "" }),
    ] {
        let config = Configuration::from_json(config).unwrap();
        let result = executor.run_query(&config, "SELECT 1").await;
        assert!(result.is_err());
    }

    assert_eq!(driver.session_count(), 0);
}

#[tokio::test]
async fn test_fatal_config_error_names_the_field() {
    let driver = Arc::new(MockDriver::empty());
    let executor = executor_for(&driver);
    let config = Configuration::from_json(json!({
        "server": "s",
        "user": "a",
        "password": "b"
    }))
    .unwrap();

    let err = executor.run_query(&config, "SELECT 1").await.unwrap_err();

    assert_eq!(err.to_string(), "Configuration error: db is required");
}

#[tokio::test]
async fn test_uuid_cells_serialize_as_canonical_strings() {
    let id = uuid::Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
    let driver = Arc::new(MockDriver::returning(RawQueryOutput::with_rows(
        vec![NativeColumn::new("job_id", 2), NativeColumn::new("rows", 3)],
        vec![vec![Value::Uuid(id), Value::Int(12)]],
    )));
    let executor = executor_for(&driver);

    let outcome = executor
        .run_query(&test_config(), "SELECT job_id, rows FROM jobs")
        .await
        .unwrap();

    let payload: serde_json::Value =
        serde_json::from_str(&outcome.json_payload().unwrap().unwrap()).unwrap();
    assert_eq!(
        payload["rows"][0],
        json!({"job_id": "550e8400-e29b-41d4-a716-446655440000", "rows": 12})
    );
}

#[tokio::test]
async fn test_mixed_type_columns() {
    let driver = Arc::new(MockDriver::returning(RawQueryOutput::with_rows(
        vec![
            NativeColumn::new("name", 1),
            NativeColumn::new("code", 2),
            NativeColumn::new("count", 3),
            NativeColumn::new("seen_at", 4),
            NativeColumn::new("score", 5),
            NativeColumn::new("raw", 99),
        ],
        vec![vec![
            Value::from("widget"),
            Value::from("W-1"),
            Value::Int(3),
            Value::from("2024-01-01 00:00:00"),
            Value::Float(0.25),
            Value::Null,
        ]],
    )));
    let executor = executor_for(&driver);

    let outcome = executor
        .run_query(&test_config(), "SELECT * FROM widgets")
        .await
        .unwrap();

    let payload: serde_json::Value =
        serde_json::from_str(&outcome.json_payload().unwrap().unwrap()).unwrap();
    let types: Vec<&serde_json::Value> = payload["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| &c["type"])
        .collect();
    assert_eq!(
        types,
        vec![
            &json!("string"),
            &json!("string"),
            &json!("integer"),
            &json!("datetime"),
            &json!("float"),
            &json!(null)
        ]
    );
}
