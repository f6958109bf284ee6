//! Schema introspection integration tests.
//!
//! Drives the introspector through the query pipeline with the mock driver.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use dremio_odbc::config::Configuration;
use dremio_odbc::driver::{DriverError, MockDriver, NativeColumn, RawQueryOutput};
use dremio_odbc::error::AdapterError;
use dremio_odbc::query::QueryExecutor;
use dremio_odbc::result::Value;
use dremio_odbc::schema::SchemaIntrospector;

fn config_with_db(db: &str) -> Configuration {
    Configuration::from_json(json!({
        "server": "127.0.0.1",
        "user": "a",
        "password": "b",
        "db": db
    }))
    .unwrap()
}

fn metadata_driver(rows: &[(&str, &str, &str)]) -> Arc<MockDriver> {
    Arc::new(MockDriver::returning(RawQueryOutput::with_rows(
        vec![
            NativeColumn::new("table_schema", 1),
            NativeColumn::new("table_name", 1),
            NativeColumn::new("column_name", 1),
        ],
        rows.iter()
            .map(|(s, t, c)| vec![Value::from(*s), Value::from(*t), Value::from(*c)])
            .collect(),
    )))
}

#[tokio::test]
async fn test_introspect_folds_columns_per_table() {
    let driver = metadata_driver(&[("sales", "t", "c1"), ("sales", "t", "c2")]);
    let executor = QueryExecutor::new(driver.clone());
    let introspector = SchemaIntrospector::new(&executor);

    let map = introspector.introspect(&config_with_db("sales")).await.unwrap();

    assert_eq!(map.len(), 1);
    let table = map.get("t").unwrap();
    assert_eq!(table.name, "t");
    assert_eq!(table.columns, vec!["c1", "c2"]);
}

#[tokio::test]
async fn test_introspect_qualifies_foreign_schemas() {
    let driver = metadata_driver(&[
        ("sales", "orders", "id"),
        ("audit", "events", "id"),
    ]);
    let executor = QueryExecutor::new(driver);
    let introspector = SchemaIntrospector::new(&executor);

    let map = introspector.introspect(&config_with_db("sales")).await.unwrap();

    let names: Vec<&str> = map.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["orders", "audit.events"]);
}

#[tokio::test]
async fn test_introspect_sends_the_system_schema_filter() {
    let driver = metadata_driver(&[]);
    let executor = QueryExecutor::new(driver.clone());
    let introspector = SchemaIntrospector::new(&executor);

    introspector.introspect(&config_with_db("sales")).await.unwrap();

    let sql = driver.last_session().unwrap().executed_sql().remove(0);
    assert!(sql.contains("SELECT table_schema, table_name, column_name"));
    assert!(sql.contains("FROM INFORMATION_SCHEMA.COLUMNS"));
    assert!(sql.contains("NOT IN ('INFORMATION_SCHEMA','sys')"));
}

#[tokio::test]
async fn test_introspect_failure_is_fatal() {
    let driver = Arc::new(MockDriver::failing_execute(DriverError::Statement(
        "permission denied".to_string(),
    )));
    let executor = QueryExecutor::new(driver);
    let introspector = SchemaIntrospector::new(&executor);

    let err = introspector
        .introspect(&config_with_db("sales"))
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Schema(_)));
    assert_eq!(err.to_string(), "Failed getting schema: permission denied");
}

#[tokio::test]
async fn test_introspect_serializes_for_the_schema_browser() {
    let driver = metadata_driver(&[("sales", "t", "c1"), ("sales", "t", "c2")]);
    let executor = QueryExecutor::new(driver);
    let introspector = SchemaIntrospector::new(&executor);

    let map = introspector.introspect(&config_with_db("sales")).await.unwrap();

    assert_eq!(
        serde_json::to_value(&map).unwrap(),
        json!([{ "name": "t", "columns": ["c1", "c2"] }])
    );
}
