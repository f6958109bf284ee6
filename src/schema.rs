//! Schema introspection.
//!
//! Populates the host's schema browser: one fixed information-schema query,
//! folded into a per-table column listing. Tables outside the configured
//! schema are displayed schema-qualified.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::config::Configuration;
use crate::error::{AdapterError, Result};
use crate::query::{ExecutionOutcome, QueryExecutor};
use crate::result::ResultSet;

/// Metadata query listing every visible column outside the system schemas.
const COLUMN_LISTING_QUERY: &str = "SELECT table_schema, table_name, column_name \
     FROM INFORMATION_SCHEMA.COLUMNS WHERE table_schema NOT IN ('INFORMATION_SCHEMA','sys')";

/// One table entry in the schema browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    /// Display name: `table` or `schema.table`.
    pub name: String,

    /// Column names in the order the metadata query reported them.
    pub columns: Vec<String>,
}

/// Per-table column listing, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SchemaMap {
    tables: Vec<TableSchema>,
    index: HashMap<String, usize>,
}

impl SchemaMap {
    /// Looks up a table by display name.
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Tables in first-seen order.
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Iterates tables in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no tables were found.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn entry_mut(&mut self, name: &str) -> &mut TableSchema {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.tables.len();
                self.tables.push(TableSchema {
                    name: name.to_string(),
                    columns: Vec::new(),
                });
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.tables[idx]
    }
}

impl Serialize for SchemaMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.tables.iter())
    }
}

impl IntoIterator for SchemaMap {
    type Item = TableSchema;
    type IntoIter = std::vec::IntoIter<TableSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

/// Builds the schema browser listing on top of the query pipeline.
pub struct SchemaIntrospector<'a> {
    executor: &'a QueryExecutor,
}

impl<'a> SchemaIntrospector<'a> {
    /// Creates an introspector over the given executor.
    pub fn new(executor: &'a QueryExecutor) -> Self {
        Self { executor }
    }

    /// Runs the metadata query and folds its rows into a schema map.
    ///
    /// A failed metadata query is fatal, unlike an ordinary query error.
    pub async fn introspect(&self, config: &Configuration) -> Result<SchemaMap> {
        let outcome = self
            .executor
            .run_query(config, COLUMN_LISTING_QUERY)
            .await?;

        let result = match outcome {
            ExecutionOutcome::Completed(result) => result,
            ExecutionOutcome::Failed(message) => return Err(AdapterError::Schema(message)),
        };

        fold_rows(&result, config.db.as_deref().unwrap_or(""))
    }
}

/// Folds `(schema, table, column)` rows into a map keyed by display name.
///
/// Rows are consumed in order; duplicate columns are appended as reported.
fn fold_rows(result: &ResultSet, default_schema: &str) -> Result<SchemaMap> {
    let schema_idx = required_column(result, "table_schema")?;
    let table_idx = required_column(result, "table_name")?;
    let column_idx = required_column(result, "column_name")?;

    let mut map = SchemaMap::default();

    for row in &result.rows {
        let schema = string_cell(row, schema_idx, "table_schema")?;
        let table = string_cell(row, table_idx, "table_name")?;
        let column = string_cell(row, column_idx, "column_name")?;

        let display_name = if schema == default_schema {
            table.to_string()
        } else {
            format!("{schema}.{table}")
        };

        map.entry_mut(&display_name).columns.push(column.to_string());
    }

    Ok(map)
}

fn required_column(result: &ResultSet, name: &str) -> Result<usize> {
    result
        .column_index(name)
        .ok_or_else(|| AdapterError::schema(format!("metadata query returned no '{name}' column")))
}

fn string_cell<'r>(row: &'r [crate::result::Value], idx: usize, name: &str) -> Result<&'r str> {
    row[idx]
        .as_str()
        .ok_or_else(|| AdapterError::schema(format!("non-string '{name}' in metadata row")))
}
