//! Normalized result types.
//!
//! Converts the driver's raw column metadata and fetched rows into the
//! self-describing `{columns, rows}` structure the host renders and caches.
//! Rows are stored positionally, aligned with the column list; the serialized
//! payload zips names and values back into per-row objects, so every row
//! carries exactly the column keys, in column order.

use crate::driver::NativeColumn;
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fmt;

/// The portable type taxonomy the host understands.
///
/// The driver reports opaque integer type codes per column; everything the
/// host renders is folded into this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortableType {
    String,
    Integer,
    Float,
    Datetime,
    Unknown,
}

impl PortableType {
    /// Maps a native driver type code to a portable type.
    ///
    /// The table is a design constant. Codes outside it map to `Unknown`;
    /// this never fails.
    pub fn from_native(code: i32) -> Self {
        match code {
            1 | 2 => Self::String,
            3 => Self::Integer,
            4 => Self::Datetime,
            5 => Self::Float,
            _ => Self::Unknown,
        }
    }

    /// Host-facing type name. `Unknown` has none and serializes as `null`.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::String => Some("string"),
            Self::Integer => Some("integer"),
            Self::Float => Some("float"),
            Self::Datetime => Some("datetime"),
            Self::Unknown => None,
        }
    }
}

impl Serialize for PortableType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_none(),
        }
    }
}

/// Metadata for one result column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    /// Column name as reported by the driver.
    pub name: String,

    /// Portable type mapped from the driver's native code.
    #[serde(rename = "type")]
    pub portable_type: PortableType,
}

impl ColumnDescriptor {
    /// Creates a new column descriptor.
    pub fn new(name: impl Into<String>, portable_type: PortableType) -> Self {
        Self {
            name: name.into(),
            portable_type,
        }
    }
}

/// A row of data, positionally aligned with the result's columns.
pub type Row = Vec<Value>;

/// A single cell value from a query result.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text value.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// 128-bit unique identifier; rendered as its canonical string form at
    /// serialization time.
    Uuid(uuid::Uuid),

    /// Timestamp; the descriptor pins display to UTC.
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrows the value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the value to a display string.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
            Value::Uuid(u) => u.to_string(),
            Value::Timestamp(ts) => ts.to_rfc3339(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.collect_seq(b.iter()),
            Value::Uuid(u) => serializer.collect_str(u),
            Value::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
        }
    }
}

// Conversion implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// A shaped, self-describing query result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Column metadata, in the driver's reported order.
    pub columns: Vec<ColumnDescriptor>,

    /// Rows, each aligned positionally with `columns`.
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Shapes raw driver output into a result set.
    ///
    /// Column order from the metadata is preserved and each row is aligned
    /// positionally against it: rows longer than the column list are
    /// truncated, shorter rows are padded with `Null`.
    pub fn shape(columns: &[NativeColumn], rows: Vec<Row>) -> Self {
        let columns: Vec<ColumnDescriptor> = columns
            .iter()
            .map(|c| ColumnDescriptor::new(c.name.clone(), PortableType::from_native(c.type_code)))
            .collect();

        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Returns true if the result has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Serializes the result into the host's JSON payload form.
    pub fn to_json_payload(&self) -> crate::error::Result<String> {
        serde_json::to_string(self)
            .map_err(|e| anyhow::Error::new(e).context("serializing result payload").into())
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResultSet", 2)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field(
            "rows",
            &RowsAsObjects {
                columns: &self.columns,
                rows: &self.rows,
            },
        )?;
        state.end()
    }
}

/// Serializes rows as name→value objects, zipped against the column list.
struct RowsAsObjects<'a> {
    columns: &'a [ColumnDescriptor],
    rows: &'a [Row],
}

impl Serialize for RowsAsObjects<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.iter().map(|row| RowAsObject {
            columns: self.columns,
            row,
        }))
    }
}

struct RowAsObject<'a> {
    columns: &'a [ColumnDescriptor],
    row: &'a [Value],
}

impl Serialize for RowAsObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.row.iter()) {
            map.serialize_entry(&column.name, value)?;
        }
        map.end()
    }
}
