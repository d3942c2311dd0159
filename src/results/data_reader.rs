//! Decoding raw traversal results into typed rows.

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;
use std::{fmt, sync::Arc};

use super::errors::ExecutionFault;
use crate::{graph_catalog::schema_types::ColumnType, select_compiler::data_retrieval::NULL_MARKER};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::Long(i) => write!(f, "{}", i),
            SqlValue::Double(d) => write!(f, "{}", d),
            SqlValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// One result row. Column names are shared by every row of a query.
///
/// Serializes as an object keyed by column name, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Turns raw results into rows in output-column order, checking each value
/// against the column's type.
#[derive(Debug, Clone)]
pub struct RowDecoder {
    columns: Arc<[String]>,
    types: Vec<ColumnType>,
}

impl RowDecoder {
    pub fn new(columns: Arc<[String]>, types: Vec<ColumnType>) -> Self {
        RowDecoder { columns, types }
    }

    pub fn columns(&self) -> Arc<[String]> {
        self.columns.clone()
    }

    pub fn decode(&self, raw: &Value) -> Result<Row, ExecutionFault> {
        let object = raw
            .as_object()
            .ok_or_else(|| ExecutionFault::NotARow(truncate(raw.to_string())))?;
        if object.len() != self.columns.len() {
            return Err(ExecutionFault::DecodeMismatch {
                expected: self.columns.len(),
                found: object.len(),
            });
        }

        let mut values = Vec::with_capacity(self.columns.len());
        for (column, ty) in self.columns.iter().zip(&self.types) {
            let value = object
                .get(column)
                .ok_or_else(|| ExecutionFault::MissingColumn {
                    column: column.clone(),
                })?;
            values.push(decode_value(column, *ty, value)?);
        }

        Ok(Row {
            columns: self.columns.clone(),
            values,
        })
    }
}

fn decode_value(column: &str, ty: ColumnType, value: &Value) -> Result<SqlValue, ExecutionFault> {
    match value {
        Value::Null => return Ok(SqlValue::Null),
        Value::String(s) if s == NULL_MARKER => return Ok(SqlValue::Null),
        _ => {}
    }
    let decoded = match (ty, value) {
        (ColumnType::Integer, Value::Number(n)) => n.as_i64().map(SqlValue::Long),
        (ColumnType::Float, Value::Number(n)) => n.as_f64().map(SqlValue::Double),
        (ColumnType::Boolean, Value::Bool(b)) => Some(SqlValue::Bool(*b)),
        (ColumnType::String, Value::String(s)) | (ColumnType::DateTime, Value::String(s)) => {
            Some(SqlValue::String(s.clone()))
        }
        _ => None,
    };
    decoded.ok_or_else(|| ExecutionFault::TypeMismatch {
        column: column.to_string(),
        expected: ty,
        found: truncate(value.to_string()),
    })
}

fn truncate(mut s: String) -> String {
    const LIMIT: usize = 80;
    if s.len() > LIMIT {
        let mut cut = LIMIT;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push_str("...");
    }
    s
}
