//! Column types for graph table definitions
//!
//! A deliberately small set of types that covers what Gremlin property values
//! carry back to a SQL consumer.
//!
//! # Supported Types
//!
//! - `integer` - Whole numbers (Gremlin: Integer/Long)
//! - `float` - Decimal numbers (Gremlin: Float/Double)
//! - `string` - Text
//! - `boolean` - True/False
//! - `datetime` - Timestamps, transported as ISO-8601 strings
//!
//! # Example
//!
//! ```yaml
//! columns:
//!   - name: age
//!     type: integer
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Boolean,
    DateTime,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "datetime",
        }
    }
}

/// Case-insensitive, with the usual aliases (`int`, `long`, `double`, `text`,
/// `bool`, `timestamp`).
impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim() {
            "integer" | "int" | "long" => Ok(ColumnType::Integer),
            "float" | "double" | "decimal" => Ok(ColumnType::Float),
            "string" | "text" => Ok(ColumnType::String),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "datetime" | "timestamp" => Ok(ColumnType::DateTime),
            _ => Err(format!(
                "Unknown type: '{}'. Supported: integer, float, string, boolean, datetime",
                s
            )),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
