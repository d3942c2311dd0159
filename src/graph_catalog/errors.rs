//! # Graph Catalog Error Types
//!
//! Errors raised while loading and validating vertex/edge table definitions.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphSchemaError {
    #[error("Duplicate table label `{label}` (labels must be unique across vertices and edges)")]
    DuplicateTable { label: String },

    #[error("Duplicate column `{column}` in table `{table}`")]
    DuplicateColumn { table: String, column: String },

    #[error("Column `{column}` in table `{table}` collides with a reserved id column")]
    ReservedColumn { table: String, column: String },

    #[error("Edge `{edge}` references unknown vertex label `{vertex}`")]
    UnknownEndpoint { edge: String, vertex: String },

    #[error("Failed to read schema file: {error}")]
    ConfigReadError { error: String },

    #[error("Failed to parse schema: {error}")]
    ConfigParseError { error: String },
}
