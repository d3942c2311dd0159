//! Faults raised while executing a compiled traversal.
//!
//! A fault ends the query: the worker pushes the first one it hits into the
//! result channel and stops, and the consumer sees it once, after any rows
//! that preceded it.

use thiserror::Error;

use crate::graph_catalog::schema_types::ColumnType;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExecutionFault {
    #[error("Traversal failed: {0}")]
    Traversal(String),

    #[error("Result has {found} fields, expected {expected}")]
    DecodeMismatch { expected: usize, found: usize },

    #[error("Result is missing column `{column}`")]
    MissingColumn { column: String },

    #[error("Column `{column}` expected {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: String,
    },

    #[error("Result is not a row object: {0}")]
    NotARow(String),

    #[error("Failed to spawn query worker: {0}")]
    WorkerSpawn(String),

    #[error("Query worker exited without reporting an outcome")]
    WorkerLost,
}
