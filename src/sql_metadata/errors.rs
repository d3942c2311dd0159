//! Error types for the per-query metadata registry.
//!
//! These errors occur when a reference in the select tree cannot be tied to
//! a table, column or alias, or when the registry's single-table bookkeeping
//! is violated.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetadataError {
    #[error("Unknown table `{label}`")]
    UnknownTable { label: String },

    #[error("No registered table with id {id}")]
    UnknownTableId { id: usize },

    #[error("Column `{column}` cannot be resolved in table `{table}`")]
    UnresolvedColumn { table: String, column: String },

    #[error("Alias `{alias}` is already bound to a different expression")]
    DuplicateAlias { alias: String },

    #[error("Output columns already recorded; only single-table queries are supported")]
    MultiTableReturn,

    #[error("Query produces no output columns")]
    EmptyRename,
}
