use thiserror::Error;

use crate::sql_metadata::errors::MetadataError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslationError {
    #[error("FROM must name exactly one table as `<table> AS <alias>`")]
    MalformedFrom,

    #[error("No select items.")]
    MissingSelectList,

    #[error("Unsupported WHERE clause: {0}")]
    UnsupportedWhereClause(String),

    #[error("Unsupported expression: {0}")]
    UnsupportedShape(String),

    #[error("ORDER BY ordinal {ordinal} is out of range for {columns} select items")]
    InvalidOrdinal { ordinal: i64, columns: usize },

    #[error("Duplicate output column `{0}`")]
    DuplicateColumn(String),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
