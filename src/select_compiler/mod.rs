//! SQL select → Gremlin traversal compiler.
//!
//! [`compile`] lowers one single-table [`SqlSelect`] into a [`CompiledQuery`]:
//! the traversal to run plus the frozen metadata describing its output
//! columns. Translation errors are reported here, before anything executes.

pub mod data_retrieval;
pub mod errors;
mod select_single;
pub mod where_clause;

pub use select_single::SourceTable;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use thiserror::Error;

use crate::{
    graph_catalog::graph_schema::GraphSchema,
    select_compiler::errors::TranslationError,
    sql_ast::SqlSelect,
    sql_metadata::{OutputColumn, QueryMetadata},
    traversal::Traversal,
};

/// Where the WHERE filter sits in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WherePlacement {
    /// Filter single elements right after the source, before grouping.
    #[default]
    BeforeGrouping,
    /// Filter buckets after HAVING. Rows are kept when any element of the
    /// bucket matches.
    AfterHaving,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Invalid WHERE placement `{0}`: expected before_grouping or after_having")]
pub struct ParseWherePlacementError(String);

impl FromStr for WherePlacement {
    type Err = ParseWherePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "before_grouping" => Ok(WherePlacement::BeforeGrouping),
            "after_having" => Ok(WherePlacement::AfterHaving),
            _ => Err(ParseWherePlacementError(s.to_string())),
        }
    }
}

impl fmt::Display for WherePlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WherePlacement::BeforeGrouping => write!(f, "before_grouping"),
            WherePlacement::AfterHaving => write!(f, "after_having"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub where_placement: WherePlacement,
}

/// A compiled query: immutable once built.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    traversal: Traversal,
    columns: Vec<OutputColumn>,
    metadata: QueryMetadata,
}

impl CompiledQuery {
    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    /// Output columns in projection order.
    pub fn columns(&self) -> &[OutputColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn metadata(&self) -> &QueryMetadata {
        &self.metadata
    }

    pub fn to_groovy(&self) -> String {
        self.traversal.to_groovy()
    }
}

pub fn compile(
    select: &SqlSelect,
    schema: Arc<GraphSchema>,
    config: &TranslatorConfig,
) -> Result<CompiledQuery, TranslationError> {
    let mut metadata = QueryMetadata::new(schema);
    let traversal = select_single::translate(select, &mut metadata, config)?;
    let columns = metadata.output_columns()?.to_vec();
    log::debug!(
        "Compiled select into {} steps, {} output columns",
        traversal.len(),
        columns.len()
    );
    Ok(CompiledQuery {
        traversal,
        columns,
        metadata,
    })
}
