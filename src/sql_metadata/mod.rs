//! Per-query metadata registry.
//!
//! [`QueryMetadata`] is created at the start of a compile and threaded through
//! every translator by `&mut`. It tracks:
//! - Registered tables and their working (renamed) labels
//! - Output columns, in projection order
//! - Alias bindings from the select list (`expr AS name`)
//! - Whether the select list aggregates
//!
//! After compilation the registry is frozen inside a `CompiledQuery`; the
//! execution side only reads it.

pub mod errors;

use std::{collections::HashMap, fmt, sync::Arc};

use serde::Serialize;

use crate::{
    graph_catalog::{
        graph_schema::{ColumnInfo, GraphSchema, GremlinTable, TableKind},
        schema_types::ColumnType,
    },
    sql_ast::SqlNode,
    sql_metadata::errors::MetadataError,
};

/// Index of a table registered with a [`QueryMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TableId(usize);

impl TableId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredTable {
    pub id: TableId,
    /// Label as defined in the graph schema.
    pub label: String,
    /// Label the query refers to the table by (the FROM alias).
    pub working_label: String,
    pub kind: TableKind,
}

/// A column of the query's result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputColumn {
    pub name: String,
    pub ty: ColumnType,
}

impl OutputColumn {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        OutputColumn {
            name: name.into(),
            ty,
        }
    }
}

/// What a column reference resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedColumn {
    Physical(ColumnInfo),
    /// An alias from the select list; carries a copy of the bound expression.
    Alias(SqlNode),
}

#[derive(Debug, Clone)]
pub struct QueryMetadata {
    schema: Arc<GraphSchema>,
    tables: Vec<RegisteredTable>,
    /// working label -> schema label
    table_renames: HashMap<String, String>,
    output_columns: Vec<(TableId, Vec<OutputColumn>)>,
    renamed_columns: Vec<String>,
    aliases: HashMap<String, SqlNode>,
    has_aggregate: bool,
}

impl QueryMetadata {
    pub fn new(schema: Arc<GraphSchema>) -> Self {
        QueryMetadata {
            schema,
            tables: Vec::new(),
            table_renames: HashMap::new(),
            output_columns: Vec::new(),
            renamed_columns: Vec::new(),
            aliases: HashMap::new(),
            has_aggregate: false,
        }
    }

    pub fn schema(&self) -> &GraphSchema {
        &self.schema
    }

    /// Register `label AS alias`. Registering the same pair twice returns the
    /// existing id.
    pub fn register_table(&mut self, label: &str, alias: &str) -> Result<TableId, MetadataError> {
        let table = self
            .schema
            .table(label)
            .ok_or_else(|| MetadataError::UnknownTable {
                label: label.to_string(),
            })?;
        let actual = table.label().to_string();
        let working = if alias.is_empty() {
            actual.clone()
        } else {
            alias.to_string()
        };

        if let Some(existing) = self
            .tables
            .iter()
            .find(|t| t.label == actual && t.working_label == working)
        {
            return Ok(existing.id);
        }

        let id = TableId(self.tables.len());
        log::debug!("Registered table {} as `{}` (id {})", actual, working, id);
        self.table_renames.insert(working.clone(), actual.clone());
        self.tables.push(RegisteredTable {
            id,
            label: actual,
            working_label: working,
            kind: table.kind().clone(),
        });
        Ok(id)
    }

    pub fn tables(&self) -> &[RegisteredTable] {
        &self.tables
    }

    pub fn table(&self, id: TableId) -> Result<&RegisteredTable, MetadataError> {
        self.tables
            .get(id.0)
            .ok_or(MetadataError::UnknownTableId { id: id.0 })
    }

    /// Schema definition behind a registered table.
    pub fn gremlin_table(&self, id: TableId) -> Result<&GremlinTable, MetadataError> {
        let registered = self.table(id)?;
        self.schema
            .table(&registered.label)
            .ok_or_else(|| MetadataError::UnknownTable {
                label: registered.label.clone(),
            })
    }

    /// Schema label for a working label, if the table was registered under it.
    pub fn actual_table_name(&self, working: &str) -> Option<&str> {
        self.table_renames
            .get(working)
            .or_else(|| {
                self.table_renames
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(working))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    pub fn working_label(&self, id: TableId) -> Result<&str, MetadataError> {
        Ok(self.table(id)?.working_label.as_str())
    }

    /// Resolve `name` against the table's physical columns, then against
    /// select-list aliases. Physical columns win when both exist.
    pub fn resolve_column(&self, id: TableId, name: &str) -> Result<ResolvedColumn, MetadataError> {
        let table = self.gremlin_table(id)?;
        if let Some(column) = table.column(name) {
            return Ok(ResolvedColumn::Physical(column));
        }
        if let Some(expr) = self.aliases.get(name) {
            return Ok(ResolvedColumn::Alias(expr.clone()));
        }
        Err(MetadataError::UnresolvedColumn {
            table: self.working_label(id)?.to_string(),
            column: name.to_string(),
        })
    }

    /// Bind `alias` to `expr`. Rebinding to an identical expression is a no-op.
    pub fn bind_alias(&mut self, alias: &str, expr: &SqlNode) -> Result<(), MetadataError> {
        match self.aliases.get(alias) {
            Some(existing) if existing == expr => Ok(()),
            Some(_) => Err(MetadataError::DuplicateAlias {
                alias: alias.to_string(),
            }),
            None => {
                log::debug!("Bound alias `{}`", alias);
                self.aliases.insert(alias.to_string(), expr.clone());
                Ok(())
            }
        }
    }

    pub fn alias_binding(&self, alias: &str) -> Option<&SqlNode> {
        self.aliases.get(alias)
    }

    /// Record the table's output columns. Allowed once per query.
    pub fn record_output_columns(
        &mut self,
        id: TableId,
        columns: Vec<OutputColumn>,
    ) -> Result<(), MetadataError> {
        self.table(id)?;
        if !self.output_columns.is_empty() {
            return Err(MetadataError::MultiTableReturn);
        }
        if columns.is_empty() {
            return Err(MetadataError::EmptyRename);
        }
        self.renamed_columns = columns.iter().map(|c| c.name.clone()).collect();
        self.output_columns.push((id, columns));
        Ok(())
    }

    /// Output columns of the single output table.
    pub fn output_columns(&self) -> Result<&[OutputColumn], MetadataError> {
        match self.output_columns.as_slice() {
            [] => Err(MetadataError::EmptyRename),
            [(_, columns)] => Ok(columns),
            _ => Err(MetadataError::MultiTableReturn),
        }
    }

    pub fn renamed_columns(&self) -> &[String] {
        &self.renamed_columns
    }

    pub fn mark_aggregate(&mut self) {
        self.has_aggregate = true;
    }

    pub fn has_aggregate(&self) -> bool {
        self.has_aggregate
    }

    /// Checks that must hold once a single-table compile has finished.
    pub fn check_single_table(&self) -> Result<(), MetadataError> {
        if self.renamed_columns.is_empty() {
            return Err(MetadataError::EmptyRename);
        }
        if self.tables.len() != 1 {
            return Err(MetadataError::MultiTableReturn);
        }
        self.output_columns().map(|_| ())
    }
}
