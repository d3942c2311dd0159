//! Resolved graph schema: the vertex and edge tables a SQL query can name.
//!
//! Every table exposes a synthetic `<label>_ID` column mapped to the element
//! id. Edge tables additionally expose `<in_vertex>_IN_ID` and
//! `<out_vertex>_OUT_ID`, which map to the ids of the edge's endpoints rather
//! than to property keys.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::GraphSchemaError;
use super::schema_types::ColumnType;

pub const ID_SUFFIX: &str = "_ID";
pub const IN_ID_SUFFIX: &str = "_IN_ID";
pub const OUT_ID_SUFFIX: &str = "_OUT_ID";

/// Where a column's value comes from on a graph element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalColumn {
    /// A property key, read with `values(key)`.
    Property(String),
    /// The element id, `id()`.
    Id,
    /// Id of the edge's incoming vertex, `inV().id()`.
    InVertexId,
    /// Id of the edge's outgoing vertex, `outV().id()`.
    OutVertexId,
}

impl PhysicalColumn {
    pub fn is_edge_endpoint(&self) -> bool {
        matches!(self, PhysicalColumn::InVertexId | PhysicalColumn::OutVertexId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        ColumnDef {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    Vertex,
    Edge { in_vertex: String, out_vertex: String },
}

/// A column as seen by SQL: name, type and physical source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub ty: ColumnType,
    pub physical: PhysicalColumn,
}

/// One vertex or edge label, viewed as a SQL table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GremlinTable {
    label: String,
    kind: TableKind,
    id_type: ColumnType,
    columns: Vec<ColumnDef>,
    /// Id type of the endpoint vertices (edges only); (in, out).
    endpoint_id_types: Option<(ColumnType, ColumnType)>,
}

impl GremlinTable {
    pub fn vertex(label: impl Into<String>, id_type: ColumnType, columns: Vec<ColumnDef>) -> Self {
        GremlinTable {
            label: label.into(),
            kind: TableKind::Vertex,
            id_type,
            columns,
            endpoint_id_types: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &TableKind {
        &self.kind
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self.kind, TableKind::Vertex)
    }

    pub fn id_column_name(&self) -> String {
        format!("{}{}", self.label, ID_SUFFIX)
    }

    /// Look up a column by its SQL name.
    pub fn column(&self, name: &str) -> Option<ColumnInfo> {
        if name == self.id_column_name() {
            return Some(ColumnInfo {
                name: name.to_string(),
                ty: self.id_type,
                physical: PhysicalColumn::Id,
            });
        }
        if let (TableKind::Edge { in_vertex, out_vertex }, Some((in_ty, out_ty))) =
            (&self.kind, self.endpoint_id_types)
        {
            if name == format!("{}{}", in_vertex, IN_ID_SUFFIX) {
                return Some(ColumnInfo {
                    name: name.to_string(),
                    ty: in_ty,
                    physical: PhysicalColumn::InVertexId,
                });
            }
            if name == format!("{}{}", out_vertex, OUT_ID_SUFFIX) {
                return Some(ColumnInfo {
                    name: name.to_string(),
                    ty: out_ty,
                    physical: PhysicalColumn::OutVertexId,
                });
            }
        }
        self.columns.iter().find(|c| c.name == name).map(|c| ColumnInfo {
            name: c.name.clone(),
            ty: c.ty,
            physical: PhysicalColumn::Property(c.name.clone()),
        })
    }

    /// All columns in `SELECT *` order: id, properties, then edge endpoints.
    pub fn all_columns(&self) -> Vec<ColumnInfo> {
        let mut out = vec![ColumnInfo {
            name: self.id_column_name(),
            ty: self.id_type,
            physical: PhysicalColumn::Id,
        }];
        out.extend(self.columns.iter().map(|c| ColumnInfo {
            name: c.name.clone(),
            ty: c.ty,
            physical: PhysicalColumn::Property(c.name.clone()),
        }));
        if let (TableKind::Edge { in_vertex, out_vertex }, Some((in_ty, out_ty))) =
            (&self.kind, self.endpoint_id_types)
        {
            out.push(ColumnInfo {
                name: format!("{}{}", in_vertex, IN_ID_SUFFIX),
                ty: in_ty,
                physical: PhysicalColumn::InVertexId,
            });
            out.push(ColumnInfo {
                name: format!("{}{}", out_vertex, OUT_ID_SUFFIX),
                ty: out_ty,
                physical: PhysicalColumn::OutVertexId,
            });
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSchema {
    tables: Vec<GremlinTable>,
}

impl GraphSchema {
    pub fn builder() -> GraphSchemaBuilder {
        GraphSchemaBuilder::default()
    }

    /// Case-insensitive table lookup by label.
    pub fn table(&self, label: &str) -> Option<&GremlinTable> {
        self.tables
            .iter()
            .find(|t| t.label == label)
            .or_else(|| self.tables.iter().find(|t| t.label.eq_ignore_ascii_case(label)))
    }

    pub fn tables(&self) -> &[GremlinTable] {
        &self.tables
    }
}

/// Collects vertex and edge definitions, then validates them as a whole in
/// [`GraphSchemaBuilder::build`].
#[derive(Debug, Default)]
pub struct GraphSchemaBuilder {
    vertices: Vec<(String, ColumnType, Vec<ColumnDef>)>,
    edges: Vec<(String, ColumnType, String, String, Vec<ColumnDef>)>,
}

impl GraphSchemaBuilder {
    pub fn vertex(mut self, label: &str, id_type: ColumnType, columns: Vec<ColumnDef>) -> Self {
        self.vertices.push((label.to_string(), id_type, columns));
        self
    }

    pub fn edge(
        mut self,
        label: &str,
        id_type: ColumnType,
        out_vertex: &str,
        in_vertex: &str,
        columns: Vec<ColumnDef>,
    ) -> Self {
        self.edges.push((
            label.to_string(),
            id_type,
            out_vertex.to_string(),
            in_vertex.to_string(),
            columns,
        ));
        self
    }

    pub fn build(self) -> Result<GraphSchema, GraphSchemaError> {
        let mut tables = Vec::with_capacity(self.vertices.len() + self.edges.len());
        let mut labels = HashSet::new();

        for (label, id_type, columns) in self.vertices {
            if !labels.insert(label.to_lowercase()) {
                return Err(GraphSchemaError::DuplicateTable { label });
            }
            tables.push(GremlinTable::vertex(label, id_type, columns));
        }

        for (label, id_type, out_vertex, in_vertex, columns) in self.edges {
            if !labels.insert(label.to_lowercase()) {
                return Err(GraphSchemaError::DuplicateTable { label });
            }
            let endpoint_type = |vertex: &str| {
                tables
                    .iter()
                    .find(|t: &&GremlinTable| t.is_vertex() && t.label == vertex)
                    .map(|t| t.id_type)
                    .ok_or_else(|| GraphSchemaError::UnknownEndpoint {
                        edge: label.clone(),
                        vertex: vertex.to_string(),
                    })
            };
            let in_ty = endpoint_type(&in_vertex)?;
            let out_ty = endpoint_type(&out_vertex)?;
            tables.push(GremlinTable {
                label,
                kind: TableKind::Edge {
                    in_vertex,
                    out_vertex,
                },
                id_type,
                columns,
                endpoint_id_types: Some((in_ty, out_ty)),
            });
        }

        for table in &tables {
            let mut seen = HashSet::new();
            for column in &table.columns {
                if !seen.insert(column.name.as_str()) {
                    return Err(GraphSchemaError::DuplicateColumn {
                        table: table.label.clone(),
                        column: column.name.clone(),
                    });
                }
                if column.name.ends_with(ID_SUFFIX) {
                    return Err(GraphSchemaError::ReservedColumn {
                        table: table.label.clone(),
                        column: column.name.clone(),
                    });
                }
            }
        }

        log::debug!("Built graph schema with {} tables", tables.len());
        Ok(GraphSchema { tables })
    }
}
