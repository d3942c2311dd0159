use super::errors::GraphSchemaError;
use super::graph_schema::{ColumnDef, GraphSchema};
use super::schema_types::ColumnType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Graph schemas are defined in YAML with the following structure:
///
/// ```yaml
/// vertices:
///   - label: person          # Vertex label, used as the SQL table name
///     id_type: integer       # Type of the synthetic person_ID column
///     columns:
///       - { name: name, type: string }
///       - { name: age, type: integer }
/// edges:
///   - label: knows
///     out_vertex: person     # Exposed as person_OUT_ID
///     in_vertex: person      # Exposed as person_IN_ID
///     columns:
///       - { name: since, type: datetime }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSchemaConfig {
    #[serde(default)]
    pub vertices: Vec<VertexDefinition>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexDefinition {
    pub label: String,
    #[serde(default = "default_id_type")]
    pub id_type: ColumnType,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDefinition {
    pub label: String,
    #[serde(default = "default_id_type")]
    pub id_type: ColumnType,
    pub out_vertex: String,
    pub in_vertex: String,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

fn default_id_type() -> ColumnType {
    ColumnType::String
}

impl GraphSchemaConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, GraphSchemaError> {
        serde_yaml::from_str(yaml).map_err(|e| GraphSchemaError::ConfigParseError {
            error: e.to_string(),
        })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, GraphSchemaError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            GraphSchemaError::ConfigReadError {
                error: format!("{}: {}", path.as_ref().display(), e),
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Validate and resolve into a [`GraphSchema`].
    pub fn to_graph_schema(&self) -> Result<GraphSchema, GraphSchemaError> {
        let mut builder = GraphSchema::builder();
        for v in &self.vertices {
            builder = builder.vertex(&v.label, v.id_type, v.columns.clone());
        }
        for e in &self.edges {
            builder = builder.edge(
                &e.label,
                e.id_type,
                &e.out_vertex,
                &e.in_vertex,
                e.columns.clone(),
            );
        }
        builder.build()
    }
}
