pub mod config;
pub mod errors;
pub mod graph_schema;
pub mod schema_types;

// Re-export commonly used types
pub use config::{EdgeDefinition, GraphSchemaConfig, VertexDefinition};
pub use errors::GraphSchemaError;
pub use graph_schema::{ColumnDef, ColumnInfo, GraphSchema, GremlinTable, PhysicalColumn, TableKind};
pub use schema_types::ColumnType;
