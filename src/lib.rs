//! sqlgremlin - SQL over property graphs
//!
//! This crate translates validated single-table SQL select trees into Gremlin
//! traversals and streams their results back as rows:
//! - Vertex and edge labels exposed as tables ([`graph_catalog`])
//! - Per-query column and alias registry ([`sql_metadata`])
//! - Clause-by-clause lowering into a traversal IR ([`select_compiler`])
//! - A worker-thread bridge with paging and cancellation ([`results`])
//!
//! ```
//! use std::sync::Arc;
//! use sqlgremlin::graph_catalog::{ColumnDef, ColumnType, GraphSchema};
//! use sqlgremlin::select_compiler::{compile, TranslatorConfig};
//! use sqlgremlin::sql_ast::{builders::*, SqlSelect};
//!
//! let schema = GraphSchema::builder()
//!     .vertex("person", ColumnType::Integer, vec![ColumnDef::new("name", ColumnType::String)])
//!     .build()
//!     .unwrap();
//! let select = SqlSelect::new(vec![ident("name")]).from_table("person");
//! let compiled = compile(&select, Arc::new(schema), &TranslatorConfig::default()).unwrap();
//! assert!(compiled.to_groovy().starts_with("g.V().hasLabel('person')"));
//! ```

pub mod config;
pub mod graph_catalog;
pub mod results;
pub mod select_compiler;
pub mod sql_ast;
pub mod sql_metadata;
pub mod sql_nodes;
pub mod traversal;

pub use results::{execute, ResultChannel};
pub use select_compiler::{compile, CompiledQuery};
