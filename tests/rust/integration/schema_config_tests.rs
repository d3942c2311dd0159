//! Schema and engine configuration loaded from files, end to end.

use super::common::InMemoryExecutor;
use serde_json::json;
use sqlgremlin::{
    config::EngineConfig,
    execute,
    graph_catalog::{GraphSchemaConfig, GraphSchemaError},
    results::{QueryStatus, SqlValue},
    select_compiler::{compile, WherePlacement},
    sql_ast::SqlSelect,
};
use std::{fs, sync::Arc};

const SCHEMA_YAML: &str = r#"
vertices:
  - label: person
    id_type: integer
    columns:
      - { name: name, type: string }
      - { name: age, type: integer }
  - label: software
    columns:
      - { name: lang, type: string }
edges:
  - label: created
    out_vertex: person
    in_vertex: software
    columns:
      - { name: weight, type: float }
"#;

const ENGINE_YAML: &str = r#"
page_size: 2
fetch_batch_size: 1
worker_name_prefix: "Schema-Test"
where_placement: after_having
"#;

/// `SELECT p.name FROM person AS p WHERE age > 30`
const QUERY_JSON: &str = r#"{
    "select_list": [{ "node": "identifier", "names": ["p", "name"] }],
    "from": {
        "node": "call",
        "operator": { "kind": "as", "syntax": "special" },
        "operands": [
            { "node": "identifier", "names": ["person"] },
            { "node": "identifier", "names": ["p"] }
        ]
    },
    "where": {
        "node": "call",
        "operator": { "kind": "greater_than", "syntax": "binary" },
        "operands": [
            { "node": "identifier", "names": ["age"] },
            { "node": "literal", "type": "integer", "value": 30 }
        ]
    }
}"#;

/// Files on disk all the way to rows on the consumer side.
#[test]
fn test_configured_query_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("schema.yaml");
    let engine_path = dir.path().join("engine.yaml");
    fs::write(&schema_path, SCHEMA_YAML).unwrap();
    fs::write(&engine_path, ENGINE_YAML).unwrap();

    let schema = GraphSchemaConfig::from_yaml_file(&schema_path)
        .unwrap()
        .to_graph_schema()
        .unwrap();
    let engine = EngineConfig::from_yaml_file(&engine_path).unwrap();
    assert_eq!(engine.where_placement, WherePlacement::AfterHaving);

    let select: SqlSelect = serde_json::from_str(QUERY_JSON).unwrap();
    let compiled = compile(&select, Arc::new(schema), &engine.translator()).unwrap();
    assert!(compiled
        .to_groovy()
        .starts_with("g.V().hasLabel('person').group().unfold().select(values)"));
    assert!(compiled
        .to_groovy()
        .contains(".where(__.unfold().values('age').is(gt(30L))).project('name')"));

    let executor = Arc::new(InMemoryExecutor::new(vec![
        json!({"name": "marko"}),
        json!({"name": "josh"}),
        json!({"name": "peter"}),
    ]));
    let mut channel = execute(&compiled, executor.clone(), &engine.bridge()).unwrap();

    let mut pages = Vec::new();
    while let Some(page) = channel.next_page(engine.page_size).unwrap() {
        pages.push(page.len());
    }
    assert_eq!(pages, vec![2, 1]);
    assert_eq!(channel.status(), QueryStatus::Completed);

    let thread = executor.opened_on.lock().unwrap().clone().unwrap();
    assert!(thread.starts_with("Schema-Test-"), "ran on {}", thread);
}

/// Edge endpoint columns take their types from the endpoint vertices.
#[test]
fn test_edge_endpoint_types_from_yaml() {
    let schema = GraphSchemaConfig::from_yaml_str(SCHEMA_YAML)
        .unwrap()
        .to_graph_schema()
        .unwrap();
    let select = SqlSelect::new(vec![sqlgremlin::sql_ast::builders::star()]).from_table("created");
    let compiled = compile(&select, Arc::new(schema), &Default::default()).unwrap();

    let types: Vec<String> = compiled
        .columns()
        .iter()
        .map(|c| format!("{}:{}", c.name, c.ty))
        .collect();
    assert_eq!(
        types,
        vec![
            "created_ID:string",
            "weight:float",
            "software_IN_ID:string",
            "person_OUT_ID:integer"
        ]
    );

    let executor = Arc::new(InMemoryExecutor::new(vec![json!({
        "created_ID": "e1",
        "weight": 0.4,
        "software_IN_ID": "lop",
        "person_OUT_ID": 1
    })]));
    let mut channel = execute(&compiled, executor, &Default::default()).unwrap();
    let row = channel.next_page(10).unwrap().unwrap().remove(0);
    assert_eq!(row.get("weight"), Some(&SqlValue::Double(0.4)));
    assert_eq!(row.get("person_OUT_ID"), Some(&SqlValue::Long(1)));
}

/// Edges must connect declared vertices.
#[test]
fn test_schema_with_unknown_endpoint() {
    let yaml = r#"
vertices:
  - label: person
edges:
  - label: created
    out_vertex: person
    in_vertex: software
"#;
    let err = GraphSchemaConfig::from_yaml_str(yaml)
        .unwrap()
        .to_graph_schema()
        .unwrap_err();
    assert!(matches!(err, GraphSchemaError::UnknownEndpoint { .. }));
}

/// Out-of-range engine settings are rejected.
#[test]
fn test_invalid_engine_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.yaml");
    fs::write(&path, "page_size: 0\n").unwrap();
    assert!(EngineConfig::from_yaml_file(&path).is_err());
}
