#[cfg(test)]
mod metadata_registry {
    use super::super::common::modern_schema;
    use sqlgremlin::{
        graph_catalog::{ColumnType, PhysicalColumn, TableKind},
        sql_ast::builders::*,
        sql_metadata::{errors::MetadataError, OutputColumn, QueryMetadata, ResolvedColumn},
    };

    #[test]
    fn test_register_is_idempotent_and_case_insensitive() {
        let mut md = QueryMetadata::new(modern_schema());
        let first = md.register_table("person", "p").unwrap();
        let again = md.register_table("PERSON", "p").unwrap();
        assert_eq!(first, again);
        assert_eq!(md.tables().len(), 1);
        assert_eq!(md.table(first).unwrap().label, "person");
        assert_eq!(md.working_label(first).unwrap(), "p");
        assert_eq!(md.actual_table_name("p"), Some("person"));
        assert_eq!(md.actual_table_name("q"), None);
    }

    #[test]
    fn test_edge_registration() {
        let mut md = QueryMetadata::new(modern_schema());
        let id = md.register_table("created", "created").unwrap();
        assert!(matches!(
            md.table(id).unwrap().kind,
            TableKind::Edge { ref out_vertex, ref in_vertex }
                if out_vertex == "person" && in_vertex == "software"
        ));
        match md.resolve_column(id, "person_OUT_ID").unwrap() {
            ResolvedColumn::Physical(column) => {
                assert_eq!(column.physical, PhysicalColumn::OutVertexId);
                assert_eq!(column.ty, ColumnType::Integer);
            }
            other => panic!("expected a physical column, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_rebinding() {
        let mut md = QueryMetadata::new(modern_schema());
        let id = md.register_table("person", "person").unwrap();
        md.bind_alias("n", &ident("name")).unwrap();
        md.bind_alias("n", &ident("name")).unwrap();
        assert_eq!(
            md.bind_alias("n", &ident("dept")),
            Err(MetadataError::DuplicateAlias { alias: "n".into() })
        );
        assert_eq!(
            md.resolve_column(id, "n").unwrap(),
            ResolvedColumn::Alias(ident("name"))
        );
        assert_eq!(md.alias_binding("missing"), None);
    }

    #[test]
    fn test_output_columns_lifecycle() {
        let mut md = QueryMetadata::new(modern_schema());
        let id = md.register_table("person", "person").unwrap();
        assert_eq!(md.output_columns(), Err(MetadataError::EmptyRename));
        assert_eq!(md.check_single_table(), Err(MetadataError::EmptyRename));
        assert_eq!(
            md.record_output_columns(id, Vec::new()),
            Err(MetadataError::EmptyRename)
        );

        let columns = vec![
            OutputColumn::new("name", ColumnType::String),
            OutputColumn::new("EXPR$1", ColumnType::Integer),
        ];
        md.record_output_columns(id, columns.clone()).unwrap();
        assert_eq!(md.output_columns().unwrap(), columns.as_slice());
        assert_eq!(md.renamed_columns(), &["name", "EXPR$1"]);
        assert_eq!(md.check_single_table(), Ok(()));

        assert_eq!(
            md.record_output_columns(id, columns),
            Err(MetadataError::MultiTableReturn)
        );
    }

    #[test]
    fn test_second_table_fails_single_table_check() {
        let mut md = QueryMetadata::new(modern_schema());
        let person = md.register_table("person", "person").unwrap();
        md.register_table("software", "software").unwrap();
        md.record_output_columns(person, vec![OutputColumn::new("name", ColumnType::String)])
            .unwrap();
        assert_eq!(md.check_single_table(), Err(MetadataError::MultiTableReturn));
    }

    #[test]
    fn test_unknown_table() {
        let mut md = QueryMetadata::new(modern_schema());
        assert_eq!(
            md.register_table("robot", "r"),
            Err(MetadataError::UnknownTable {
                label: "robot".into()
            })
        );
    }
}
