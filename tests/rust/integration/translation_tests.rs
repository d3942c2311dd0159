//! SELECT trees lowered to Gremlin, clause by clause.

use super::common::modern_schema;
use sqlgremlin::{
    graph_catalog::ColumnType,
    select_compiler::{compile, errors::TranslationError, TranslatorConfig, WherePlacement},
    sql_ast::{builders::*, SqlSelect},
    sql_metadata::errors::MetadataError,
};
use test_case::test_case;

const HEAD: &str = "g.V().hasLabel('person')";
const DEFAULT_ORDER: &str = ".order().by(__.unfold().id())";

fn groovy(select: &SqlSelect) -> String {
    compile(select, modern_schema(), &TranslatorConfig::default())
        .expect("query compiles")
        .to_groovy()
}

fn groovy_with(select: &SqlSelect, placement: WherePlacement) -> String {
    let config = TranslatorConfig {
        where_placement: placement,
    };
    compile(select, modern_schema(), &config)
        .expect("query compiles")
        .to_groovy()
}

fn compile_err(select: &SqlSelect) -> TranslationError {
    compile(select, modern_schema(), &TranslatorConfig::default())
        .expect_err("query is rejected")
}

/// `.by(__.coalesce(<value>, __.constant(NULL)))` for one projected column.
fn column(value: &str) -> String {
    format!(".by(__.coalesce(__.{}, __.constant('$%#NULL#%$')))", value)
}

/// Plain select: no filter, no grouping, default ordering.
#[test]
fn test_plain_select() {
    let select = SqlSelect::new(vec![ident("name")]).from_table("person");
    let compiled = compile(&select, modern_schema(), &TranslatorConfig::default()).unwrap();

    assert_eq!(
        compiled.to_groovy(),
        format!(
            "{}.group().unfold().select(values){}.project('name'){}",
            HEAD,
            DEFAULT_ORDER,
            column("unfold().values('name')")
        )
    );
    assert_eq!(compiled.column_names(), vec!["name".to_string()]);
    assert_eq!(compiled.columns()[0].ty, ColumnType::String);
}

/// GROUP BY with a count: one bucket per key, unnamed column named by position.
#[test]
fn test_group_by_with_count() {
    let select = SqlSelect::new(vec![ident("dept"), count_star()])
        .from_table("person")
        .group_by(vec![ident("dept")]);
    let compiled = compile(&select, modern_schema(), &TranslatorConfig::default()).unwrap();

    assert_eq!(
        compiled.to_groovy(),
        format!(
            "{}.group().by(__.union(__.values('dept')).fold()).unfold().select(values){}\
             .project('dept', 'EXPR$1'){}{}",
            HEAD,
            DEFAULT_ORDER,
            column("unfold().values('dept')"),
            column("unfold().count()")
        )
    );
    let types: Vec<_> = compiled.columns().iter().map(|c| c.ty).collect();
    assert_eq!(types, vec![ColumnType::String, ColumnType::Integer]);
    assert!(compiled.metadata().has_aggregate());
}

/// `WHERE NOT isActive` becomes an equality against false, before grouping.
#[test]
fn test_where_not_boolean_column() {
    let select = SqlSelect::new(vec![ident("name")])
        .from_table("person")
        .filter(not(ident("isActive")));

    assert_eq!(
        groovy(&select),
        format!(
            "{}.where(__.values('isActive').is(eq(false))).group().unfold().select(values){}\
             .project('name'){}",
            HEAD,
            DEFAULT_ORDER,
            column("unfold().values('name')")
        )
    );
}

/// A conjunction of a comparison and a bare boolean column.
#[test]
fn test_where_conjunction() {
    let select = SqlSelect::new(vec![ident("name")])
        .from_table("person")
        .filter(and(gt(ident("age"), int(30)), ident("isActive")));

    assert!(groovy(&select).starts_with(&format!(
        "{}.where(__.and(__.values('age').is(gt(30L)), __.values('isActive').is(eq(true))))\
         .group()",
        HEAD
    )));
}

/// A filter on a column the table does not have is a resolution error.
#[test]
fn test_where_unknown_column() {
    let select = SqlSelect::new(vec![ident("name")])
        .from_table("person")
        .filter(and(gt(ident("age"), int(30)), ident("active")));

    assert_eq!(
        compile_err(&select),
        TranslationError::Metadata(MetadataError::UnresolvedColumn {
            table: "person".into(),
            column: "active".into()
        })
    );
}

/// No FROM clause at all.
#[test]
fn test_missing_from_is_malformed() {
    let select = SqlSelect::new(vec![ident("name")]);
    assert_eq!(compile_err(&select), TranslationError::MalformedFrom);
}

#[test]
fn test_empty_select_list() {
    let select = SqlSelect::new(vec![]).from_table("person");
    assert_eq!(compile_err(&select), TranslationError::MissingSelectList);
}

#[test]
fn test_unknown_table() {
    let select = SqlSelect::new(vec![ident("name")]).from_table("robot");
    assert_eq!(
        compile_err(&select),
        TranslationError::Metadata(MetadataError::UnknownTable {
            label: "robot".into()
        })
    );
}

/// k grouping keys produce a union with k branches.
#[test_case(&["dept"] ; "one key")]
#[test_case(&["dept", "age"] ; "two keys")]
#[test_case(&["dept", "age", "name"] ; "three keys")]
fn test_group_key_cardinality(keys: &[&str]) {
    let select = SqlSelect::new(keys.iter().map(|k| ident(k)).collect())
        .from_table("person")
        .group_by(keys.iter().map(|k| ident(k)).collect());

    let branches: Vec<String> = keys.iter().map(|k| format!("__.values('{}')", k)).collect();
    let expected = format!(
        "{}.group().by(__.union({}).fold()).unfold().select(values)",
        HEAD,
        branches.join(", ")
    );
    assert!(
        groovy(&select).starts_with(&expected),
        "expected prefix {}",
        expected
    );
}

/// Aggregates without GROUP BY collapse the table into a single bucket.
#[test]
fn test_aggregate_without_group_by() {
    let select = SqlSelect::new(vec![count_star(), alias(avg(ident("age")), "mean_age")])
        .from_table("person");
    let compiled = compile(&select, modern_schema(), &TranslatorConfig::default()).unwrap();

    assert_eq!(
        compiled.to_groovy(),
        format!(
            "{}.group().by(__.constant(true)).unfold().select(values){}\
             .project('EXPR$0', 'mean_age'){}{}",
            HEAD,
            DEFAULT_ORDER,
            column("unfold().count()"),
            column("unfold().values('age').mean()")
        )
    );
    let types: Vec<_> = compiled.columns().iter().map(|c| c.ty).collect();
    assert_eq!(types, vec![ColumnType::Integer, ColumnType::Float]);
}

/// The aggregate flag is discovered from HAVING alone.
#[test]
fn test_aggregate_only_in_having() {
    let select = SqlSelect::new(vec![ident("dept")])
        .from_table("person")
        .group_by(vec![ident("dept")])
        .having(gt(count_star(), int(1)));

    assert_eq!(
        groovy(&select),
        format!(
            "{}.group().by(__.union(__.values('dept')).fold()).unfold().select(values){}\
             .where(__.unfold().count().is(gt(1L))).project('dept'){}",
            HEAD,
            DEFAULT_ORDER,
            column("unfold().values('dept')")
        )
    );
}

/// Aggregates can't be used on single elements.
#[test]
fn test_aggregate_in_where_rejected() {
    let select = SqlSelect::new(vec![ident("name")])
        .from_table("person")
        .filter(gt(count_star(), int(1)));
    assert!(matches!(
        compile_err(&select),
        TranslationError::UnsupportedShape(_)
    ));
}

/// Each sort key keeps its direction; keys without one sort ascending.
#[test]
fn test_order_by_directions() {
    let select = SqlSelect::new(vec![ident("name"), ident("age")])
        .from_table("person")
        .order_by(vec![desc(ident("age")), ident("name")]);

    assert!(groovy(&select).contains(
        ".select(values).order()\
         .by(__.unfold().values('age'), desc)\
         .by(__.unfold().values('name'), asc)\
         .project('name', 'age')"
    ));
}

/// Ordinals refer to (1-based) select list positions.
#[test]
fn test_order_by_ordinal() {
    let select = SqlSelect::new(vec![ident("name"), ident("age")])
        .from_table("person")
        .order_by(vec![desc(int(2))]);
    assert!(groovy(&select).contains(".order().by(__.unfold().values('age'), desc).project("));

    let select = SqlSelect::new(vec![ident("name"), ident("age")])
        .from_table("person")
        .order_by(vec![int(3)]);
    assert_eq!(
        compile_err(&select),
        TranslationError::InvalidOrdinal {
            ordinal: 3,
            columns: 2
        }
    );
}

/// ORDER BY can name a select-list alias of an aggregate.
#[test]
fn test_order_by_aggregate_alias() {
    let select = SqlSelect::new(vec![ident("dept"), alias(count_star(), "n")])
        .from_table("person")
        .group_by(vec![ident("dept")])
        .order_by(vec![desc(ident("n"))]);

    assert!(groovy(&select).contains(
        ".select(values).order().by(__.unfold().count(), desc).project('dept', 'n')"
    ));
}

/// Physical columns win over aliases that shadow them.
#[test]
fn test_physical_column_wins_over_alias() {
    let select = SqlSelect::new(vec![alias(ident("name"), "age"), alias(ident("age"), "years")])
        .from_table("person")
        .order_by(vec![ident("age")]);
    let compiled = compile(&select, modern_schema(), &TranslatorConfig::default()).unwrap();

    assert!(compiled
        .to_groovy()
        .contains(".order().by(__.unfold().values('age'), asc)"));
    assert_eq!(compiled.column_names(), vec!["age", "years"]);
    assert_eq!(compiled.columns()[0].ty, ColumnType::String);
    assert_eq!(compiled.columns()[1].ty, ColumnType::Integer);
}

/// Aliases from the select list are visible to WHERE.
#[test]
fn test_where_uses_select_alias() {
    let select = SqlSelect::new(vec![alias(ident("name"), "n")])
        .from_table("person")
        .filter(eq(ident("n"), string("marko")));

    assert!(groovy(&select).starts_with(&format!(
        "{}.where(__.values('name').is(eq('marko'))).group()",
        HEAD
    )));
}

/// Aliases from one compile don't leak into the next.
#[test]
fn test_aliases_are_per_query() {
    let schema = modern_schema();
    let first = SqlSelect::new(vec![alias(ident("name"), "n")]).from_table("person");
    compile(&first, schema.clone(), &TranslatorConfig::default()).unwrap();

    let second = SqlSelect::new(vec![ident("age")])
        .from_table("person")
        .order_by(vec![ident("n")]);
    assert_eq!(
        compile(&second, schema, &TranslatorConfig::default()).unwrap_err(),
        TranslationError::Metadata(MetadataError::UnresolvedColumn {
            table: "person".into(),
            column: "n".into()
        })
    );
}

/// The table alias is accepted as a column qualifier.
#[test]
fn test_qualified_columns() {
    let select = SqlSelect::new(vec![ident("p.name")])
        .from_aliased("person", "p")
        .filter(eq(ident("p.dept"), string("eng")));
    let out = groovy(&select);
    assert!(out.starts_with(&format!("{}.where(__.values('dept').is(eq('eng')))", HEAD)));
    assert!(out.ends_with(&format!(".project('name'){}", column("unfold().values('name')"))));

    let select = SqlSelect::new(vec![ident("q.name")]).from_aliased("person", "p");
    assert!(matches!(
        compile_err(&select),
        TranslationError::Metadata(MetadataError::UnresolvedColumn { .. })
    ));
}

/// WHERE placement moves the filter between element and bucket scope.
#[test]
fn test_where_placement() {
    let select = SqlSelect::new(vec![ident("dept")])
        .from_table("person")
        .filter(gt(ident("age"), int(30)))
        .group_by(vec![ident("dept")])
        .having(gt(count_star(), int(1)));

    let before = groovy_with(&select, WherePlacement::BeforeGrouping);
    assert!(before.starts_with(&format!(
        "{}.where(__.values('age').is(gt(30L))).group()",
        HEAD
    )));

    let after = groovy_with(&select, WherePlacement::AfterHaving);
    assert!(after.starts_with(&format!("{}.group()", HEAD)));
    assert!(after.contains(
        ".where(__.unfold().count().is(gt(1L)))\
         .where(__.unfold().values('age').is(gt(30L)))\
         .project('dept')"
    ));
}

/// Every WHERE shape either compiles or reports an unsupported clause.
#[test_case(ident("name") ; "non boolean column")]
#[test_case(not(ident("age")) ; "negated non boolean column")]
#[test_case(not(gt(ident("age"), int(1))) ; "negated comparison")]
#[test_case(int(1) ; "bare literal")]
#[test_case(gt(ident("age"), ident("age")) ; "column against column")]
#[test_case(eq(int(1), int(1)) ; "literal against literal")]
#[test_case(count(ident("age")) ; "bare aggregate")]
fn test_unsupported_where(predicate: sqlgremlin::sql_ast::SqlNode) {
    let select = SqlSelect::new(vec![ident("name")])
        .from_table("person")
        .filter(predicate);
    assert!(matches!(
        compile_err(&select),
        TranslationError::UnsupportedWhereClause(_)
    ));
}

/// A literal on the left flips the comparison.
#[test]
fn test_literal_on_left() {
    let select = SqlSelect::new(vec![ident("name")])
        .from_table("person")
        .filter(or(lt(int(30), ident("age")), ge(decimal(1.5), ident("age"))));
    assert!(groovy(&select).starts_with(&format!(
        "{}.where(__.or(__.values('age').is(gt(30L)), __.values('age').is(lte(1.5d))))",
        HEAD
    )));
}

/// `SELECT *` on an edge table: id, properties, then both endpoints.
#[test]
fn test_star_on_edge_table() {
    let select = SqlSelect::new(vec![star()]).from_table("created");
    let compiled = compile(&select, modern_schema(), &TranslatorConfig::default()).unwrap();

    assert_eq!(
        compiled.column_names(),
        vec!["created_ID", "weight", "software_IN_ID", "person_OUT_ID"]
    );
    assert_eq!(
        compiled.to_groovy(),
        format!(
            "g.E().hasLabel('created').group().unfold().select(values){}\
             .project('created_ID', 'weight', 'software_IN_ID', 'person_OUT_ID'){}{}{}{}",
            DEFAULT_ORDER,
            column("unfold().id()"),
            column("unfold().values('weight')"),
            column("unfold().inV().id()"),
            column("unfold().outV().id()")
        )
    );
}

/// Endpoint columns can be selected but not grouped or sorted on.
#[test]
fn test_edge_endpoints_rejected_in_group_and_order() {
    let grouped = SqlSelect::new(vec![ident("person_OUT_ID")])
        .from_table("created")
        .group_by(vec![ident("person_OUT_ID")]);
    assert!(matches!(
        compile_err(&grouped),
        TranslationError::UnsupportedShape(_)
    ));

    let ordered = SqlSelect::new(vec![alias(ident("software_IN_ID"), "target")])
        .from_table("created")
        .order_by(vec![ident("target")]);
    assert!(matches!(
        compile_err(&ordered),
        TranslationError::UnsupportedShape(_)
    ));

    let by_weight = SqlSelect::new(vec![ident("person_OUT_ID")])
        .from_table("created")
        .order_by(vec![desc(ident("weight"))]);
    assert!(groovy(&by_weight).contains(".order().by(__.unfold().values('weight'), desc)"));
}

/// Two select items with the same output name.
#[test]
fn test_duplicate_output_column() {
    let select = SqlSelect::new(vec![ident("name"), alias(ident("dept"), "name")])
        .from_table("person");
    assert_eq!(
        compile_err(&select),
        TranslationError::DuplicateColumn("name".into())
    );
}

/// Literal select items project constants.
#[test]
fn test_literal_select_item() {
    let select = SqlSelect::new(vec![ident("name"), alias(string("x"), "tag")]).from_table("person");
    let compiled = compile(&select, modern_schema(), &TranslatorConfig::default()).unwrap();
    assert!(compiled
        .to_groovy()
        .ends_with(&column("constant('x')")));
    assert_eq!(compiled.columns()[1].ty, ColumnType::String);
}

/// Conditions only filter; selecting or sorting on one is rejected instead of
/// being lowered to a filter that yields the wrong values.
#[test]
fn test_condition_in_value_position_rejected() {
    let selected = SqlSelect::new(vec![alias(gt(ident("age"), int(30)), "old")]).from_table("person");
    assert!(matches!(
        compile_err(&selected),
        TranslationError::UnsupportedShape(_)
    ));

    let filtered = SqlSelect::new(vec![ident("name"), alias(not(ident("isActive")), "idle")])
        .from_table("person")
        .filter(ident("idle"));
    assert!(matches!(
        compile_err(&filtered),
        TranslationError::UnsupportedShape(_)
    ));

    let sorted = SqlSelect::new(vec![ident("name")])
        .from_table("person")
        .order_by(vec![desc(eq(ident("dept"), string("eng")))]);
    assert!(matches!(
        compile_err(&sorted),
        TranslationError::UnsupportedShape(_)
    ));
}
