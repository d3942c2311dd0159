//! Final column retrieval: `project(c1..cn).by(..)..`.

use crate::{
    select_compiler::errors::TranslationError,
    sql_ast::{builders, SqlNode},
    sql_metadata::{OutputColumn, QueryMetadata, TableId},
    sql_nodes::{EmitContext, ExprNode, Scope},
    traversal::{ByModulator, GremlinValue, Step, Traversal, TraversalSink},
};
use std::collections::HashSet;

/// Stand-in value for a column the element does not carry. The row decoder
/// maps it back to SQL NULL.
pub const NULL_MARKER: &str = "$%#NULL#%$";

/// One entry of the (star-expanded) select list.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub name: String,
    pub expr: SqlNode,
}

/// Expand the select list into named items. `*` expands to every column of
/// the table; unnamed expressions are named `EXPR$<position>`.
pub fn projection_items(
    select_list: &[SqlNode],
    metadata: &QueryMetadata,
    table: TableId,
) -> Result<Vec<ProjectionItem>, TranslationError> {
    let mut items = Vec::with_capacity(select_list.len());
    for (position, node) in select_list.iter().enumerate() {
        match node {
            SqlNode::Identifier(id) if id.is_star() => {
                for column in metadata.gremlin_table(table)?.all_columns() {
                    items.push(ProjectionItem {
                        expr: builders::ident(&column.name),
                        name: column.name,
                    });
                }
            }
            SqlNode::Identifier(id) => items.push(ProjectionItem {
                name: id.simple_name().to_string(),
                expr: node.clone(),
            }),
            SqlNode::Literal(_) | SqlNode::Call(_) => {
                let name = ExprNode::classify(node)?
                    .alias()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("EXPR${}", position));
                items.push(ProjectionItem {
                    name,
                    expr: node.clone(),
                });
            }
        }
    }

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.name.as_str()) {
            return Err(TranslationError::DuplicateColumn(item.name.clone()));
        }
    }
    Ok(items)
}

/// Append the projection. Output columns are recorded only when the sink
/// keeps what it is given.
pub fn emit_projection<S: TraversalSink>(
    items: &[ProjectionItem],
    metadata: &mut QueryMetadata,
    table: TableId,
    sink: &mut S,
) -> Result<(), TranslationError> {
    sink.append(Step::Project(
        items.iter().map(|item| item.name.clone()).collect(),
    ));

    let mut ctx = EmitContext::new(metadata, table, Scope::Bucket);
    for item in items {
        let mut value = Traversal::anonymous();
        ExprNode::classify(&item.expr)?.emit(&mut ctx, &mut value)?;
        let fallback = Traversal::of([Step::Constant(GremlinValue::String(
            NULL_MARKER.to_string(),
        ))]);
        sink.append(Step::By(ByModulator::new(Traversal::of([Step::Coalesce(
            vec![value, fallback],
        )]))));
    }

    if S::RETAINS {
        let columns = items
            .iter()
            .map(|item| {
                let ty = ExprNode::classify(&item.expr)?.column_type(metadata, table)?;
                Ok(OutputColumn::new(item.name.clone(), ty))
            })
            .collect::<Result<Vec<_>, TranslationError>>()?;
        log::debug!(
            "Recording {} output columns for table {}",
            columns.len(),
            table
        );
        metadata.record_output_columns(table, columns)?;
    }
    Ok(())
}
