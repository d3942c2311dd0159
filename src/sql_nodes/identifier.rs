use super::{EmitContext, ExprNode, Scope};
use crate::{
    graph_catalog::{graph_schema::PhysicalColumn, schema_types::ColumnType},
    select_compiler::errors::TranslationError,
    sql_ast::SqlIdentifier,
    sql_metadata::{errors::MetadataError, QueryMetadata, ResolvedColumn, TableId},
    traversal::{GremlinValue, Predicate, Step, TraversalSink},
};

/// Steps reading a physical column off the current element.
pub fn physical_steps(column: &PhysicalColumn) -> Vec<Step> {
    match column {
        PhysicalColumn::Property(key) => vec![Step::Values(key.clone())],
        PhysicalColumn::Id => vec![Step::Id],
        PhysicalColumn::InVertexId => vec![Step::InV, Step::Id],
        PhysicalColumn::OutVertexId => vec![Step::OutV, Step::Id],
    }
}

/// Reject `q.col` when `q` names neither the registered alias nor the table.
fn check_qualifier(
    id: &SqlIdentifier,
    metadata: &QueryMetadata,
    table: TableId,
) -> Result<(), TranslationError> {
    if let Some(qualifier) = id.qualifier() {
        let registered = metadata.table(table)?;
        if !qualifier.eq_ignore_ascii_case(&registered.working_label)
            && !qualifier.eq_ignore_ascii_case(&registered.label)
        {
            return Err(MetadataError::UnresolvedColumn {
                table: qualifier.to_string(),
                column: id.simple_name().to_string(),
            }
            .into());
        }
    }
    Ok(())
}

pub(super) fn emit<S: TraversalSink>(
    id: &SqlIdentifier,
    ctx: &mut EmitContext<'_>,
    sink: &mut S,
) -> Result<(), TranslationError> {
    if id.is_star() {
        return Err(TranslationError::UnsupportedShape(format!(
            "`{}` outside the select list",
            id
        )));
    }
    check_qualifier(id, ctx.metadata, ctx.table)?;

    match ctx.metadata.resolve_column(ctx.table, id.simple_name())? {
        ResolvedColumn::Physical(column) => {
            if ctx.scope == Scope::Bucket {
                sink.append(Step::Unfold);
            }
            for step in physical_steps(&column.physical) {
                sink.append(step);
            }
            Ok(())
        }
        ResolvedColumn::Alias(expr) => {
            ctx.enter_alias(id.simple_name())?;
            let result = ExprNode::classify(&expr).and_then(|node| node.emit(ctx, sink));
            ctx.leave_alias();
            result
        }
    }
}

/// `<boolean column> is(eq(expected))`: the bare `WHERE active` and
/// `WHERE NOT active` forms.
pub(super) fn emit_boolean<S: TraversalSink>(
    id: &SqlIdentifier,
    expected: bool,
    ctx: &mut EmitContext<'_>,
    sink: &mut S,
) -> Result<(), TranslationError> {
    check_qualifier(id, ctx.metadata, ctx.table)?;
    if let ResolvedColumn::Alias(expr) = ctx.metadata.resolve_column(ctx.table, id.simple_name())? {
        if ExprNode::classify(&expr)?.unaliased()?.is_predicate() {
            return Err(TranslationError::UnsupportedWhereClause(format!(
                "`{}` names the condition `{}`, not a boolean column",
                id, expr
            )));
        }
    }
    let ty = column_type(id, ctx.metadata, ctx.table, 0)?;
    if ty != ColumnType::Boolean {
        return Err(TranslationError::UnsupportedWhereClause(format!(
            "`{}` is {}, not boolean",
            id, ty
        )));
    }
    emit(id, ctx, sink)?;
    sink.append(Step::Is(Predicate::eq(GremlinValue::Bool(expected))));
    Ok(())
}

pub(super) fn column_type(
    id: &SqlIdentifier,
    metadata: &QueryMetadata,
    table: TableId,
    depth: usize,
) -> Result<ColumnType, TranslationError> {
    check_qualifier(id, metadata, table)?;
    match metadata.resolve_column(table, id.simple_name())? {
        ResolvedColumn::Physical(column) => Ok(column.ty),
        ResolvedColumn::Alias(expr) => {
            ExprNode::classify(&expr)?.column_type_at(metadata, table, depth + 1)
        }
    }
}

/// Physical column an identifier (or the alias it names) reads, if any.
pub fn resolve_physical(
    id: &SqlIdentifier,
    metadata: &QueryMetadata,
    table: TableId,
) -> Result<Option<PhysicalColumn>, TranslationError> {
    let mut current = id.clone();
    for _ in 0..=super::MAX_ALIAS_DEPTH {
        check_qualifier(&current, metadata, table)?;
        match metadata.resolve_column(table, current.simple_name())? {
            ResolvedColumn::Physical(column) => return Ok(Some(column.physical)),
            ResolvedColumn::Alias(expr) => match ExprNode::classify(&expr)?.unaliased()? {
                ExprNode::Identifier(next) => current = next.clone(),
                ExprNode::Literal(_) | ExprNode::Call(_) => return Ok(None),
            },
        }
    }
    Ok(None)
}
