//! WHERE and HAVING lowering.
//!
//! Both clauses become a single `where(<condition>)` step. What differs is the
//! scope the condition is evaluated in: WHERE normally filters single
//! elements before grouping, HAVING always filters buckets.

use crate::{
    select_compiler::errors::TranslationError,
    sql_ast::{SqlKind, SqlNode, SqlSyntax},
    sql_nodes::{EmitContext, ExprNode, Operator},
    traversal::{Step, Traversal, TraversalSink},
};

/// The accepted WHERE shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereKind {
    /// `WHERE active`
    ImplicitBoolean,
    /// `WHERE NOT active`
    NotBoolean,
    /// A comparison or a logical combination of conditions.
    Predicate,
}

/// Classify a WHERE condition. Every node gets either a kind or an
/// `UnsupportedWhereClause` error.
pub fn classify_where(node: &SqlNode) -> Result<WhereKind, TranslationError> {
    match node {
        SqlNode::Identifier(_) => Ok(WhereKind::ImplicitBoolean),
        SqlNode::Literal(lit) => Err(TranslationError::UnsupportedWhereClause(format!(
            "constant condition {}",
            lit
        ))),
        SqlNode::Call(call) => {
            if call.operator.syntax == SqlSyntax::Prefix {
                if call.operator.kind != SqlKind::Not {
                    return Err(TranslationError::UnsupportedWhereClause(format!(
                        "the only supported prefix operator is NOT, found {}",
                        call.operator.kind
                    )));
                }
                return match call.operands.as_slice() {
                    [SqlNode::Identifier(_)] => Ok(WhereKind::NotBoolean),
                    _ => Err(TranslationError::UnsupportedWhereClause(
                        "NOT can only be applied to a single boolean value".to_string(),
                    )),
                };
            }
            match ExprNode::classify(node) {
                Ok(ExprNode::Call(call)) => match call.operator {
                    Operator::Binary(_) => Ok(WhereKind::Predicate),
                    Operator::Prefix(_)
                    | Operator::Alias
                    | Operator::Postfix(_)
                    | Operator::Aggregate(_) => Err(TranslationError::UnsupportedWhereClause(
                        format!("`{}` is not a predicate", call.call),
                    )),
                },
                Ok(ExprNode::Identifier(_)) | Ok(ExprNode::Literal(_)) => Err(
                    TranslationError::UnsupportedWhereClause(format!("`{}`", node)),
                ),
                Err(TranslationError::UnsupportedShape(reason)) => {
                    Err(TranslationError::UnsupportedWhereClause(reason))
                }
                Err(e) => Err(e),
            }
        }
    }
}

/// Append `where(<condition>)` for a WHERE clause in the context's scope.
pub fn emit_where<S: TraversalSink>(
    node: &SqlNode,
    ctx: &mut EmitContext<'_>,
    sink: &mut S,
) -> Result<(), TranslationError> {
    let kind = classify_where(node)?;
    log::debug!("WHERE `{}` classified as {:?} ({:?} scope)", node, kind, ctx.scope);
    let mut condition = Traversal::anonymous();
    ExprNode::classify(node)?.emit_condition(ctx, &mut condition)?;
    sink.append(Step::Where(condition));
    Ok(())
}

/// Append `where(<condition>)` for a HAVING clause. The context must be in
/// bucket scope.
pub fn emit_having<S: TraversalSink>(
    node: &SqlNode,
    ctx: &mut EmitContext<'_>,
    sink: &mut S,
) -> Result<(), TranslationError> {
    if !matches!(node, SqlNode::Call(_)) {
        return Err(TranslationError::UnsupportedShape(format!(
            "HAVING `{}` is not a predicate call",
            node
        )));
    }
    let mut condition = Traversal::anonymous();
    ExprNode::classify(node)?.emit_condition(ctx, &mut condition)?;
    sink.append(Step::Where(condition));
    Ok(())
}
