use super::{
    identifier, AggregateFn, BinaryOp, CallNode, EmitContext, ExprNode, Operator, PostfixOp,
    PrefixOp, Scope,
};
use crate::{
    select_compiler::errors::TranslationError,
    sql_ast::SqlNode,
    traversal::{Compare, GremlinValue, Predicate, Step, Traversal, TraversalSink},
};

pub(super) fn emit<S: TraversalSink>(
    call: &CallNode<'_>,
    ctx: &mut EmitContext<'_>,
    sink: &mut S,
) -> Result<(), TranslationError> {
    match call.operator {
        Operator::Alias => {
            let inner = &call.operands[0];
            if let Some(name) = ExprNode::Call(*call).alias() {
                ctx.metadata.bind_alias(name, inner)?;
            }
            ExprNode::classify(inner)?.emit(ctx, sink)
        }
        Operator::Binary(BinaryOp::Compare(compare)) => {
            emit_comparison(compare, &call.operands[0], &call.operands[1], ctx, sink)
        }
        Operator::Binary(BinaryOp::And) => {
            let branches = condition_branches(call.operands, ctx)?;
            sink.append(Step::And(branches));
            Ok(())
        }
        Operator::Binary(BinaryOp::Or) => {
            let branches = condition_branches(call.operands, ctx)?;
            sink.append(Step::Or(branches));
            Ok(())
        }
        Operator::Prefix(PrefixOp::Not) => match &call.operands[0] {
            SqlNode::Identifier(id) => identifier::emit_boolean(id, false, ctx, sink),
            other => Err(TranslationError::UnsupportedWhereClause(format!(
                "NOT applied to `{}`; only boolean columns can be negated",
                other
            ))),
        },
        Operator::Postfix(PostfixOp::Desc) => ExprNode::classify(&call.operands[0])?.emit(ctx, sink),
        Operator::Postfix(PostfixOp::NullsFirst) | Operator::Postfix(PostfixOp::NullsLast) => {
            Err(TranslationError::UnsupportedShape(format!(
                "null ordering in `{}`",
                call.call
            )))
        }
        Operator::Aggregate(function) => emit_aggregate(function, call, ctx, sink),
    }
}

/// `<operand> is(<compare>(<literal>))`. Exactly one side must be a literal.
fn emit_comparison<S: TraversalSink>(
    compare: Compare,
    left: &SqlNode,
    right: &SqlNode,
    ctx: &mut EmitContext<'_>,
    sink: &mut S,
) -> Result<(), TranslationError> {
    let (operand, compare, literal) = match (left, right) {
        (SqlNode::Literal(_), SqlNode::Literal(_)) => {
            return Err(TranslationError::UnsupportedWhereClause(format!(
                "comparison of two literals `{} {}`",
                left, right
            )))
        }
        (_, SqlNode::Literal(lit)) => (left, compare, lit),
        (SqlNode::Literal(lit), _) => (right, compare.flipped(), lit),
        _ => {
            return Err(TranslationError::UnsupportedWhereClause(format!(
                "comparison between `{}` and `{}` needs a literal operand",
                left, right
            )))
        }
    };
    ExprNode::classify(operand)?.emit(ctx, sink)?;
    sink.append(Step::Is(Predicate::new(compare, GremlinValue::from(literal))));
    Ok(())
}

fn condition_branches(
    operands: &[SqlNode],
    ctx: &mut EmitContext<'_>,
) -> Result<Vec<Traversal>, TranslationError> {
    operands
        .iter()
        .map(|operand| {
            let mut branch = Traversal::anonymous();
            ExprNode::classify(operand)?.emit_condition(ctx, &mut branch)?;
            Ok(branch)
        })
        .collect()
}

fn emit_aggregate<S: TraversalSink>(
    function: AggregateFn,
    call: &CallNode<'_>,
    ctx: &mut EmitContext<'_>,
    sink: &mut S,
) -> Result<(), TranslationError> {
    if ctx.scope != Scope::Bucket {
        return Err(TranslationError::UnsupportedShape(format!(
            "aggregate `{}` outside a grouped context",
            call.call
        )));
    }
    ctx.metadata.mark_aggregate();

    sink.append(Step::Unfold);
    match call.operands.first() {
        None => {}
        Some(SqlNode::Identifier(id)) if id.is_star() => {}
        Some(operand) => {
            let mut element = ctx.with_scope(Scope::Element);
            ExprNode::classify(operand)?.emit(&mut element, sink)?;
        }
    }
    sink.append(match function {
        AggregateFn::Count => Step::Count,
        AggregateFn::Sum => Step::Sum,
        AggregateFn::Avg => Step::Mean,
        AggregateFn::Min => Step::Min,
        AggregateFn::Max => Step::Max,
    });
    Ok(())
}
