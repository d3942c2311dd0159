//! Single-table SELECT lowering.
//!
//! The traversal always has the same stage order:
//!
//! ```text
//! g.V().hasLabel(t)           source (g.E() for edge tables)
//!   [.where(..)]              WHERE, element scope (before grouping)
//!   .group()[.by(..)].unfold()
//!   .select(values)           one bucket (list of elements) per row
//!   .order().by(..)..
//!   [.where(..)]              HAVING, bucket scope
//!   [.where(..)]              WHERE, bucket scope (after-having placement)
//!   .project(..).by(..)..     column retrieval
//! ```
//!
//! Compilation runs the select list, HAVING and ORDER BY through a
//! [`DiscardSink`] first so that aliases and the aggregate flag are known
//! before any of the real stages are emitted.

use crate::{
    graph_catalog::graph_schema::TableKind,
    select_compiler::{
        data_retrieval::{emit_projection, projection_items, ProjectionItem},
        errors::TranslationError,
        where_clause::{emit_having, emit_where},
        TranslatorConfig, WherePlacement,
    },
    sql_ast::{SqlLiteral, SqlNode, SqlSelect},
    sql_metadata::{QueryMetadata, TableId},
    sql_nodes::{resolve_physical, EmitContext, ExprNode, Operator, Scope},
    traversal::{
        ByModulator, DiscardSink, GremlinValue, Order, Step, Traversal, TraversalSink,
    },
};

/// `FROM <table> AS <alias>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    pub label: String,
    pub alias: String,
}

impl SourceTable {
    pub fn from_clause(from: Option<&SqlNode>) -> Result<Self, TranslationError> {
        let call = match from {
            Some(SqlNode::Call(call)) => call,
            _ => return Err(TranslationError::MalformedFrom),
        };
        if Operator::classify(&call.operator).ok() != Some(Operator::Alias) {
            return Err(TranslationError::MalformedFrom);
        }
        match call.operands.as_slice() {
            [SqlNode::Identifier(table), SqlNode::Identifier(alias)]
                if !table.is_star() && !alias.is_star() =>
            {
                Ok(SourceTable {
                    label: table.simple_name().to_string(),
                    alias: alias.simple_name().to_string(),
                })
            }
            _ => Err(TranslationError::MalformedFrom),
        }
    }
}

pub(super) fn translate(
    select: &SqlSelect,
    metadata: &mut QueryMetadata,
    config: &TranslatorConfig,
) -> Result<Traversal, TranslationError> {
    let source = SourceTable::from_clause(select.from.as_ref())?;
    if select.select_list.is_empty() {
        return Err(TranslationError::MissingSelectList);
    }
    let table = metadata.register_table(&source.label, &source.alias)?;
    let items = projection_items(&select.select_list, metadata, table)?;

    // Phase 1: alias discovery.
    let mut discard = DiscardSink::new();
    emit_projection(&items, metadata, table, &mut discard)?;
    if let Some(having) = &select.having {
        let mut ctx = EmitContext::new(metadata, table, Scope::Bucket);
        emit_having(having, &mut ctx, &mut discard)?;
    }
    emit_order_by(select.order_by.as_deref(), &items, metadata, table, &mut discard)?;
    log::debug!(
        "Alias discovery done ({} steps discarded, aggregate: {})",
        discard.discarded(),
        metadata.has_aggregate()
    );

    // Phase 2: the traversal that gets executed.
    let registered = metadata.table(table)?;
    let mut traversal = match registered.kind {
        TableKind::Vertex => Traversal::vertices(),
        TableKind::Edge { .. } => Traversal::edges(),
    };
    traversal.append(Step::HasLabel(registered.label.clone()));

    if let (Some(filter), WherePlacement::BeforeGrouping) =
        (&select.where_clause, config.where_placement)
    {
        let mut ctx = EmitContext::new(metadata, table, Scope::Element);
        emit_where(filter, &mut ctx, &mut traversal)?;
    }

    emit_group_by(select.group_by.as_deref(), metadata, table, &mut traversal)?;
    traversal.append(Step::SelectValues);
    emit_order_by(select.order_by.as_deref(), &items, metadata, table, &mut traversal)?;

    if let Some(having) = &select.having {
        let mut ctx = EmitContext::new(metadata, table, Scope::Bucket);
        emit_having(having, &mut ctx, &mut traversal)?;
    }

    if let (Some(filter), WherePlacement::AfterHaving) =
        (&select.where_clause, config.where_placement)
    {
        let mut ctx = EmitContext::new(metadata, table, Scope::Bucket);
        emit_where(filter, &mut ctx, &mut traversal)?;
    }

    emit_projection(&items, metadata, table, &mut traversal)?;
    metadata.check_single_table()?;

    log::debug!("Compiled traversal: {}", traversal);
    Ok(traversal)
}

fn emit_group_by<S: TraversalSink>(
    keys: Option<&[SqlNode]>,
    metadata: &mut QueryMetadata,
    table: TableId,
    sink: &mut S,
) -> Result<(), TranslationError> {
    sink.append(Step::Group);
    match keys {
        Some(keys) if !keys.is_empty() => {
            let mut ctx = EmitContext::new(metadata, table, Scope::Element);
            let mut branches = Vec::with_capacity(keys.len());
            for key in keys {
                let id = match ExprNode::classify(key)? {
                    ExprNode::Identifier(id) => id,
                    ExprNode::Literal(_) | ExprNode::Call(_) => {
                        return Err(TranslationError::UnsupportedShape(format!(
                            "GROUP BY `{}`; only columns can be grouped by",
                            key
                        )))
                    }
                };
                if resolve_physical(id, ctx.metadata, table)?
                    .is_some_and(|column| column.is_edge_endpoint())
                {
                    return Err(TranslationError::UnsupportedShape(format!(
                        "cannot group by edge endpoint `{}`",
                        id
                    )));
                }
                let mut branch = Traversal::anonymous();
                ExprNode::Identifier(id).emit(&mut ctx, &mut branch)?;
                branches.push(branch);
            }
            log::debug!("Grouping by {} keys", branches.len());
            sink.append(Step::By(ByModulator::new(Traversal::of([
                Step::Union(branches),
                Step::Fold,
            ]))));
        }
        _ if metadata.has_aggregate() => {
            sink.append(Step::By(ByModulator::new(Traversal::of([Step::Constant(
                GremlinValue::Bool(true),
            )]))));
        }
        _ => {}
    }
    sink.append(Step::Unfold);
    Ok(())
}

fn emit_order_by<S: TraversalSink>(
    keys: Option<&[SqlNode]>,
    items: &[ProjectionItem],
    metadata: &mut QueryMetadata,
    table: TableId,
    sink: &mut S,
) -> Result<(), TranslationError> {
    sink.append(Step::Order);
    let keys = match keys {
        Some(keys) if !keys.is_empty() => keys,
        _ => {
            sink.append(Step::By(ByModulator::new(Traversal::of([
                Step::Unfold,
                Step::Id,
            ]))));
            return Ok(());
        }
    };

    let mut ctx = EmitContext::new(metadata, table, Scope::Bucket);
    for key in keys {
        let (expr, order) = split_direction(key)?;
        let expr = match expr {
            SqlNode::Literal(SqlLiteral::Integer(ordinal)) => ordinal_item(*ordinal, items)?,
            other => other,
        };
        let node = ExprNode::classify(expr)?.unaliased()?;
        if let ExprNode::Identifier(id) = node {
            if resolve_physical(id, ctx.metadata, table)?
                .is_some_and(|column| column.is_edge_endpoint())
            {
                return Err(TranslationError::UnsupportedShape(format!(
                    "cannot order by edge endpoint `{}`",
                    id
                )));
            }
        }
        let mut by = Traversal::anonymous();
        node.emit(&mut ctx, &mut by)?;
        sink.append(Step::By(ByModulator::ordered(by, order)));
    }
    Ok(())
}

/// Strip a trailing `DESC`; anything else sorts ascending.
fn split_direction(key: &SqlNode) -> Result<(&SqlNode, Order), TranslationError> {
    if let ExprNode::Call(call) = ExprNode::classify(key)? {
        if let Operator::Postfix(postfix) = call.operator {
            return match postfix.order() {
                Some(order) => Ok((&call.operands[0], order)),
                None => Err(TranslationError::UnsupportedShape(format!(
                    "ORDER BY `{}`",
                    key
                ))),
            };
        }
    }
    Ok((key, Order::Asc))
}

fn ordinal_item(ordinal: i64, items: &[ProjectionItem]) -> Result<&SqlNode, TranslationError> {
    usize::try_from(ordinal)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| items.get(index))
        .map(|item| &item.expr)
        .ok_or(TranslationError::InvalidOrdinal {
            ordinal,
            columns: items.len(),
        })
}
