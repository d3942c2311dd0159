//! Expression node set.
//!
//! [`ExprNode`] is a typed view over one node of the read-only select tree.
//! [`ExprNode::classify`] checks the node's type and shape up front;
//! [`ExprNode::emit`] then appends the node's value fragment to a
//! [`TraversalSink`], and [`ExprNode::emit_condition`] appends it as a filter.
//!
//! Fragments are scope-sensitive. In [`Scope::Element`] the current traverser
//! is a single vertex or edge. In [`Scope::Bucket`] it is the list of elements
//! of one group, so column reads are prefixed with `unfold()` and aggregates
//! become legal.

mod call;
mod identifier;
pub mod operator;

pub use identifier::{physical_steps, resolve_physical};
pub use operator::{AggregateFn, BinaryOp, Operator, PostfixOp, PrefixOp};

use crate::{
    graph_catalog::schema_types::ColumnType,
    select_compiler::errors::TranslationError,
    sql_ast::{SqlBasicCall, SqlIdentifier, SqlLiteral, SqlNode},
    sql_metadata::{QueryMetadata, TableId},
    traversal::{GremlinValue, Step, TraversalSink},
};

/// Alias chains longer than this are treated as cycles.
const MAX_ALIAS_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// One graph element per traverser, before grouping.
    Element,
    /// One group (a list of elements) per traverser.
    Bucket,
}

/// Everything emission needs besides the node and the sink.
#[derive(Debug)]
pub struct EmitContext<'m> {
    pub metadata: &'m mut QueryMetadata,
    pub table: TableId,
    pub scope: Scope,
    /// Aliases currently being expanded, innermost last.
    expanding: Vec<String>,
}

impl<'m> EmitContext<'m> {
    pub fn new(metadata: &'m mut QueryMetadata, table: TableId, scope: Scope) -> Self {
        EmitContext {
            metadata,
            table,
            scope,
            expanding: Vec::new(),
        }
    }

    /// Reborrow with a different scope.
    pub fn with_scope(&mut self, scope: Scope) -> EmitContext<'_> {
        EmitContext {
            metadata: &mut *self.metadata,
            table: self.table,
            scope,
            expanding: self.expanding.clone(),
        }
    }

    fn enter_alias(&mut self, alias: &str) -> Result<(), TranslationError> {
        if self.expanding.iter().any(|a| a == alias) || self.expanding.len() >= MAX_ALIAS_DEPTH {
            return Err(TranslationError::UnsupportedShape(format!(
                "alias `{}` refers to itself",
                alias
            )));
        }
        self.expanding.push(alias.to_string());
        Ok(())
    }

    fn leave_alias(&mut self) {
        self.expanding.pop();
    }
}

/// Call node with its operator already classified.
#[derive(Debug, Clone, Copy)]
pub struct CallNode<'a> {
    pub operator: Operator,
    pub operands: &'a [SqlNode],
    pub call: &'a SqlBasicCall,
}

#[derive(Debug, Clone, Copy)]
pub enum ExprNode<'a> {
    Identifier(&'a SqlIdentifier),
    Literal(&'a SqlLiteral),
    Call(CallNode<'a>),
}

impl<'a> ExprNode<'a> {
    pub fn classify(node: &'a SqlNode) -> Result<Self, TranslationError> {
        match node {
            SqlNode::Identifier(id) => {
                if id.names.is_empty() {
                    return Err(TranslationError::UnsupportedShape(
                        "empty identifier".to_string(),
                    ));
                }
                Ok(ExprNode::Identifier(id))
            }
            SqlNode::Literal(lit) => Ok(ExprNode::Literal(lit)),
            SqlNode::Call(call) => {
                let operator = Operator::classify(&call.operator)?;
                let (min, max) = operator.arity();
                if call.operands.len() < min || call.operands.len() > max {
                    return Err(TranslationError::UnsupportedShape(format!(
                        "{} with {} operands",
                        call.operator.kind,
                        call.operands.len()
                    )));
                }
                if operator == Operator::Alias && alias_name(call).is_none() {
                    return Err(TranslationError::UnsupportedShape(format!(
                        "alias target in `{}` is not a simple name",
                        call
                    )));
                }
                Ok(ExprNode::Call(CallNode {
                    operator,
                    operands: &call.operands,
                    call,
                }))
            }
        }
    }

    /// Append this node's value fragment.
    pub fn emit<S: TraversalSink>(
        &self,
        ctx: &mut EmitContext<'_>,
        sink: &mut S,
    ) -> Result<(), TranslationError> {
        match self {
            ExprNode::Identifier(id) => identifier::emit(id, ctx, sink),
            ExprNode::Literal(lit) => {
                sink.append(Step::Constant(GremlinValue::from(*lit)));
                Ok(())
            }
            ExprNode::Call(call) => match call.operator {
                Operator::Binary(_) | Operator::Prefix(_) => Err(predicate_as_value(call)),
                Operator::Alias | Operator::Postfix(_) | Operator::Aggregate(_) => {
                    call::emit(call, ctx, sink)
                }
            },
        }
    }

    /// Append this node as a filter: traversers for which the condition does
    /// not hold produce nothing.
    pub fn emit_condition<S: TraversalSink>(
        &self,
        ctx: &mut EmitContext<'_>,
        sink: &mut S,
    ) -> Result<(), TranslationError> {
        match self {
            ExprNode::Identifier(id) => identifier::emit_boolean(id, true, ctx, sink),
            ExprNode::Literal(lit) => Err(TranslationError::UnsupportedWhereClause(format!(
                "literal {} used as a condition",
                lit
            ))),
            ExprNode::Call(call) => match call.operator {
                Operator::Binary(_) | Operator::Prefix(_) => call::emit(call, ctx, sink),
                Operator::Alias | Operator::Postfix(_) | Operator::Aggregate(_) => {
                    Err(TranslationError::UnsupportedWhereClause(format!(
                        "`{}` is not a condition",
                        call.call
                    )))
                }
            },
        }
    }

    /// SQL type of the value this node produces.
    pub fn column_type(
        &self,
        metadata: &QueryMetadata,
        table: TableId,
    ) -> Result<ColumnType, TranslationError> {
        self.column_type_at(metadata, table, 0)
    }

    fn column_type_at(
        &self,
        metadata: &QueryMetadata,
        table: TableId,
        depth: usize,
    ) -> Result<ColumnType, TranslationError> {
        if depth > MAX_ALIAS_DEPTH {
            return Err(TranslationError::UnsupportedShape(
                "alias chain too deep".to_string(),
            ));
        }
        match self {
            ExprNode::Identifier(id) => identifier::column_type(id, metadata, table, depth),
            ExprNode::Literal(lit) => Ok(match lit {
                SqlLiteral::Boolean(_) => ColumnType::Boolean,
                SqlLiteral::Integer(_) => ColumnType::Integer,
                SqlLiteral::Decimal(_) => ColumnType::Float,
                SqlLiteral::String(_) | SqlLiteral::Null => ColumnType::String,
            }),
            ExprNode::Call(call) => match call.operator {
                Operator::Alias | Operator::Postfix(_) => ExprNode::classify(&call.operands[0])?
                    .column_type_at(metadata, table, depth + 1),
                Operator::Binary(_) | Operator::Prefix(_) => Err(predicate_as_value(call)),
                Operator::Aggregate(AggregateFn::Count) => Ok(ColumnType::Integer),
                Operator::Aggregate(AggregateFn::Avg) => Ok(ColumnType::Float),
                Operator::Aggregate(AggregateFn::Sum)
                | Operator::Aggregate(AggregateFn::Min)
                | Operator::Aggregate(AggregateFn::Max) => ExprNode::classify(&call.operands[0])?
                    .column_type_at(metadata, table, depth + 1),
            },
        }
    }

    /// Alias name if this is an `AS` call.
    pub fn alias(&self) -> Option<&'a str> {
        match self {
            ExprNode::Call(call) if call.operator == Operator::Alias => alias_name(call.call),
            _ => None,
        }
    }

    /// The node with any `AS` wrapper removed.
    pub fn unaliased(self) -> Result<ExprNode<'a>, TranslationError> {
        match self {
            ExprNode::Call(call) if call.operator == Operator::Alias => {
                ExprNode::classify(&call.operands[0])
            }
            other => Ok(other),
        }
    }

    /// Whether this is a comparison, AND/OR or NOT call. These only lower
    /// to filters, never to values.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            ExprNode::Call(CallNode {
                operator: Operator::Binary(_) | Operator::Prefix(_),
                ..
            })
        )
    }

    /// Whether this node, or the alias it names, is an aggregate call.
    pub fn is_aggregate(&self) -> bool {
        match self {
            ExprNode::Call(call) => match call.operator {
                Operator::Aggregate(_) => true,
                Operator::Alias | Operator::Postfix(_) => ExprNode::classify(&call.operands[0])
                    .map(|inner| inner.is_aggregate())
                    .unwrap_or(false),
                Operator::Binary(_) | Operator::Prefix(_) => false,
            },
            ExprNode::Identifier(_) | ExprNode::Literal(_) => false,
        }
    }
}

fn predicate_as_value(call: &CallNode<'_>) -> TranslationError {
    TranslationError::UnsupportedShape(format!(
        "`{}` used as a value; conditions can only filter",
        call.call
    ))
}

fn alias_name(call: &SqlBasicCall) -> Option<&str> {
    match call.operands.get(1) {
        Some(SqlNode::Identifier(id)) if id.names.len() == 1 => Some(id.simple_name()),
        _ => None,
    }
}
