//! Operator classification for call nodes.

use crate::{
    select_compiler::errors::TranslationError,
    sql_ast::{SqlKind, SqlOperator, SqlSyntax},
    traversal::{Compare, Order},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `<expr> AS <name>`
    Alias,
    Binary(BinaryOp),
    Prefix(PrefixOp),
    Postfix(PostfixOp),
    Aggregate(AggregateFn),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Compare(Compare),
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Desc,
    NullsFirst,
    NullsLast,
}

impl PostfixOp {
    /// Sort direction this postfix carries, if any.
    pub fn order(self) -> Option<Order> {
        match self {
            PostfixOp::Desc => Some(Order::Desc),
            PostfixOp::NullsFirst | PostfixOp::NullsLast => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Operator {
    pub fn classify(op: &SqlOperator) -> Result<Self, TranslationError> {
        let unsupported = || {
            TranslationError::UnsupportedShape(format!(
                "operator {} with {:?} syntax",
                op.kind, op.syntax
            ))
        };

        let operator = match (&op.kind, op.syntax) {
            (SqlKind::As, _) => Operator::Alias,
            (SqlKind::And, SqlSyntax::Binary) => Operator::Binary(BinaryOp::And),
            (SqlKind::Or, SqlSyntax::Binary) => Operator::Binary(BinaryOp::Or),
            (SqlKind::Equals, SqlSyntax::Binary) => Operator::Binary(BinaryOp::Compare(Compare::Eq)),
            (SqlKind::NotEquals, SqlSyntax::Binary) => {
                Operator::Binary(BinaryOp::Compare(Compare::Neq))
            }
            (SqlKind::LessThan, SqlSyntax::Binary) => {
                Operator::Binary(BinaryOp::Compare(Compare::Lt))
            }
            (SqlKind::LessThanOrEqual, SqlSyntax::Binary) => {
                Operator::Binary(BinaryOp::Compare(Compare::Lte))
            }
            (SqlKind::GreaterThan, SqlSyntax::Binary) => {
                Operator::Binary(BinaryOp::Compare(Compare::Gt))
            }
            (SqlKind::GreaterThanOrEqual, SqlSyntax::Binary) => {
                Operator::Binary(BinaryOp::Compare(Compare::Gte))
            }
            (SqlKind::Not, SqlSyntax::Prefix) => Operator::Prefix(PrefixOp::Not),
            (SqlKind::Descending, SqlSyntax::Postfix) => Operator::Postfix(PostfixOp::Desc),
            (SqlKind::NullsFirst, SqlSyntax::Postfix) => Operator::Postfix(PostfixOp::NullsFirst),
            (SqlKind::NullsLast, SqlSyntax::Postfix) => Operator::Postfix(PostfixOp::NullsLast),
            (SqlKind::Count, SqlSyntax::Function) => Operator::Aggregate(AggregateFn::Count),
            (SqlKind::Sum, SqlSyntax::Function) => Operator::Aggregate(AggregateFn::Sum),
            (SqlKind::Avg, SqlSyntax::Function) => Operator::Aggregate(AggregateFn::Avg),
            (SqlKind::Min, SqlSyntax::Function) => Operator::Aggregate(AggregateFn::Min),
            (SqlKind::Max, SqlSyntax::Function) => Operator::Aggregate(AggregateFn::Max),
            _ => return Err(unsupported()),
        };
        Ok(operator)
    }

    /// Expected operand count range, inclusive.
    pub(crate) fn arity(self) -> (usize, usize) {
        match self {
            Operator::Alias | Operator::Binary(_) => (2, 2),
            Operator::Prefix(_) | Operator::Postfix(_) => (1, 1),
            Operator::Aggregate(AggregateFn::Count) => (0, 1),
            Operator::Aggregate(_) => (1, 1),
        }
    }
}
