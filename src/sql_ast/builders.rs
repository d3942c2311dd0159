//! Shorthand constructors for hand-built select trees.
//!
//! ```
//! use sqlgremlin::sql_ast::{builders::*, SqlSelect};
//!
//! let select = SqlSelect::new(vec![ident("dept"), count_star()])
//!     .from_table("person")
//!     .group_by(vec![ident("dept")]);
//! assert_eq!(select.select_list.len(), 2);
//! ```

use super::{SqlBasicCall, SqlIdentifier, SqlKind, SqlLiteral, SqlNode, SqlOperator, SqlSyntax};

/// Identifier from a dotted path: `"p.name"` becomes `["p", "name"]`.
pub fn ident(path: &str) -> SqlNode {
    SqlNode::Identifier(SqlIdentifier::new(path.split('.')))
}

pub fn star() -> SqlNode {
    ident("*")
}

pub fn int(value: i64) -> SqlNode {
    SqlNode::Literal(SqlLiteral::Integer(value))
}

pub fn decimal(value: f64) -> SqlNode {
    SqlNode::Literal(SqlLiteral::Decimal(value))
}

pub fn string(value: &str) -> SqlNode {
    SqlNode::Literal(SqlLiteral::String(value.to_string()))
}

pub fn boolean(value: bool) -> SqlNode {
    SqlNode::Literal(SqlLiteral::Boolean(value))
}

pub fn null() -> SqlNode {
    SqlNode::Literal(SqlLiteral::Null)
}

pub fn call(kind: SqlKind, syntax: SqlSyntax, operands: Vec<SqlNode>) -> SqlNode {
    SqlNode::Call(SqlBasicCall {
        operator: SqlOperator::new(kind, syntax),
        operands,
    })
}

/// `<expr> AS <name>`.
pub fn alias(expr: SqlNode, name: &str) -> SqlNode {
    call(SqlKind::As, SqlSyntax::Special, vec![expr, ident(name)])
}

pub fn and(left: SqlNode, right: SqlNode) -> SqlNode {
    call(SqlKind::And, SqlSyntax::Binary, vec![left, right])
}

pub fn or(left: SqlNode, right: SqlNode) -> SqlNode {
    call(SqlKind::Or, SqlSyntax::Binary, vec![left, right])
}

pub fn not(operand: SqlNode) -> SqlNode {
    call(SqlKind::Not, SqlSyntax::Prefix, vec![operand])
}

pub fn desc(operand: SqlNode) -> SqlNode {
    call(SqlKind::Descending, SqlSyntax::Postfix, vec![operand])
}

pub fn eq(left: SqlNode, right: SqlNode) -> SqlNode {
    call(SqlKind::Equals, SqlSyntax::Binary, vec![left, right])
}

pub fn ne(left: SqlNode, right: SqlNode) -> SqlNode {
    call(SqlKind::NotEquals, SqlSyntax::Binary, vec![left, right])
}

pub fn lt(left: SqlNode, right: SqlNode) -> SqlNode {
    call(SqlKind::LessThan, SqlSyntax::Binary, vec![left, right])
}

pub fn le(left: SqlNode, right: SqlNode) -> SqlNode {
    call(SqlKind::LessThanOrEqual, SqlSyntax::Binary, vec![left, right])
}

pub fn gt(left: SqlNode, right: SqlNode) -> SqlNode {
    call(SqlKind::GreaterThan, SqlSyntax::Binary, vec![left, right])
}

pub fn ge(left: SqlNode, right: SqlNode) -> SqlNode {
    call(SqlKind::GreaterThanOrEqual, SqlSyntax::Binary, vec![left, right])
}

/// `COUNT(*)`, which the validator emits without operands.
pub fn count_star() -> SqlNode {
    call(SqlKind::Count, SqlSyntax::Function, vec![])
}

pub fn count(operand: SqlNode) -> SqlNode {
    call(SqlKind::Count, SqlSyntax::Function, vec![operand])
}

pub fn sum(operand: SqlNode) -> SqlNode {
    call(SqlKind::Sum, SqlSyntax::Function, vec![operand])
}

pub fn avg(operand: SqlNode) -> SqlNode {
    call(SqlKind::Avg, SqlSyntax::Function, vec![operand])
}

pub fn min(operand: SqlNode) -> SqlNode {
    call(SqlKind::Min, SqlSyntax::Function, vec![operand])
}

pub fn max(operand: SqlNode) -> SqlNode {
    call(SqlKind::Max, SqlSyntax::Function, vec![operand])
}
