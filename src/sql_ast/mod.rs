//! Validated SQL select tree, as handed over by the parser layer.
//!
//! The parser and validator live outside this crate. What arrives here is a
//! read-only tree of typed nodes: identifiers, literals and operator calls,
//! hung off a [`SqlSelect`]. The validator has already applied the implicit
//! table alias, so `FROM person` arrives as `person AS person`.
//!
//! The tree is serde-(de)serializable so that callers (and the CLI) can hand
//! it across process boundaries as JSON:
//!
//! ```json
//! {
//!   "select_list": [{ "node": "identifier", "names": ["p", "name"] }],
//!   "from": { "node": "call",
//!             "operator": { "kind": "as", "syntax": "special" },
//!             "operands": [{ "node": "identifier", "names": ["person"] },
//!                          { "node": "identifier", "names": ["p"] }] }
//! }
//! ```

pub mod builders;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the validated SQL tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum SqlNode {
    Identifier(SqlIdentifier),
    Literal(SqlLiteral),
    Call(SqlBasicCall),
}

impl fmt::Display for SqlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlNode::Identifier(id) => write!(f, "{}", id),
            SqlNode::Literal(lit) => write!(f, "{}", lit),
            SqlNode::Call(call) => write!(f, "{}", call),
        }
    }
}

/// A possibly qualified name, e.g. `p.name` is `["p", "name"]`.
///
/// A trailing `*` component denotes a star reference (`*` or `p.*`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlIdentifier {
    pub names: Vec<String>,
}

impl SqlIdentifier {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SqlIdentifier {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Last component of the name: the column (or table) being referenced.
    pub fn simple_name(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or("")
    }

    /// Component right before the simple name, if any.
    pub fn qualifier(&self) -> Option<&str> {
        if self.names.len() < 2 {
            return None;
        }
        self.names.get(self.names.len() - 2).map(String::as_str)
    }

    pub fn is_star(&self) -> bool {
        self.simple_name() == "*"
    }
}

impl fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SqlLiteral {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
}

impl fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlLiteral::Null => write!(f, "NULL"),
            SqlLiteral::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            SqlLiteral::Integer(i) => write!(f, "{}", i),
            SqlLiteral::Decimal(d) => write!(f, "{}", d),
            SqlLiteral::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

/// An operator applied to an ordered operand list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlBasicCall {
    pub operator: SqlOperator,
    #[serde(default)]
    pub operands: Vec<SqlNode>,
}

impl fmt::Display for SqlBasicCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = &self.operator.kind;
        match (self.operator.syntax, self.operands.as_slice()) {
            (SqlSyntax::Binary, [l, r]) | (SqlSyntax::Special, [l, r]) => {
                write!(f, "{} {} {}", l, kind, r)
            }
            (SqlSyntax::Prefix, [operand]) => write!(f, "{} {}", kind, operand),
            (SqlSyntax::Postfix, [operand]) => write!(f, "{} {}", operand, kind),
            (_, []) => write!(f, "{}(*)", kind),
            (_, operands) => {
                let args: Vec<String> = operands.iter().map(|o| o.to_string()).collect();
                write!(f, "{}({})", kind, args.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlOperator {
    pub kind: SqlKind,
    pub syntax: SqlSyntax,
}

impl SqlOperator {
    pub fn new(kind: SqlKind, syntax: SqlSyntax) -> Self {
        SqlOperator { kind, syntax }
    }
}

/// How an operator is written relative to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlSyntax {
    Binary,
    Prefix,
    Postfix,
    Function,
    Special,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlKind {
    As,
    And,
    Or,
    Not,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Descending,
    NullsFirst,
    NullsLast,
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Plus,
    Minus,
    Times,
    Divide,
    Like,
    IsNull,
    IsNotNull,
    /// Anything the validator produced that has no dedicated kind here.
    Other(String),
}

impl fmt::Display for SqlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlKind::As => "AS",
            SqlKind::And => "AND",
            SqlKind::Or => "OR",
            SqlKind::Not => "NOT",
            SqlKind::Equals => "=",
            SqlKind::NotEquals => "<>",
            SqlKind::LessThan => "<",
            SqlKind::LessThanOrEqual => "<=",
            SqlKind::GreaterThan => ">",
            SqlKind::GreaterThanOrEqual => ">=",
            SqlKind::Descending => "DESC",
            SqlKind::NullsFirst => "NULLS FIRST",
            SqlKind::NullsLast => "NULLS LAST",
            SqlKind::Count => "COUNT",
            SqlKind::Sum => "SUM",
            SqlKind::Avg => "AVG",
            SqlKind::Min => "MIN",
            SqlKind::Max => "MAX",
            SqlKind::Plus => "+",
            SqlKind::Minus => "-",
            SqlKind::Times => "*",
            SqlKind::Divide => "/",
            SqlKind::Like => "LIKE",
            SqlKind::IsNull => "IS NULL",
            SqlKind::IsNotNull => "IS NOT NULL",
            SqlKind::Other(name) => name.as_str(),
        };
        write!(f, "{}", name)
    }
}

/// A single-level SELECT statement.
///
/// Everything but the select list and FROM is optional; the compiler
/// rejects a missing FROM or an empty select list itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SqlSelect {
    #[serde(default)]
    pub select_list: Vec<SqlNode>,
    #[serde(default)]
    pub from: Option<SqlNode>,
    #[serde(default, rename = "where")]
    pub where_clause: Option<SqlNode>,
    #[serde(default)]
    pub group_by: Option<Vec<SqlNode>>,
    #[serde(default)]
    pub having: Option<SqlNode>,
    #[serde(default)]
    pub order_by: Option<Vec<SqlNode>>,
}

impl SqlSelect {
    pub fn new(select_list: Vec<SqlNode>) -> Self {
        SqlSelect {
            select_list,
            ..Default::default()
        }
    }

    /// `FROM <table> AS <table>`, the shape the validator gives an unaliased table.
    pub fn from_table(self, table: &str) -> Self {
        self.from_aliased(table, table)
    }

    /// `FROM <table> AS <alias>`.
    pub fn from_aliased(mut self, table: &str, alias: &str) -> Self {
        self.from = Some(builders::alias(builders::ident(table), alias));
        self
    }

    pub fn filter(mut self, predicate: SqlNode) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    pub fn group_by(mut self, keys: Vec<SqlNode>) -> Self {
        self.group_by = Some(keys);
        self
    }

    pub fn having(mut self, predicate: SqlNode) -> Self {
        self.having = Some(predicate);
        self
    }

    pub fn order_by(mut self, keys: Vec<SqlNode>) -> Self {
        self.order_by = Some(keys);
        self
    }
}
