//! Gremlin step vocabulary used by the compiler.

use serde::Serialize;
use std::fmt;

use super::Traversal;
use crate::sql_ast::SqlLiteral;

/// Sort direction carried by an `order().by(..)` modulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => write!(f, "asc"),
            Order::Desc => write!(f, "desc"),
        }
    }
}

/// Comparison part of a `P` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compare {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Compare {
    /// The comparison seen from the other operand: `5 < x` is `x > 5`.
    pub fn flipped(self) -> Self {
        match self {
            Compare::Eq => Compare::Eq,
            Compare::Neq => Compare::Neq,
            Compare::Lt => Compare::Gt,
            Compare::Lte => Compare::Gte,
            Compare::Gt => Compare::Lt,
            Compare::Gte => Compare::Lte,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Compare::Eq => "eq",
            Compare::Neq => "neq",
            Compare::Lt => "lt",
            Compare::Lte => "lte",
            Compare::Gt => "gt",
            Compare::Gte => "gte",
        }
    }
}

/// Constant value embedded in a traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GremlinValue {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
}

impl From<&SqlLiteral> for GremlinValue {
    fn from(literal: &SqlLiteral) -> Self {
        match literal {
            SqlLiteral::Null => GremlinValue::Null,
            SqlLiteral::Boolean(b) => GremlinValue::Bool(*b),
            SqlLiteral::Integer(i) => GremlinValue::Long(*i),
            SqlLiteral::Decimal(d) => GremlinValue::Double(*d),
            SqlLiteral::String(s) => GremlinValue::String(s.clone()),
        }
    }
}

impl fmt::Display for GremlinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GremlinValue::Null => write!(f, "null"),
            GremlinValue::Bool(b) => write!(f, "{}", b),
            GremlinValue::Long(i) => write!(f, "{}L", i),
            GremlinValue::Double(d) => write!(f, "{:?}d", d),
            GremlinValue::String(s) => write!(f, "{}", quote(s)),
        }
    }
}

/// `P.<compare>(<value>)`, rendered as `gt(30L)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub compare: Compare,
    pub value: GremlinValue,
}

impl Predicate {
    pub fn new(compare: Compare, value: GremlinValue) -> Self {
        Predicate { compare, value }
    }

    pub fn eq(value: GremlinValue) -> Self {
        Predicate::new(Compare::Eq, value)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.compare.as_str(), self.value)
    }
}

/// `by(<traversal>[, <order>])` modulator for `group()` and `order()`
/// and `project()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByModulator {
    pub traversal: Traversal,
    pub order: Option<Order>,
}

impl ByModulator {
    pub fn new(traversal: Traversal) -> Self {
        ByModulator {
            traversal,
            order: None,
        }
    }

    pub fn ordered(traversal: Traversal, order: Order) -> Self {
        ByModulator {
            traversal,
            order: Some(order),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", content = "args", rename_all = "snake_case")]
pub enum Step {
    /// Source: all vertices.
    V,
    /// Source: all edges.
    E,
    HasLabel(String),
    Group,
    By(ByModulator),
    Unfold,
    Fold,
    /// `select(values)` on map entries.
    SelectValues,
    Order,
    Where(Traversal),
    Values(String),
    Id,
    InV,
    OutV,
    Union(Vec<Traversal>),
    And(Vec<Traversal>),
    Or(Vec<Traversal>),
    Is(Predicate),
    Project(Vec<String>),
    Coalesce(Vec<Traversal>),
    Constant(GremlinValue),
    Count,
    Sum,
    Mean,
    Min,
    Max,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::V => write!(f, "V()"),
            Step::E => write!(f, "E()"),
            Step::HasLabel(label) => write!(f, "hasLabel({})", quote(label)),
            Step::Group => write!(f, "group()"),
            Step::By(by) => match by.order {
                Some(order) => write!(f, "by({}, {})", by.traversal, order),
                None => write!(f, "by({})", by.traversal),
            },
            Step::Unfold => write!(f, "unfold()"),
            Step::Fold => write!(f, "fold()"),
            Step::SelectValues => write!(f, "select(values)"),
            Step::Order => write!(f, "order()"),
            Step::Where(t) => write!(f, "where({})", t),
            Step::Values(key) => write!(f, "values({})", quote(key)),
            Step::Id => write!(f, "id()"),
            Step::InV => write!(f, "inV()"),
            Step::OutV => write!(f, "outV()"),
            Step::Union(branches) => write!(f, "union({})", join(branches)),
            Step::And(branches) => write!(f, "and({})", join(branches)),
            Step::Or(branches) => write!(f, "or({})", join(branches)),
            Step::Is(p) => write!(f, "is({})", p),
            Step::Project(keys) => {
                let keys: Vec<String> = keys.iter().map(|k| quote(k)).collect();
                write!(f, "project({})", keys.join(", "))
            }
            Step::Coalesce(branches) => write!(f, "coalesce({})", join(branches)),
            Step::Constant(v) => write!(f, "constant({})", v),
            Step::Count => write!(f, "count()"),
            Step::Sum => write!(f, "sum()"),
            Step::Mean => write!(f, "mean()"),
            Step::Min => write!(f, "min()"),
            Step::Max => write!(f, "max()"),
        }
    }
}

fn join(traversals: &[Traversal]) -> String {
    traversals
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single-quoted Groovy string literal.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
