//! Traversal IR.
//!
//! A [`Traversal`] is an append-only pipeline of Gremlin [`Step`]s. Root
//! traversals render as `g.V()...`, anonymous ones (used inside `by`,
//! `where`, `union`, ...) as `__.unfold()...`.
//!
//! Emission code never writes to a `Traversal` directly; it writes to a
//! [`TraversalSink`]. The compiler's alias discovery phase hands emission a
//! [`DiscardSink`], which makes it impossible for that phase to leak steps
//! into the traversal that is eventually executed.

mod step;

pub use step::{ByModulator, Compare, GremlinValue, Order, Predicate, Step};

use serde::Serialize;
use std::fmt;

/// Anything emission code can append steps to.
pub trait TraversalSink {
    /// Whether appended steps are kept. Side effects that must happen only
    /// once per compile (recording output columns) key off this.
    const RETAINS: bool;

    fn append(&mut self, step: Step);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Spawned from the graph traversal source `g`.
    Root,
    /// Anonymous child traversal `__`.
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Traversal {
    origin: Origin,
    steps: Vec<Step>,
}

impl Traversal {
    /// `g.V()`
    pub fn vertices() -> Self {
        Traversal {
            origin: Origin::Root,
            steps: vec![Step::V],
        }
    }

    /// `g.E()`
    pub fn edges() -> Self {
        Traversal {
            origin: Origin::Root,
            steps: vec![Step::E],
        }
    }

    /// `__`
    pub fn anonymous() -> Self {
        Traversal {
            origin: Origin::Anonymous,
            steps: Vec::new(),
        }
    }

    /// Anonymous traversal starting with the given steps.
    pub fn of(steps: impl IntoIterator<Item = Step>) -> Self {
        Traversal {
            origin: Origin::Anonymous,
            steps: steps.into_iter().collect(),
        }
    }

    /// Builder-style append.
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Gremlin-Groovy script for this traversal.
    pub fn to_groovy(&self) -> String {
        self.to_string()
    }
}

impl TraversalSink for Traversal {
    const RETAINS: bool = true;

    fn append(&mut self, step: Step) {
        self.steps.push(step);
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.origin {
            Origin::Root => "g",
            Origin::Anonymous => "__",
        };
        if self.steps.is_empty() {
            return write!(f, "{}.identity()", prefix);
        }
        write!(f, "{}", prefix)?;
        for step in &self.steps {
            write!(f, ".{}", step)?;
        }
        Ok(())
    }
}

/// Sink that drops every step it is given.
#[derive(Debug, Default)]
pub struct DiscardSink {
    discarded: usize,
}

impl DiscardSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps dropped so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl TraversalSink for DiscardSink {
    const RETAINS: bool = false;

    fn append(&mut self, _step: Step) {
        self.discarded += 1;
    }
}
