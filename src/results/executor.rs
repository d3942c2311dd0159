//! Seam to the graph-traversal engine.
//!
//! The bridge only needs two things from an engine: a way to start a
//! traversal, and a cursor to pull raw results from it in batches.

use serde_json::Value;

use super::errors::ExecutionFault;
use crate::traversal::Traversal;

/// One raw traversal result: a JSON object keyed by projected column name.
pub type RawResult = Value;

/// A running traversal.
pub trait TraversalCursor: Send {
    /// Pull up to `max` results. An empty batch means the traversal is
    /// exhausted.
    fn next_batch(&mut self, max: usize) -> Result<Vec<RawResult>, ExecutionFault>;

    /// Release the underlying traversal. Called exactly once.
    fn close(&mut self);
}

#[cfg_attr(test, mockall::automock)]
pub trait TraversalExecutor: Send + Sync {
    fn open(&self, traversal: &Traversal) -> Result<Box<dyn TraversalCursor>, ExecutionFault>;
}

/// Owns a cursor for the worker's lifetime and closes it on drop, whichever
/// way the worker exits.
pub(crate) struct CursorGuard {
    cursor: Box<dyn TraversalCursor>,
}

impl CursorGuard {
    pub(crate) fn new(cursor: Box<dyn TraversalCursor>) -> Self {
        CursorGuard { cursor }
    }

    pub(crate) fn next_batch(&mut self, max: usize) -> Result<Vec<RawResult>, ExecutionFault> {
        self.cursor.next_batch(max)
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        log::debug!("Closing traversal cursor");
        self.cursor.close();
    }
}
