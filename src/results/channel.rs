//! Consumer side of a running query.

use serde::Serialize;
use std::{fmt, sync::Arc, thread::JoinHandle};

use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{data_reader::Row, errors::ExecutionFault};

/// What the worker pushes into the channel.
#[derive(Debug)]
pub(crate) enum Delivery {
    Row(Row),
    Fault(ExecutionFault),
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Created,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl QueryStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            QueryStatus::Completed | QueryStatus::Failed | QueryStatus::Cancelled
        )
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryStatus::Created => "created",
            QueryStatus::Running => "running",
            QueryStatus::Completed => "completed",
            QueryStatus::Failed => "failed",
            QueryStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Cursor over the rows of one executing query.
///
/// Holds at most one page of rows ahead of the consumer; the worker blocks
/// once that page is full. The blocking calls (`next_page`, `cancel`) must
/// not be made from inside an async runtime.
///
/// Dropping a channel that is still running cancels it, waiting for the
/// worker the same way [`ResultChannel::cancel`] does.
#[derive(Debug)]
pub struct ResultChannel {
    query_id: Uuid,
    columns: Arc<[String]>,
    rx: mpsc::Receiver<Delivery>,
    token: CancellationToken,
    worker: Option<JoinHandle<()>>,
    status: QueryStatus,
    fault: Option<ExecutionFault>,
}

impl ResultChannel {
    pub(crate) fn new(
        query_id: Uuid,
        columns: Arc<[String]>,
        rx: mpsc::Receiver<Delivery>,
        token: CancellationToken,
        worker: JoinHandle<()>,
    ) -> Self {
        ResultChannel {
            query_id,
            columns,
            rx,
            token,
            worker: Some(worker),
            status: QueryStatus::Created,
            fault: None,
        }
    }

    pub fn query_id(&self) -> Uuid {
        self.query_id
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    /// Fetch up to `max_rows` rows, blocking until they are available.
    ///
    /// Returns `Ok(None)` once the results are exhausted (or the channel was
    /// cancelled). The status turns `Failed` as soon as a fault is seen, but
    /// rows that preceded it are still handed out first; every later call
    /// returns the fault.
    pub fn next_page(&mut self, max_rows: usize) -> Result<Option<Vec<Row>>, ExecutionFault> {
        match self.status {
            QueryStatus::Completed | QueryStatus::Cancelled => return Ok(None),
            QueryStatus::Failed => {
                return Err(self.fault.clone().unwrap_or(ExecutionFault::WorkerLost))
            }
            QueryStatus::Created | QueryStatus::Running => {}
        }

        let max_rows = max_rows.max(1);
        let mut rows = Vec::new();
        while rows.len() < max_rows {
            match self.rx.blocking_recv() {
                Some(Delivery::Row(row)) => rows.push(row),
                Some(Delivery::Exhausted) => {
                    self.finish(QueryStatus::Completed);
                    break;
                }
                Some(Delivery::Fault(fault)) => return self.fault_after(rows, fault),
                None => return self.fault_after(rows, ExecutionFault::WorkerLost),
            }
        }

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows))
        }
    }

    /// Stop the query. Buffered rows are dropped and the worker is joined.
    /// No-op once the channel has reached a terminal status.
    ///
    /// Blocks until the worker exits. A worker inside
    /// [`TraversalCursor::next_batch`](super::TraversalCursor::next_batch)
    /// only sees the cancellation once that call returns, so this waits for
    /// the in-flight batch.
    pub fn cancel(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        log::warn!("[{}] Cancelling query", self.query_id);
        self.token.cancel();
        self.rx.close();
        let mut dropped = 0usize;
        loop {
            match self.rx.try_recv() {
                Ok(_) => dropped += 1,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        log::debug!("[{}] Released {} buffered deliveries", self.query_id, dropped);
        self.finish(QueryStatus::Cancelled);
    }

    pub(crate) fn start(&mut self) {
        if self.status == QueryStatus::Created {
            self.status = QueryStatus::Running;
        }
    }

    fn fault_after(
        &mut self,
        rows: Vec<Row>,
        fault: ExecutionFault,
    ) -> Result<Option<Vec<Row>>, ExecutionFault> {
        self.fail(fault.clone());
        if rows.is_empty() {
            Err(fault)
        } else {
            Ok(Some(rows))
        }
    }

    fn fail(&mut self, fault: ExecutionFault) {
        if !self.status.is_terminal() {
            self.fault = Some(fault);
        }
        self.finish(QueryStatus::Failed);
    }

    /// Move to a terminal status (first one wins) and reap the worker.
    fn finish(&mut self, status: QueryStatus) {
        if self.status.is_terminal() {
            return;
        }
        log::info!("[{}] Query {}", self.query_id, status);
        self.status = status;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("[{}] Worker panicked", self.query_id);
            }
        }
    }
}

impl Drop for ResultChannel {
    fn drop(&mut self) {
        if !self.status.is_terminal() {
            self.cancel();
        }
    }
}
