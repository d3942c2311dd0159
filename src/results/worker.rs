//! The per-query worker thread.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{
    channel::Delivery,
    data_reader::RowDecoder,
    errors::ExecutionFault,
    executor::{CursorGuard, TraversalExecutor},
};
use crate::traversal::Traversal;

enum Flow {
    /// The cursor ran dry.
    Exhausted,
    /// Cancelled, or the consumer went away.
    Stopped,
}

pub(super) struct Worker {
    pub query_id: Uuid,
    pub traversal: Traversal,
    pub executor: Arc<dyn TraversalExecutor>,
    pub decoder: RowDecoder,
    pub tx: mpsc::Sender<Delivery>,
    pub token: CancellationToken,
    pub fetch_batch_size: usize,
}

impl Worker {
    pub fn run(self) {
        log::info!("[{}] Worker started", self.query_id);
        let terminal = match self.pump() {
            Ok(Flow::Exhausted) => Some(Delivery::Exhausted),
            Ok(Flow::Stopped) => None,
            Err(fault) => {
                log::warn!("[{}] Query failed: {}", self.query_id, fault);
                Some(Delivery::Fault(fault))
            }
        };
        if let Some(delivery) = terminal {
            if self.tx.blocking_send(delivery).is_err() {
                log::debug!("[{}] Consumer gone before terminal marker", self.query_id);
            }
        }
        log::info!("[{}] Worker finished", self.query_id);
    }

    fn pump(&self) -> Result<Flow, ExecutionFault> {
        let cursor = self.executor.open(&self.traversal)?;
        let mut cursor = CursorGuard::new(cursor);
        let mut delivered = 0usize;

        loop {
            if self.token.is_cancelled() {
                log::info!("[{}] Cancelled after {} rows", self.query_id, delivered);
                return Ok(Flow::Stopped);
            }
            let batch = cursor.next_batch(self.fetch_batch_size)?;
            if batch.is_empty() {
                log::debug!("[{}] Exhausted after {} rows", self.query_id, delivered);
                return Ok(Flow::Exhausted);
            }
            for raw in &batch {
                let row = self.decoder.decode(raw)?;
                // Blocks while the channel holds a full page.
                if self.tx.blocking_send(Delivery::Row(row)).is_err() {
                    log::info!("[{}] Channel closed after {} rows", self.query_id, delivered);
                    return Ok(Flow::Stopped);
                }
                delivered += 1;
            }
        }
    }
}
