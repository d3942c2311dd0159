//! Streaming execution bridge.
//!
//! [`execute`] starts one named worker thread per compiled query. The worker
//! opens a cursor through the [`TraversalExecutor`], decodes raw results into
//! [`Row`]s and pushes them into a bounded channel holding at most one page.
//! The consumer drains it through [`ResultChannel::next_page`].
//!
//! ```text
//! consumer                         worker "<prefix>-<n>"
//! --------                         ---------------------
//! next_page() <-- Row ... Row <--  open cursor, next_batch(), decode
//!             <-- Exhausted        cursor closed
//!             <-- Fault            cursor closed
//! cancel() ------ token ---------> stops at the next batch boundary
//! ```

pub mod channel;
pub mod data_reader;
pub mod errors;
pub mod executor;
mod worker;

pub use channel::{QueryStatus, ResultChannel};
pub use data_reader::{Row, RowDecoder, SqlValue};
pub use errors::ExecutionFault;
pub use executor::{RawResult, TraversalCursor, TraversalExecutor};

use serde::{Deserialize, Serialize};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::select_compiler::CompiledQuery;
use worker::Worker;

static WORKER_COUNTER: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Rows buffered ahead of the consumer.
    pub page_size: usize,
    /// Results pulled from the cursor per call.
    pub fetch_batch_size: usize,
    pub worker_name_prefix: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            page_size: 1000,
            fetch_batch_size: 100,
            worker_name_prefix: "Data-Insert-Thread".to_string(),
        }
    }
}

/// Start executing `compiled` and return the channel its rows arrive on.
pub fn execute(
    compiled: &CompiledQuery,
    executor: Arc<dyn TraversalExecutor>,
    config: &BridgeConfig,
) -> Result<ResultChannel, ExecutionFault> {
    let query_id = Uuid::new_v4();
    let columns: Arc<[String]> = compiled.column_names().into();
    let decoder = RowDecoder::new(
        columns.clone(),
        compiled.columns().iter().map(|c| c.ty).collect(),
    );

    let (tx, rx) = mpsc::channel(config.page_size.max(1));
    let token = CancellationToken::new();
    let worker = Worker {
        query_id,
        traversal: compiled.traversal().clone(),
        executor,
        decoder,
        tx,
        token: token.clone(),
        fetch_batch_size: config.fetch_batch_size.max(1),
    };

    let n = WORKER_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    let name = format!("{}-{}", config.worker_name_prefix, n);
    log::info!("[{}] Executing on {}: {}", query_id, name, compiled.traversal());
    let handle = thread::Builder::new()
        .name(name)
        .spawn(move || worker.run())
        .map_err(|e| ExecutionFault::WorkerSpawn(e.to_string()))?;

    let mut channel = ResultChannel::new(query_id, columns, rx, token, handle);
    channel.start();
    Ok(channel)
}
