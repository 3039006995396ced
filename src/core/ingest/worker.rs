//! Queue workers
//!
//! Each worker owns one leased store connection for its lifetime, pulls raw lines
//! from the shared queue, transforms them and appends the resulting rows to the
//! accumulator.

use super::accumulator::BatchAccumulator;
use super::tracker::WorkTicket;
use crate::adapters::database::LookupConnection;
use crate::core::cache::ForeignKeyCache;
use crate::core::transform::{self, ReferenceResolver};
use crate::domain::{Entity, Rejection, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// A raw line on its way to a worker, with the ticket that marks it done
#[derive(Debug)]
pub struct QueueItem {
    pub line: Vec<u8>,
    pub ticket: WorkTicket,
}

/// Receiving end of the queue, shared by every worker of one pipeline
pub type SharedReceiver = Arc<Mutex<mpsc::Receiver<QueueItem>>>;

/// Per-pipeline record counters, shared by all workers
#[derive(Debug, Default)]
pub struct WorkerCounters {
    accepted: AtomicU64,
    rejected: AtomicU64,
    rows: AtomicU64,
}

impl WorkerCounters {
    /// Records that produced at least one row
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Records that produced no rows
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Rows handed to the accumulator
    pub fn rows_produced(&self) -> u64 {
        self.rows.load(Ordering::Relaxed)
    }
}

/// Resolves references through the shared cache on the worker's own connection
struct CachedResolver<'a> {
    cache: &'a ForeignKeyCache,
    conn: &'a dyn LookupConnection,
}

#[async_trait]
impl ReferenceResolver for CachedResolver<'_> {
    async fn resolve(&self, kind: Entity, reference: &str) -> Result<Option<i32>> {
        self.cache.resolve(self.conn, kind, reference).await
    }
}

/// One consumer of the queue
pub struct Worker {
    id: usize,
    entity: Entity,
    queue: SharedReceiver,
    conn: Box<dyn LookupConnection>,
    cache: Arc<ForeignKeyCache>,
    accumulator: Arc<BatchAccumulator>,
    counters: Arc<WorkerCounters>,
}

impl Worker {
    pub fn new(
        id: usize,
        entity: Entity,
        queue: SharedReceiver,
        conn: Box<dyn LookupConnection>,
        cache: Arc<ForeignKeyCache>,
        accumulator: Arc<BatchAccumulator>,
        counters: Arc<WorkerCounters>,
    ) -> Self {
        Self {
            id,
            entity,
            queue,
            conn,
            cache,
            accumulator,
            counters,
        }
    }

    /// Processes items until `cancel` fires or the queue is closed and empty
    ///
    /// Cancellation is only observed while waiting for the next item; an item that
    /// has been dequeued is always finished.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::debug!(entity = %self.entity, worker = self.id, "Worker started");

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                item = async { self.queue.lock().await.recv().await } => item,
            };

            match next {
                Some(item) => self.process(item).await,
                None => break,
            }
        }

        tracing::debug!(entity = %self.entity, worker = self.id, "Worker stopped");
    }

    async fn process(&self, item: QueueItem) {
        let resolver = CachedResolver {
            cache: &self.cache,
            conn: self.conn.as_ref(),
        };

        match transform::transform(self.entity, &item.line, &resolver).await {
            Ok(rows) => {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                self.counters
                    .rows
                    .fetch_add(rows.len() as u64, Ordering::Relaxed);
                self.accumulator.append(rows);
            }
            Err(rejection) => {
                self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                match &rejection {
                    Rejection::LookupFailed { .. } => tracing::warn!(
                        entity = %self.entity,
                        worker = self.id,
                        reason = %rejection,
                        "Record rejected"
                    ),
                    _ => tracing::debug!(
                        entity = %self.entity,
                        worker = self.id,
                        reason = %rejection,
                        "Record rejected"
                    ),
                }
            }
        }

        // Rows are in the accumulator before the item counts as done
        drop(item);
    }
}
