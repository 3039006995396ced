//! Batch accumulation and flushing
//!
//! Workers append validated rows to an in-memory buffer; a background loop and the
//! orchestrator's terminal call flush it to the store in bulk.

use crate::adapters::database::RecordStore;
use crate::domain::{Entity, Result, Row};
use parking_lot::Mutex;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Row buffer for one entity
///
/// `append` only takes a short lock and never waits on I/O. `flush` swaps the whole
/// buffer out under the same lock, so a row lands either in the batch being written
/// or in the next one, never in both and never in neither.
pub struct BatchAccumulator {
    entity: Entity,
    store: Arc<dyn RecordStore>,
    dry_run: bool,
    buffer: Mutex<Vec<Row>>,
    flush_lock: tokio::sync::Mutex<()>,
    rows_submitted: AtomicU64,
    rows_inserted: AtomicU64,
    flushes: AtomicU64,
}

impl BatchAccumulator {
    pub fn new(entity: Entity, store: Arc<dyn RecordStore>, dry_run: bool) -> Self {
        Self {
            entity,
            store,
            dry_run,
            buffer: Mutex::new(Vec::new()),
            flush_lock: tokio::sync::Mutex::new(()),
            rows_submitted: AtomicU64::new(0),
            rows_inserted: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Appends rows to the current batch
    pub fn append(&self, rows: impl IntoIterator<Item = Row>) {
        self.buffer.lock().extend(rows);
    }

    /// Rows waiting for the next flush
    pub fn buffered(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Writes out everything buffered so far
    ///
    /// Returns the number of rows the store reported as inserted. An empty buffer
    /// is a no-op. Flushes are serialized so their counters and log lines stay in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns the store error; the swapped-out rows are not retried.
    pub async fn flush(&self) -> Result<u64> {
        let _serial = self.flush_lock.lock().await;

        let batch = mem::take(&mut *self.buffer.lock());
        if batch.is_empty() {
            return Ok(0);
        }

        let result = self
            .store
            .bulk_insert(self.entity, &batch, self.dry_run)
            .await?;

        self.flushes.fetch_add(1, Ordering::Relaxed);
        let submitted = self
            .rows_submitted
            .fetch_add(result.submitted as u64, Ordering::Relaxed)
            + result.submitted as u64;
        let inserted = self
            .rows_inserted
            .fetch_add(result.inserted, Ordering::Relaxed)
            + result.inserted;

        tracing::debug!(
            entity = %self.entity,
            batch_rows = result.submitted,
            batch_inserted = result.inserted,
            total_submitted = submitted,
            total_inserted = inserted,
            "Flushed batch"
        );

        Ok(result.inserted)
    }

    /// Total rows handed to the store
    pub fn rows_submitted(&self) -> u64 {
        self.rows_submitted.load(Ordering::Relaxed)
    }

    /// Total rows the store reported as written
    pub fn rows_inserted(&self) -> u64 {
        self.rows_inserted.load(Ordering::Relaxed)
    }

    /// Number of non-empty flushes
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }
}

/// Flushes `accumulator` every `interval` until `cancel` fires
///
/// Cancellation is only observed between ticks, so a flush in progress always
/// completes. Returns the first flush error.
pub async fn run_flush_loop(
    accumulator: Arc<BatchAccumulator>,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(entity = %accumulator.entity(), "Flush loop stopped");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        if let Err(e) = accumulator.flush().await {
            tracing::error!(entity = %accumulator.entity(), error = %e, "Background flush failed");
            return Err(e);
        }
    }
}
