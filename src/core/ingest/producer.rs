//! Stream producer
//!
//! Moves lines from a [`LineStream`] into the bounded queue. A queue slot is
//! reserved before the item is registered with the drain tracker, so the pending
//! count never includes a line that is still waiting for space; together with one
//! in-flight item per worker this keeps pending work within capacity + workers.

use super::tracker::DrainTracker;
use super::worker::QueueItem;
use crate::adapters::source::LineStream;
use crate::domain::{Entity, FhirflowError, Result};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What the producer did before returning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerOutcome {
    /// Non-empty lines enqueued
    pub items_enqueued: u64,

    /// Whether reading stopped early because of `shutdown`
    pub interrupted: bool,
}

/// Reads `lines` to the end, enqueueing every non-empty line
///
/// `shutdown` is checked before each read: once it fires, no further lines are
/// read and the function returns normally. Lines already read are still enqueued.
/// The sender is dropped on return, closing the queue.
///
/// # Errors
///
/// Returns the first transport error from `lines`, or a pipeline error if every
/// worker has gone away.
pub async fn run_producer(
    entity: Entity,
    mut lines: LineStream,
    tx: mpsc::Sender<QueueItem>,
    tracker: DrainTracker,
    shutdown: CancellationToken,
) -> Result<ProducerOutcome> {
    let mut outcome = ProducerOutcome::default();

    loop {
        let next = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                outcome.interrupted = true;
                tracing::info!(entity = %entity, enqueued = outcome.items_enqueued, "Producer stopped by shutdown");
                break;
            }
            next = lines.next() => next,
        };

        let line = match next {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                tracing::error!(entity = %entity, error = %e, "Source stream failed");
                return Err(e.into());
            }
            None => break,
        };

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let permit = tx.reserve().await.map_err(|_| {
            FhirflowError::Pipeline(format!("{entity} queue closed while producing"))
        })?;
        permit.send(QueueItem {
            line,
            ticket: tracker.add(),
        });
        outcome.items_enqueued += 1;
    }

    tracing::debug!(entity = %entity, enqueued = outcome.items_enqueued, "Producer finished");
    Ok(outcome)
}
