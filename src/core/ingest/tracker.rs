//! Drain tracking
//!
//! Counts items that have been enqueued but not yet finished. This count, not the
//! emptiness of the queue, decides when an entity's work is complete: an item a
//! worker has just dequeued is no longer in the queue but is still pending here.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicUsize,
    peak: AtomicUsize,
    completed: AtomicUsize,
    drained: Notify,
}

/// Counting join over pending work items
#[derive(Debug, Clone, Default)]
pub struct DrainTracker {
    inner: Arc<Inner>,
}

impl DrainTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one item and returns its ticket
    ///
    /// The item counts as pending until the ticket is dropped.
    pub fn add(&self) -> WorkTicket {
        let pending = self.inner.pending.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(pending, Ordering::SeqCst);
        WorkTicket {
            tracker: self.clone(),
        }
    }

    fn done(&self) {
        self.inner.completed.fetch_add(1, Ordering::SeqCst);
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.drained.notify_waiters();
        }
    }

    /// Items registered and not yet finished
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Highest pending count observed
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    /// Items finished so far
    pub fn completed(&self) -> usize {
        self.inner.completed.load(Ordering::SeqCst)
    }

    /// Waits until no item is pending
    ///
    /// Returns immediately if nothing is pending.
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.inner.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Marks one item done when dropped
///
/// Travels with the item through the queue, so an item dropped anywhere (processed,
/// rejected, or discarded with a closed channel) is counted exactly once.
#[derive(Debug)]
#[must_use = "dropping a ticket marks its item done"]
pub struct WorkTicket {
    tracker: DrainTracker,
}

impl Drop for WorkTicket {
    fn drop(&mut self) {
        self.tracker.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_immediately_when_idle() {
        let tracker = DrainTracker::new();
        tokio::time::timeout(Duration::from_millis(100), tracker.wait_drained())
            .await
            .expect("idle tracker should not block");
    }

    #[tokio::test]
    async fn test_tickets_count_once() {
        let tracker = DrainTracker::new();
        let a = tracker.add();
        let b = tracker.add();
        assert_eq!(tracker.pending(), 2);

        drop(a);
        assert_eq!(tracker.pending(), 1);
        drop(b);
        assert_eq!(tracker.pending(), 0);
        assert_eq!(tracker.completed(), 2);
        assert_eq!(tracker.peak(), 2);
    }

    #[tokio::test]
    async fn test_wait_blocks_until_last_ticket_drops() {
        let tracker = DrainTracker::new();
        let tickets: Vec<_> = (0..5).map(|_| tracker.add()).collect();

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_drained().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        for ticket in tickets {
            tokio::time::sleep(Duration::from_millis(5)).await;
            drop(ticket);
        }

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish once drained")
            .unwrap();
    }

    #[tokio::test]
    async fn test_peak_tracks_high_water_mark() {
        let tracker = DrainTracker::new();
        {
            let _a = tracker.add();
            let _b = tracker.add();
            let _c = tracker.add();
        }
        let _d = tracker.add();
        assert_eq!(tracker.peak(), 3);
        assert_eq!(tracker.pending(), 1);
    }
}
