//! Ingest reports
//!
//! Per-entity counters and the run-level summary built from them.

use crate::domain::Entity;
use serde::Serialize;
use std::time::Duration;

/// Counters for one entity pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityReport {
    pub entity: Option<Entity>,

    /// Non-empty lines read from the source and enqueued
    pub items_seen: u64,

    /// Records that produced at least one row
    pub records_accepted: u64,

    /// Records dropped by validation or reference resolution
    pub records_rejected: u64,

    /// Rows produced by the transformer
    pub rows_produced: u64,

    /// Rows handed to the store
    pub rows_submitted: u64,

    /// Rows the store reported as written
    pub rows_inserted: u64,

    /// Highest number of queued plus in-flight items
    pub peak_in_flight: usize,

    /// Foreign-key cache hits and misses
    pub cache_hits: u64,
    pub cache_misses: u64,

    /// Whether a shutdown stopped the source early
    pub interrupted: bool,

    #[serde(with = "duration_ms")]
    pub duration: Duration,
}

impl EntityReport {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity: Some(entity),
            ..Self::default()
        }
    }

    /// Rows submitted but not written, typically duplicates of existing rows
    pub fn rows_skipped(&self) -> u64 {
        self.rows_submitted.saturating_sub(self.rows_inserted)
    }

    /// Log the report
    pub fn log(&self) {
        tracing::info!(
            entity = %self.entity.map(|e| e.table()).unwrap_or("unknown"),
            items_seen = self.items_seen,
            accepted = self.records_accepted,
            rejected = self.records_rejected,
            rows_produced = self.rows_produced,
            rows_submitted = self.rows_submitted,
            rows_inserted = self.rows_inserted,
            rows_skipped = self.rows_skipped(),
            peak_in_flight = self.peak_in_flight,
            cache_hits = self.cache_hits,
            cache_misses = self.cache_misses,
            interrupted = self.interrupted,
            duration_ms = self.duration.as_millis() as u64,
            "Entity ingest completed"
        );
    }
}

/// An entity pipeline that aborted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityFailure {
    pub entity: Entity,
    pub message: String,
}

/// Outcome of a whole run across entities
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestSummary {
    /// Entities that ran to completion, in order
    pub reports: Vec<EntityReport>,

    /// Entities whose pipeline aborted
    pub failures: Vec<EntityFailure>,

    /// Entities not started because of a shutdown
    pub skipped: Vec<Entity>,

    /// Whether a shutdown cut the run short
    pub interrupted: bool,

    #[serde(with = "duration_ms")]
    pub duration: Duration,
}

impl IngestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// No entity failed and nothing was skipped
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty() && !self.interrupted
    }

    pub fn report(&self, entity: Entity) -> Option<&EntityReport> {
        self.reports.iter().find(|r| r.entity == Some(entity))
    }

    pub fn total_rows_inserted(&self) -> u64 {
        self.reports.iter().map(|r| r.rows_inserted).sum()
    }

    pub fn total_items_seen(&self) -> u64 {
        self.reports.iter().map(|r| r.items_seen).sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            entities_completed = self.reports.len(),
            entities_failed = self.failures.len(),
            entities_skipped = self.skipped.len(),
            items_seen = self.total_items_seen(),
            rows_inserted = self.total_rows_inserted(),
            interrupted = self.interrupted,
            duration_secs = self.duration.as_secs(),
            "Ingest completed"
        );

        for failure in &self.failures {
            tracing::warn!(
                entity = %failure.entity,
                message = %failure.message,
                "Entity ingest failed"
            );
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
