//! Record store abstraction
//!
//! This module defines the traits a persistent store must implement to receive
//! validated rows and answer foreign-key lookups.

use crate::domain::{Entity, Result, Row};
use async_trait::async_trait;

/// Outcome of one bulk insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkInsertResult {
    /// Rows handed to the store
    pub submitted: usize,

    /// Rows the store reports as written (duplicates are skipped, not failed)
    pub inserted: u64,
}

/// A connection leased from the store for point lookups
///
/// Each worker holds one of these for its whole lifetime.
#[async_trait]
pub trait LookupConnection: Send + Sync {
    /// Finds the internal id of the `kind` row whose `source_id` matches
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup query fails.
    async fn lookup_id(&self, kind: Entity, source_id: &str) -> Result<Option<i32>>;
}

/// Persistent store for validated rows
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn test_connection(&self) -> Result<()>;

    /// Lease a connection for lookups, held until the returned value is dropped
    ///
    /// # Errors
    ///
    /// Returns an error if no connection becomes available in time.
    async fn lease(&self) -> Result<Box<dyn LookupConnection>>;

    /// Insert a batch of rows for one entity in a single transaction
    ///
    /// # Arguments
    ///
    /// * `entity` - Target entity; every row must belong to it
    /// * `rows` - Rows to insert, in order
    /// * `dry_run` - If true, count the rows but skip the write
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; nothing from the batch is kept.
    async fn bulk_insert(
        &self,
        entity: Entity,
        rows: &[Row],
        dry_run: bool,
    ) -> Result<BulkInsertResult>;
}
