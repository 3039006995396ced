//! Foreign-key resolution cache
//!
//! Memoizes `(entity, source reference) → internal id` lookups for a fixed TTL.
//! Misses are cached too, so a dangling reference repeated across thousands of
//! records costs one query per TTL window. Expired entries are replaced on the next
//! access; there is no background sweep.
//!
//! Concurrent resolutions of the same uncached key each run their own lookup.

use crate::adapters::database::LookupConnection;
use crate::domain::{Entity, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    id: Option<i32>,
    inserted_at: Instant,
}

/// TTL cache of foreign-key resolutions
///
/// One instance lives for a whole run and is shared by every worker of every
/// entity pipeline, so ids resolved while loading encounters are reused when
/// procedures and observations reference the same patients.
#[derive(Debug)]
pub struct ForeignKeyCache {
    entries: DashMap<(Entity, String), CacheEntry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ForeignKeyCache {
    /// Creates an empty cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the cached outcome if present and fresh
    ///
    /// The outer `Option` is the cache hit; the inner one is the resolved id.
    pub fn get(&self, kind: Entity, reference: &str) -> Option<Option<i32>> {
        let key = (kind, reference.to_string());
        let fresh = self
            .entries
            .get(&key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.id);

        match fresh {
            Some(id) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(id)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Records an outcome, replacing any previous entry for the key
    pub fn insert(&self, kind: Entity, reference: &str, id: Option<i32>) {
        self.entries.insert(
            (kind, reference.to_string()),
            CacheEntry {
                id,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Resolves through the cache, querying `conn` on a miss or an expired entry
    ///
    /// # Errors
    ///
    /// Returns the lookup error unchanged. Failed lookups are not cached.
    pub async fn resolve(
        &self,
        conn: &dyn LookupConnection,
        kind: Entity,
        reference: &str,
    ) -> Result<Option<i32>> {
        if let Some(id) = self.get(kind, reference) {
            return Ok(id);
        }

        let id = conn.lookup_id(kind, reference).await?;
        self.insert(kind, reference, id);
        Ok(id)
    }

    /// Drops the entry for a key; returns whether one existed
    pub fn invalidate(&self, kind: Entity, reference: &str) -> bool {
        self.entries
            .remove(&(kind, reference.to_string()))
            .is_some()
    }

    /// Number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
