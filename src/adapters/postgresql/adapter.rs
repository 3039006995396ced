//! PostgreSQL adapter implementing the record store traits

use crate::adapters::database::traits::{BulkInsertResult, LookupConnection, RecordStore};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{
    chunk_sizes, insert_statement, lookup_statement, push_params,
};
use crate::domain::{Entity, FhirflowError, Result, Row, StoreError};
use async_trait::async_trait;
use deadpool_postgres::Object;
use std::fmt::Display;
use std::sync::Arc;

/// PostgreSQL implementation of [`RecordStore`]
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLStore {
    /// Create a new PostgreSQL store
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Create a new PostgreSQL store with an Arc-wrapped client
    pub fn new_with_arc(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

#[async_trait]
impl RecordStore for PostgreSQLStore {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn lease(&self) -> Result<Box<dyn LookupConnection>> {
        let conn = self.client.get_connection().await?;
        conn.batch_execute(&format!(
            "SET statement_timeout = {}",
            self.client.statement_timeout_ms()
        ))
        .await
        .map_err(|e| {
            StoreError::ConnectionFailed(format!("Failed to set statement timeout: {e}"))
        })?;

        Ok(Box::new(PgLookupConnection { conn }))
    }

    async fn bulk_insert(
        &self,
        entity: Entity,
        rows: &[Row],
        dry_run: bool,
    ) -> Result<BulkInsertResult> {
        if rows.is_empty() {
            return Ok(BulkInsertResult::default());
        }

        if let Some(row) = rows.iter().find(|r| r.entity() != entity) {
            return Err(StoreError::RowMismatch {
                expected: entity.table().to_string(),
                found: row.entity().table().to_string(),
            }
            .into());
        }

        if dry_run {
            tracing::info!(
                entity = %entity,
                count = rows.len(),
                "DRY RUN: Would insert {} rows into {}",
                rows.len(),
                entity.table()
            );
            return Ok(BulkInsertResult {
                submitted: rows.len(),
                inserted: 0,
            });
        }

        let mut conn = self.client.get_connection().await?;
        let transaction = conn
            .transaction()
            .await
            .map_err(|e| insert_failed(entity, rows.len(), e))?;

        transaction
            .batch_execute(&format!(
                "SET LOCAL statement_timeout = {}",
                self.client.statement_timeout_ms()
            ))
            .await
            .map_err(|e| insert_failed(entity, rows.len(), e))?;

        let columns = entity.columns().len();
        let mut inserted = 0u64;
        let mut offset = 0;
        for size in chunk_sizes(entity, rows.len()) {
            let chunk = &rows[offset..offset + size];
            offset += size;

            let statement = transaction
                .prepare_cached(&insert_statement(entity, chunk.len()))
                .await
                .map_err(|e| insert_failed(entity, rows.len(), e))?;

            let mut params = Vec::with_capacity(chunk.len() * columns);
            for row in chunk {
                push_params(row, &mut params);
            }

            inserted += transaction
                .execute(&statement, &params)
                .await
                .map_err(|e| insert_failed(entity, rows.len(), e))?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| insert_failed(entity, rows.len(), e))?;

        tracing::debug!(
            entity = %entity,
            submitted = rows.len(),
            inserted = inserted,
            "Committed bulk insert"
        );

        Ok(BulkInsertResult {
            submitted: rows.len(),
            inserted,
        })
    }
}

fn insert_failed(entity: Entity, rows: usize, error: impl Display) -> FhirflowError {
    StoreError::InsertFailed {
        table: entity.table().to_string(),
        rows,
        message: error.to_string(),
    }
    .into()
}

/// A pooled connection held by one worker for reference lookups
pub struct PgLookupConnection {
    conn: Object,
}

#[async_trait]
impl LookupConnection for PgLookupConnection {
    async fn lookup_id(&self, kind: Entity, source_id: &str) -> Result<Option<i32>> {
        let statement = self
            .conn
            .prepare_cached(&lookup_statement(kind))
            .await
            .map_err(|e| StoreError::LookupFailed(format!("{}: {e}", kind.table())))?;

        let row = self
            .conn
            .query_opt(&statement, &[&source_id])
            .await
            .map_err(|e| StoreError::LookupFailed(format!("{} {source_id}: {e}", kind.table())))?;

        match row {
            Some(row) => {
                let id: i32 = row.try_get(0).map_err(|e| {
                    StoreError::LookupFailed(format!("{} {source_id}: {e}", kind.table()))
                })?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }
}
