//! Record store factory
//!
//! This module provides the factory function that creates the record store from
//! configuration.

use crate::adapters::database::traits::RecordStore;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLStore};
use crate::config::schema::FhirflowConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the record store for the configuration
///
/// Builds the PostgreSQL pool and opens `min_connections` connections, so an
/// unreachable database is reported before any source is read.
///
/// # Arguments
///
/// * `config` - The Fhirflow configuration
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements RecordStore
///
/// # Errors
///
/// Returns an error if the pool cannot be created or the warm-up fails
pub async fn create_record_store(config: &FhirflowConfig) -> Result<Arc<dyn RecordStore>> {
    tracing::info!(
        max_connections = config.postgresql.max_connections,
        "Creating PostgreSQL record store"
    );

    let client = PostgreSQLClient::new(config.postgresql.clone()).await?;
    client.warm_up().await?;

    Ok(Arc::new(PostgreSQLStore::new(client)) as Arc<dyn RecordStore>)
}
