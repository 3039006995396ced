//! Ingest command implementation
//!
//! This module implements the `ingest` command, which streams the configured FHIR
//! exports into PostgreSQL.

use crate::adapters::database::create_record_store;
use crate::adapters::source::HttpSource;
use crate::config::{load_config, redact_connection_string};
use crate::core::ingest::{IngestCoordinator, IngestSummary};
use crate::domain::Entity;
use clap::Args;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Ingest a single entity (patients, encounters, procedures, observations)
    #[arg(long)]
    pub entity: Option<Entity>,

    /// Dry run mode - transform and count rows without writing them
    #[arg(long)]
    pub dry_run: bool,
}

impl IngestArgs {
    /// Entities to run, in dependency order
    pub fn entities(&self) -> Vec<Entity> {
        match self.entity {
            Some(entity) => vec![entity],
            None => Entity::INGEST_ORDER.to_vec(),
        }
    }

    /// Execute the ingest command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown: CancellationToken,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting ingest command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no rows will be written");
            println!("🔍 DRY RUN MODE - No rows will be written to the database");
            println!();
        }

        let target = redact_connection_string(
            config.postgresql.connection_string.expose_secret().as_ref(),
        );
        let store = match create_record_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(database = %target, error = %e, "Failed to connect to PostgreSQL");
                eprintln!("Failed to connect to PostgreSQL ({target}): {e}");
                return Ok(4); // Connection error exit code
            }
        };
        if let Err(e) = store.test_connection().await {
            tracing::error!(database = %target, error = %e, "PostgreSQL connection test failed");
            eprintln!("PostgreSQL connection test failed ({target}): {e}");
            return Ok(4);
        }

        let source = match HttpSource::new(config.sources.clone(), &config.pipeline) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create HTTP source");
                eprintln!("Failed to create HTTP source: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let entities = self.entities();
        println!("🚀 Starting ingest: {}", join_entities(&entities));
        println!();

        let coordinator = IngestCoordinator::new(config, store, source);
        let summary = coordinator.run(&entities, &shutdown).await;

        print_summary(&summary);
        Ok(exit_code(&summary))
    }
}

fn join_entities(entities: &[Entity]) -> String {
    entities
        .iter()
        .map(|e| e.table())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_summary(summary: &IngestSummary) {
    println!();
    println!("📊 Ingest Summary:");
    for report in &summary.reports {
        let name = report.entity.map(|e| e.table()).unwrap_or("unknown");
        println!("  {name}:");
        println!("    Items Seen: {}", report.items_seen);
        println!(
            "    Records Accepted / Rejected: {} / {}",
            report.records_accepted, report.records_rejected
        );
        println!("    Rows Inserted: {}", report.rows_inserted);
        println!("    Rows Skipped (duplicates): {}", report.rows_skipped());
        println!("    Duration: {:.2}s", report.duration.as_secs_f64());
    }
    println!("  Total Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Failed entities:");
        for failure in &summary.failures {
            println!("  - {}: {}", failure.entity, failure.message);
        }
        println!();
    }

    if !summary.skipped.is_empty() {
        println!("⏭️  Skipped after shutdown: {}", join_entities(&summary.skipped));
        println!();
    }
}

/// Exit code for a finished run
///
/// 130 when interrupted by a signal, 1 when any entity failed, otherwise 0.
fn exit_code(summary: &IngestSummary) -> i32 {
    if summary.interrupted {
        println!("⚠️  Ingest interrupted. Rows already read were flushed.");
        tracing::info!("Ingest interrupted by user signal");
        130 // SIGINT exit code (standard Unix convention)
    } else if summary.is_successful() {
        println!("✅ Ingest completed successfully!");
        0
    } else {
        println!("⚠️  Ingest completed with failures");
        1 // Partial success
    }
}
