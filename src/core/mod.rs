//! Core business logic for Fhirflow.
//!
//! # Modules
//!
//! - [`cache`] - Foreign-key resolution cache with TTL expiry
//! - [`ingest`] - Producer, workers, accumulator and per-entity orchestration
//! - [`transform`] - Per-entity validation and mapping of FHIR resources to rows
//!
//! # Ingest Workflow
//!
//! For each entity, in the order patients, encounters, procedures, observations:
//!
//! 1. **Stream**: Read the entity's NDJSON export line by line
//! 2. **Transform**: Validate each resource and resolve its references to internal ids
//! 3. **Accumulate**: Buffer the resulting rows in memory
//! 4. **Flush**: Bulk insert the buffer periodically and once more after the drain
//! 5. **Report**: Record per-entity counters in the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use fhirflow::adapters::database::create_record_store;
//! use fhirflow::adapters::source::HttpSource;
//! use fhirflow::config::load_config;
//! use fhirflow::core::ingest::IngestCoordinator;
//! use fhirflow::domain::Entity;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fhirflow.toml")?;
//!
//! let store = create_record_store(&config).await?;
//! let source = Arc::new(HttpSource::new(config.sources.clone(), &config.pipeline)?);
//! let coordinator = IngestCoordinator::new(config, store, source);
//!
//! let summary = coordinator
//!     .run(&Entity::INGEST_ORDER, &CancellationToken::new())
//!     .await;
//!
//! println!("Rows inserted: {}", summary.total_rows_inserted());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod ingest;
pub mod transform;
