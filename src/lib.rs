// Fhirflow - FHIR NDJSON to PostgreSQL ingestion
// Copyright (c) 2025 Fhirflow Contributors
// Licensed under the MIT License

//! # Fhirflow - FHIR NDJSON to PostgreSQL
//!
//! Fhirflow streams newline-delimited FHIR exports over HTTP and loads patients,
//! encounters, procedures and observations into relational PostgreSQL tables with
//! bounded memory.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Streaming** NDJSON bodies line by line into a bounded queue
//! - **Transforming** FHIR resources into typed rows, resolving references to
//!   previously loaded entities through a TTL cache
//! - **Loading** rows in bulk with periodic and terminal flushes
//! - **Draining** every enqueued record before an entity is reported complete,
//!   including on shutdown
//!
//! ## Architecture
//!
//! Fhirflow follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (ingest pipeline, transform, reference cache)
//! - [`adapters`] - External integrations (HTTP source, PostgreSQL)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
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
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("fhirflow.toml")?;
//!
//!     let store = create_record_store(&config).await?;
//!     let source = Arc::new(HttpSource::new(config.sources.clone(), &config.pipeline)?);
//!     let coordinator = IngestCoordinator::new(config, store, source);
//!
//!     let summary = coordinator
//!         .run(&Entity::INGEST_ORDER, &CancellationToken::new())
//!         .await;
//!
//!     println!("Inserted {} rows", summary.total_rows_inserted());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fatal errors use [`domain::FhirflowError`]. A record that fails validation is
//! not an error: it is counted as a [`domain::Rejection`] and the pipeline moves on.
//!
//! ```rust,no_run
//! use fhirflow::domain::FhirflowError;
//!
//! fn example() -> Result<(), FhirflowError> {
//!     let _config = fhirflow::config::load_config("fhirflow.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
