//! External system integrations for Fhirflow.
//!
//! This module provides adapters for the two external systems the pipeline talks to:
//!
//! - [`source`] - Line-delimited NDJSON sources (HTTP streaming)
//! - [`database`] - Record store abstraction (trait-based)
//! - [`postgresql`] - PostgreSQL implementation of the record store
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The pipeline only sees the
//! [`source::RecordSource`] and [`database::RecordStore`] traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use fhirflow::adapters::source::{HttpSource, RecordSource};
//! use fhirflow::config::{PipelineConfig, SourcesConfig};
//! use fhirflow::domain::Entity;
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpSource::new(SourcesConfig::default(), &PipelineConfig::default())?;
//! let mut lines = source.open(Entity::Patients).await?;
//!
//! while let Some(line) = lines.next().await {
//!     println!("{}", String::from_utf8_lossy(&line?));
//! }
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
pub mod source;
