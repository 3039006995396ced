//! Configuration management for Fhirflow.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Fhirflow uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FHIRFLOW_<SECTION>_<KEY>` environment overrides
//! - Default values for every tuning knob
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fhirflow::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fhirflow.toml")?;
//!
//! println!("Queue capacity: {}", config.pipeline.queue_capacity);
//! println!("Patients from: {}", config.sources.patients_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run switch
//! - [`PipelineConfig`] - Queue capacity, worker count, flush interval, cache TTL
//! - [`SourcesConfig`] - One NDJSON URL per entity
//! - [`PostgreSQLConfig`] - Connection string and pool sizing
//! - [`LoggingConfig`] - Local JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [pipeline]
//! queue_capacity = 10
//! worker_count = 5
//! flush_interval_ms = 100
//! cache_ttl_seconds = 30
//!
//! [sources]
//! patients_url = "https://raw.githubusercontent.com/smart-on-fhir/flat-fhir-files/master/r3/Patient.ndjson"
//!
//! [postgresql]
//! connection_string = "${FHIRFLOW_DATABASE_URL}"
//! max_connections = 20
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, FhirflowConfig, LoggingConfig, PipelineConfig, PostgreSQLConfig,
    SourcesConfig,
};
pub use secret::{redact_connection_string, secret_string, SecretString, SecretValue};
