//! Domain models and types for Fhirflow.
//!
//! This module contains the entity kinds, validated row types and error types shared
//! by every layer of the pipeline.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Entity kinds** ([`Entity`]) with their table names and column lists
//! - **Validated rows** ([`Row`] and one struct per table)
//! - **Error types** ([`FhirflowError`], [`SourceError`], [`StoreError`])
//! - **Per-record rejections** ([`Rejection`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, FhirflowError>`]:
//!
//! ```rust,no_run
//! use fhirflow::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = fhirflow::config::load_config("fhirflow.toml")?;
//!     println!("{} workers", config.pipeline.worker_count);
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod errors;
pub mod result;
pub mod row;

// Re-export commonly used types for convenience
pub use entity::Entity;
pub use errors::{FhirflowError, Rejection, SourceError, StoreError};
pub use result::Result;
pub use row::{EncounterRow, ObservationRow, PatientRow, ProcedureRow, Row};
