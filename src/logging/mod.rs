//! Logging setup and shared event macros
//!
//! ```no_run
//! use fhirflow::config::LoggingConfig;
//! use fhirflow::logging::init_logging;
//!
//! let _guard = init_logging("info", &LoggingConfig::default()).expect("logging");
//! tracing::info!(entity = "patients", "Starting");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of an entity pipeline
///
/// # Example
///
/// ```no_run
/// use fhirflow::log_entity_start;
/// use fhirflow::domain::Entity;
///
/// log_entity_start!(Entity::Patients, 5, 10);
/// ```
#[macro_export]
macro_rules! log_entity_start {
    ($entity:expr, $workers:expr, $queue_capacity:expr) => {
        tracing::info!(
            entity = %$entity,
            workers = $workers,
            queue_capacity = $queue_capacity,
            "Starting entity pipeline"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use fhirflow::log_error_with_context;
/// use fhirflow::domain::FhirflowError;
///
/// let error = FhirflowError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
