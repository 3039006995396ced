//! Domain error types
//!
//! This module defines the error hierarchy for Fhirflow. Errors are domain-specific
//! and don't expose third-party types. Per-record validation failures are not errors;
//! see [`Rejection`].

use std::fmt;
use thiserror::Error;

/// Main Fhirflow error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum FhirflowError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source (HTTP stream) errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Persistent store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Pipeline coordination errors (task failures, aborted runs)
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Transport errors raised while reading a line-delimited source
///
/// Any of these is fatal to the entity pipeline that owns the stream.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Failed to connect to the source
    #[error("Failed to connect to {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    /// The source answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    /// Reading the body failed part way through
    #[error("Failed to read body from {url}: {message}")]
    ReadFailed { url: String, message: String },

    /// A single line exceeded the configured maximum length
    #[error("Line exceeds {max_bytes} bytes in {url}")]
    LineTooLong { url: String, max_bytes: usize },
}

/// Persistent store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to obtain a connection from the pool
    #[error("Failed to acquire connection: {0}")]
    ConnectionFailed(String),

    /// A point lookup failed
    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    /// A bulk insert failed
    #[error("Bulk insert of {rows} rows into {table} failed: {message}")]
    InsertFailed {
        table: String,
        rows: usize,
        message: String,
    },

    /// The batch handed to the store did not match the target table
    #[error("Row for table {found} submitted to {expected}")]
    RowMismatch { expected: String, found: String },
}

/// Why a raw record produced no rows
///
/// Rejections are expected, non-fatal outcomes of validation. They are counted and
/// logged at debug level, never propagated as failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The line is not valid JSON
    InvalidJson(String),

    /// The line decoded, but not to a JSON object
    NotAnObject,

    /// A required field is absent or has an unusable type
    MissingField(&'static str),

    /// A required temporal field could not be parsed
    InvalidDate { field: &'static str, value: String },

    /// A required reference did not resolve to a stored row
    UnresolvedReference { field: &'static str, reference: String },

    /// The reference lookup itself failed
    LookupFailed { field: &'static str, message: String },

    /// Nothing in the record yielded a usable row
    NoUsableRows,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InvalidJson(e) => write!(f, "invalid JSON: {e}"),
            Rejection::NotAnObject => write!(f, "record is not a JSON object"),
            Rejection::MissingField(field) => write!(f, "missing required field '{field}'"),
            Rejection::InvalidDate { field, value } => {
                write!(f, "unparseable date in '{field}': {value}")
            }
            Rejection::UnresolvedReference { field, reference } => {
                write!(f, "unresolved reference in '{field}': {reference}")
            }
            Rejection::LookupFailed { field, message } => {
                write!(f, "lookup for '{field}' failed: {message}")
            }
            Rejection::NoUsableRows => write!(f, "record contains no usable rows"),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for FhirflowError {
    fn from(err: std::io::Error) -> Self {
        FhirflowError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FhirflowError {
    fn from(err: serde_json::Error) -> Self {
        FhirflowError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FhirflowError {
    fn from(err: toml::de::Error) -> Self {
        FhirflowError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fhirflow_error_display() {
        let err = FhirflowError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_source_error_conversion() {
        let source_err = SourceError::UnexpectedStatus {
            url: "http://example.com/Patient.ndjson".to_string(),
            status: 503,
        };
        let err: FhirflowError = source_err.into();
        assert!(matches!(err, FhirflowError::Source(_)));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::InsertFailed {
            table: "patients".to_string(),
            rows: 12,
            message: "duplicate key".to_string(),
        };
        let err: FhirflowError = store_err.into();
        assert!(matches!(err, FhirflowError::Store(_)));
        assert_eq!(
            err.to_string(),
            "Store error: Bulk insert of 12 rows into patients failed: duplicate key"
        );
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::UnresolvedReference {
            field: "subject",
            reference: "uuid-non-existing".to_string(),
        };
        assert_eq!(
            rejection.to_string(),
            "unresolved reference in 'subject': uuid-non-existing"
        );
        assert_eq!(
            Rejection::MissingField("id").to_string(),
            "missing required field 'id'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: FhirflowError = io_err.into();
        assert!(matches!(err, FhirflowError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: FhirflowError = json_err.into();
        assert!(matches!(err, FhirflowError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: FhirflowError = toml_err.into();
        assert!(matches!(err, FhirflowError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
