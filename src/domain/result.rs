//! Result type alias for Fhirflow
//!
//! This module provides a convenient Result type alias that uses FhirflowError
//! as the error type.

use super::errors::FhirflowError;

/// Result type alias for Fhirflow operations
///
/// # Examples
///
/// ```
/// use fhirflow::domain::result::Result;
/// use fhirflow::domain::errors::FhirflowError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(FhirflowError::Pipeline("worker panicked".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FhirflowError>;
