//! Line-delimited record sources
//!
//! The pipeline reads raw lines through the [`RecordSource`] trait; [`HttpSource`]
//! is the production implementation.

pub mod http;
pub mod traits;

pub use http::HttpSource;
pub use traits::{LineStream, RecordSource};
