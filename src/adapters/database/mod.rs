//! Database abstraction layer
//!
//! This module provides a trait-based abstraction over the persistent store, so
//! the pipeline can run against PostgreSQL or an in-memory store in tests.

pub mod factory;
pub mod traits;

pub use factory::create_record_store;
pub use traits::{BulkInsertResult, LookupConnection, RecordStore};
