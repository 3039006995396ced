//! PostgreSQL database integration
//!
//! This module provides the pooled PostgreSQL store for validated rows and the
//! per-worker lookup connections used for reference resolution.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::{PgLookupConnection, PostgreSQLStore};
pub use client::PostgreSQLClient;
