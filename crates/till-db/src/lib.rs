//! till-db - Database abstraction layer for Till
//!
//! This crate provides the [`Database`] and [`Transaction`] traits the
//! migration engine is written against, and a DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, Transaction};
