//! till-core - Core library for Till
//!
//! This crate provides project configuration parsing (`till.yml`), target
//! resolution, and the content checksum shared by the migration engine and
//! the CLI.

pub mod checksum;
pub mod config;
pub mod error;

pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig, DbType, MigrationsConfig};
pub use error::{CoreError, CoreResult};
