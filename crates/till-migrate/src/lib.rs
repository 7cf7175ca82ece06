//! till-migrate - Schema migration engine for Till
//!
//! Discovers versioned SQL files in a directory, works out which ones the
//! target database has not seen yet, and applies each pending file inside
//! its own transaction together with its ledger row.
//!
//! ```text
//! MigrationRunner
//!   -> Ledger::ensure_schema / load_applied
//!   -> MigrationSource::list            (files, ordinal filename order)
//!   -> pending = files - applied
//!   -> for each pending: split_batches -> TransactionalApplier::apply
//! ```

pub mod applier;
pub mod batch;
pub mod error;
pub mod ledger;
pub mod runner;
pub mod scaffold;
pub mod source;
pub mod status;

pub use applier::TransactionalApplier;
pub use batch::split_batches;
pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, LedgerEntry};
pub use runner::{MigrationRunner, RunReport};
pub use scaffold::create_migration;
pub use source::MigrationSource;
pub use status::{MigrationState, MigrationStatus};
