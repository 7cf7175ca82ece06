//! Error types for the migration engine.

use std::path::PathBuf;
use thiserror::Error;
use till_db::DbError;

/// Migration engine errors.
///
/// A missing migrations directory is not represented here: it is treated as
/// an empty directory.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Migrations directory exists but could not be listed (MG001).
    #[error("[MG001] Failed to list migrations directory {}: {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A migration file could not be read (MG002).
    #[error("[MG002] Failed to read migration '{filename}': {source}")]
    ReadFailure {
        filename: String,
        source: std::io::Error,
    },

    /// The ledger table could not be created (MG003).
    #[error("[MG003] Failed to prepare migration ledger: {0}")]
    LedgerSchema(#[source] DbError),

    /// The ledger could not be read (MG004).
    #[error("[MG004] Failed to read migration ledger: {0}")]
    LedgerQuery(#[source] DbError),

    /// A transaction could not be opened for a migration (MG005).
    #[error("[MG005] Failed to begin transaction for '{filename}': {source}")]
    BeginTransaction { filename: String, source: DbError },

    /// A batch failed; the file's transaction was rolled back (MG006).
    #[error("[MG006] Migration '{filename}' failed in batch {batch}: {source}")]
    BatchExecution {
        filename: String,
        batch: usize,
        source: DbError,
    },

    /// The ledger already holds this filename (MG007).
    #[error("[MG007] Migration '{filename}' is already recorded in the ledger")]
    DuplicateMigration { filename: String },

    /// The ledger insert failed for another reason (MG008).
    #[error("[MG008] Failed to record migration '{filename}': {source}")]
    LedgerInsert { filename: String, source: DbError },

    /// Commit failed; nothing from the file was kept (MG009).
    #[error("[MG009] Failed to commit migration '{filename}': {source}")]
    Commit { filename: String, source: DbError },

    /// Ledger table name is not a plain identifier (MG014).
    #[error("[MG014] Invalid ledger table name '{0}'")]
    InvalidLedgerTable(String),

    /// A ledger row could not be interpreted (MG010).
    #[error("[MG010] Malformed ledger row: {0}")]
    MalformedLedgerRow(String),

    /// Migration name is empty after sanitizing (MG011).
    #[error("[MG011] Invalid migration name '{0}'")]
    InvalidName(String),

    /// Target migration file already exists (MG012).
    #[error("[MG012] Migration file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Writing a new migration file failed (MG013).
    #[error("[MG013] Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl MigrateError {
    /// Filename of the migration this error belongs to, if any
    pub fn filename(&self) -> Option<&str> {
        match self {
            MigrateError::ReadFailure { filename, .. }
            | MigrateError::BeginTransaction { filename, .. }
            | MigrateError::BatchExecution { filename, .. }
            | MigrateError::DuplicateMigration { filename }
            | MigrateError::LedgerInsert { filename, .. }
            | MigrateError::Commit { filename, .. } => Some(filename),
            _ => None,
        }
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
