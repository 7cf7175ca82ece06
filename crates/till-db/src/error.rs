//! Error types for till-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Integrity constraint violated (D003)
    #[error("[D003] Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Transaction control statement failed (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Returns true if this error is a uniqueness/constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation(_))
    }

    /// Returns true only for unique or primary key violations
    ///
    /// NOT NULL, CHECK and foreign key failures are constraint violations
    /// too, but not duplicates.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, DbError::ConstraintViolation(msg) if msg.contains("Duplicate key"))
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants for constraint
        // failures, so classify by the message prefix DuckDB emits.
        let msg = err.to_string();
        if msg.contains("Constraint Error") || msg.contains("Duplicate key") {
            DbError::ConstraintViolation(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
