//! Database and transaction trait definitions
//!
//! The migration engine only needs three things from a driver: open a
//! transaction, execute a batch inside it, and finish it with commit or
//! rollback. Everything else here supports ledger bookkeeping.

use crate::error::DbResult;

/// Database abstraction trait for Till
///
/// Implementations are handed to the engine explicitly; there is no
/// process-wide connection.
pub trait Database {
    /// Transaction handle borrowed from this database
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Execute one or more SQL statements outside any explicit transaction
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists (accepts `schema.name`)
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Run a query and return every row with each column rendered as text
    ///
    /// NULL columns are returned as `None`.
    fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>>;

    /// Begin a transaction
    fn begin(&self) -> DbResult<Self::Transaction<'_>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// An open transaction
///
/// Dropping a transaction without calling [`commit`](Transaction::commit)
/// or [`rollback`](Transaction::rollback) must roll it back.
pub trait Transaction {
    /// Execute one batch of SQL inside the transaction
    fn execute_batch(&mut self, sql: &str) -> DbResult<()>;

    /// Execute a single parameterized statement, returns affected rows
    ///
    /// Parameters bind positionally to `?` placeholders.
    fn execute(&mut self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Commit the transaction
    fn commit(self) -> DbResult<()>;

    /// Roll the transaction back
    fn rollback(self) -> DbResult<()>;
}
