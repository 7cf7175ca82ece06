//! Scripted [`Database`] double for failure-injection tests.
//!
//! Records every statement it sees and fails on demand, which lets engine
//! tests assert on exactly what reached the database and in what order.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Transaction};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// In-process database stand-in driven by a script of failures.
#[derive(Default)]
pub struct ScriptedDb {
    log: RefCell<Vec<String>>,
    fail_on: Vec<String>,
    violate_on: Vec<String>,
    fail_begin: bool,
    fail_commit: bool,
    fail_rollback: bool,
    rows: Vec<Vec<Option<String>>>,
    relations: HashSet<String>,
    open_transactions: Cell<usize>,
}

impl ScriptedDb {
    /// Create a database that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any statement containing `needle` with an execution error
    pub fn fail_when_contains(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    /// Fail any statement containing `needle` with a constraint violation
    pub fn violate_when_contains(mut self, needle: &str) -> Self {
        self.violate_on.push(needle.to_string());
        self
    }

    /// Make `begin` fail
    pub fn fail_begin(mut self) -> Self {
        self.fail_begin = true;
        self
    }

    /// Make `commit` fail
    pub fn fail_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// Make `rollback` fail
    pub fn fail_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    /// Rows returned by every `query_rows` call
    pub fn with_rows(mut self, rows: Vec<Vec<Option<String>>>) -> Self {
        self.rows = rows;
        self
    }

    /// Report `name` as an existing relation
    pub fn with_relation(mut self, name: &str) -> Self {
        self.relations.insert(name.to_string());
        self
    }

    /// Everything the database has seen, in order
    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Number of transactions begun but not yet finished
    pub fn open_transactions(&self) -> usize {
        self.open_transactions.get()
    }

    fn record(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }

    fn check(&self, sql: &str) -> DbResult<()> {
        if let Some(needle) = self.violate_on.iter().find(|n| sql.contains(n.as_str())) {
            return Err(DbError::ConstraintViolation(format!(
                "Constraint Error: Duplicate key on '{needle}'"
            )));
        }
        if let Some(needle) = self.fail_on.iter().find(|n| sql.contains(n.as_str())) {
            return Err(DbError::ExecutionError(format!(
                "scripted failure on '{needle}'"
            )));
        }
        Ok(())
    }
}

impl Database for ScriptedDb {
    type Transaction<'a> = ScriptedTransaction<'a>;

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.record(format!("EXECUTE {sql}"));
        self.check(sql)
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        Ok(self.relations.contains(name))
    }

    fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>> {
        self.record(format!("QUERY {sql}"));
        self.check(sql)?;
        Ok(self.rows.clone())
    }

    fn begin(&self) -> DbResult<ScriptedTransaction<'_>> {
        self.record("BEGIN".to_string());
        if self.fail_begin {
            return Err(DbError::TransactionError("scripted BEGIN failure".to_string()));
        }
        self.open_transactions.set(self.open_transactions.get() + 1);
        Ok(ScriptedTransaction {
            db: self,
            finished: false,
        })
    }

    fn db_type(&self) -> &'static str {
        "scripted"
    }
}

/// Transaction handle for [`ScriptedDb`]
pub struct ScriptedTransaction<'a> {
    db: &'a ScriptedDb,
    finished: bool,
}

impl ScriptedTransaction<'_> {
    fn finish(&mut self) {
        self.finished = true;
        self.db
            .open_transactions
            .set(self.db.open_transactions.get() - 1);
    }
}

impl Transaction for ScriptedTransaction<'_> {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.db.record(format!("BATCH {sql}"));
        self.db.check(sql)
    }

    fn execute(&mut self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.db
            .record(format!("EXECUTE {sql} [{}]", params.join(", ")));
        self.db.check(sql)?;
        for param in params {
            self.db.check(param)?;
        }
        Ok(1)
    }

    fn commit(mut self) -> DbResult<()> {
        self.finish();
        self.db.record("COMMIT".to_string());
        if self.db.fail_commit {
            return Err(DbError::TransactionError("scripted COMMIT failure".to_string()));
        }
        Ok(())
    }

    fn rollback(mut self) -> DbResult<()> {
        self.finish();
        self.db.record("ROLLBACK".to_string());
        if self.db.fail_rollback {
            return Err(DbError::TransactionError(
                "scripted ROLLBACK failure".to_string(),
            ));
        }
        Ok(())
    }
}

impl Drop for ScriptedTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.finish();
            self.db.record("ROLLBACK (dropped)".to_string());
        }
    }
}
