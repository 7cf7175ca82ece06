//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Transaction};
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
#[derive(Debug)]
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }
}

/// Read a column value as text, trying the DuckDB types we expect to see.
///
/// DuckDB integer columns return `None` for `Option<String>`, so we try
/// String -> i64 -> f64 -> bool. Other types should be cast to VARCHAR
/// in the query.
fn get_column_as_string(row: &duckdb::Row<'_>, idx: usize) -> Option<String> {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return Some(s);
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return Some(n.to_string());
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return Some(f.to_string());
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return Some(b.to_string());
    }
    None
}

impl Database for DuckDbBackend {
    type Transaction<'a> = DuckDbTransaction<'a>;

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(DbError::from)
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        // Handle schema-qualified names
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(DbError::from)?;

        Ok(count > 0)
    }

    fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(DbError::from)?;
        let rows = stmt
            .query_map([], |row| {
                let col_count = row.as_ref().column_count();
                Ok((0..col_count)
                    .map(|i| get_column_as_string(row, i))
                    .collect::<Vec<_>>())
            })
            .map_err(DbError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::from)?;
        Ok(rows)
    }

    fn begin(&self) -> DbResult<DuckDbTransaction<'_>> {
        let conn = self.lock()?;
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(DuckDbTransaction {
            conn,
            finished: false,
        })
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// An open DuckDB transaction.
///
/// Holds the connection lock for its whole lifetime, so nothing else in the
/// process can interleave statements with it.
pub struct DuckDbTransaction<'a> {
    conn: MutexGuard<'a, Connection>,
    finished: bool,
}

impl Transaction for DuckDbTransaction<'_> {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.conn.execute_batch(sql).map_err(DbError::from)
    }

    fn execute(&mut self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.conn
            .execute(sql, duckdb::params_from_iter(params.iter()))
            .map_err(DbError::from)
    }

    fn commit(mut self) -> DbResult<()> {
        self.finished = true;
        if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
            let _ = self.conn.execute_batch("ROLLBACK");
            return Err(DbError::TransactionError(format!(
                "COMMIT failed: {commit_err}"
            )));
        }
        Ok(())
    }

    fn rollback(mut self) -> DbResult<()> {
        self.finished = true;
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }
}

impl Drop for DuckDbTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            log::warn!("Rollback of abandoned transaction failed: {e}");
        }
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
