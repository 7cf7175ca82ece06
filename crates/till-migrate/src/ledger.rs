//! The ledger: a table inside the target database recording which migration
//! files have been applied.
//!
//! One row per filename, protected by a unique constraint. Rows are only ever
//! inserted, inside the same transaction as the migration they describe.

use crate::error::{MigrateError, MigrateResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use till_core::config::is_valid_relation_name;
use till_db::{Database, Transaction};

/// Timestamp layout written to the ledger (DuckDB keeps microseconds).
const WRITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Timestamp layout read back from the ledger; the fraction is optional.
const READ_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One applied migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub filename: String,
    pub applied_at: DateTime<Utc>,
    /// SHA-256 of the file text at apply time; absent for rows written by
    /// other tools.
    pub checksum: Option<String>,
}

/// Handle on the ledger table.
#[derive(Debug, Clone)]
pub struct Ledger {
    table: String,
}

impl Ledger {
    /// Create a ledger stored in `table` (`name` or `schema.name`).
    pub fn new(table: impl Into<String>) -> MigrateResult<Self> {
        let table = table.into();
        if !is_valid_relation_name(&table) {
            return Err(MigrateError::InvalidLedgerTable(table));
        }
        Ok(Self { table })
    }

    /// Create the ledger table if it does not exist yet.
    ///
    /// Safe to call on every run; existing tables are left untouched.
    pub fn ensure_schema<D: Database>(&self, db: &D) -> MigrateResult<()> {
        if db
            .relation_exists(&self.table)
            .map_err(MigrateError::LedgerSchema)?
        {
            return Ok(());
        }

        log::info!("Creating migration ledger {}", self.table);
        let mut ddl = String::new();
        if let Some((schema, _)) = self.table.split_once('.') {
            ddl.push_str(&format!("CREATE SCHEMA IF NOT EXISTS {schema};\n"));
        }
        ddl.push_str(&format!(
            "CREATE TABLE {} (
                 filename   VARCHAR NOT NULL UNIQUE,
                 applied_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
                 checksum   VARCHAR
             );",
            self.table
        ));
        db.execute_batch(&ddl).map_err(MigrateError::LedgerSchema)
    }

    /// Filenames of every applied migration.
    pub fn load_applied<D: Database>(&self, db: &D) -> MigrateResult<BTreeSet<String>> {
        let rows = db
            .query_rows(&format!("SELECT filename FROM {}", self.table))
            .map_err(MigrateError::LedgerQuery)?;
        rows.into_iter()
            .map(|row| {
                row.into_iter().next().flatten().ok_or_else(|| {
                    MigrateError::MalformedLedgerRow("filename is NULL".to_string())
                })
            })
            .collect()
    }

    /// Every ledger entry, ordered by filename.
    pub fn entries<D: Database>(&self, db: &D) -> MigrateResult<Vec<LedgerEntry>> {
        let rows = db
            .query_rows(&format!(
                "SELECT filename, CAST(applied_at AS VARCHAR), checksum \
                 FROM {} ORDER BY filename",
                self.table
            ))
            .map_err(MigrateError::LedgerQuery)?;
        rows.into_iter().map(parse_entry).collect()
    }

    /// Insert the row for `filename` inside `tx`.
    ///
    /// A uniqueness violation becomes [`MigrateError::DuplicateMigration`]:
    /// another runner got there first.
    pub fn record_applied<T: Transaction>(
        &self,
        tx: &mut T,
        filename: &str,
        checksum: &str,
    ) -> MigrateResult<()> {
        let applied_at = Utc::now().format(WRITE_TIMESTAMP_FORMAT).to_string();
        tx.execute(
            &format!(
                "INSERT INTO {} (filename, applied_at, checksum) \
                 VALUES (?, CAST(? AS TIMESTAMP), ?)",
                self.table
            ),
            &[filename, applied_at.as_str(), checksum],
        )
        .map_err(|e| {
            if e.is_duplicate_key() {
                MigrateError::DuplicateMigration {
                    filename: filename.to_string(),
                }
            } else {
                MigrateError::LedgerInsert {
                    filename: filename.to_string(),
                    source: e,
                }
            }
        })?;
        Ok(())
    }
}

fn parse_entry(row: Vec<Option<String>>) -> MigrateResult<LedgerEntry> {
    let mut cols = row.into_iter();
    let filename = cols
        .next()
        .flatten()
        .ok_or_else(|| MigrateError::MalformedLedgerRow("filename is NULL".to_string()))?;
    let raw_ts = cols.next().flatten().ok_or_else(|| {
        MigrateError::MalformedLedgerRow(format!("applied_at is NULL for {filename}"))
    })?;
    let applied_at = NaiveDateTime::parse_from_str(&raw_ts, READ_TIMESTAMP_FORMAT)
        .map_err(|e| {
            MigrateError::MalformedLedgerRow(format!(
                "applied_at '{raw_ts}' for {filename}: {e}"
            ))
        })?
        .and_utc();
    let checksum = cols.next().flatten();
    Ok(LedgerEntry {
        filename,
        applied_at,
        checksum,
    })
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
