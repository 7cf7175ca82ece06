//! Migration orchestration.
//!
//! Per-file lifecycle: discovered -> pending (not in the ledger) -> applying
//! -> applied | failed. A failed file leaves no ledger row, so it is pending
//! again on the next run once the script is fixed.

use crate::applier::TransactionalApplier;
use crate::error::MigrateResult;
use crate::ledger::Ledger;
use crate::source::MigrationSource;
use crate::status::{build_status, MigrationState, MigrationStatus};
use serde::Serialize;
use std::path::Path;
use till_core::{compute_checksum, MigrationsConfig};
use till_db::Database;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Files committed by this run, in apply order
    pub applied: Vec<String>,
    /// Files that were pending when the run started
    pub pending: Vec<String>,
}

/// Drives the ledger, source, and applier over a migrations directory.
#[derive(Debug, Clone)]
pub struct MigrationRunner {
    ledger: Ledger,
    extension: String,
    separator: String,
}

impl MigrationRunner {
    /// Build a runner from project migration settings
    pub fn new(settings: &MigrationsConfig) -> MigrateResult<Self> {
        Ok(Self {
            ledger: Ledger::new(settings.ledger_table.clone())?,
            extension: settings.extension.clone(),
            separator: settings.separator.clone(),
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Migration source for `dir` using this runner's extension
    pub fn source(&self, dir: &Path) -> MigrationSource {
        MigrationSource::new(dir, &self.extension)
    }

    /// Pending filenames in apply order, without applying anything.
    ///
    /// Creates the ledger table if it is missing.
    pub fn plan<D: Database>(&self, db: &D, dir: &Path) -> MigrateResult<Vec<String>> {
        self.ledger.ensure_schema(db)?;
        let applied = self.ledger.load_applied(db)?;
        let files = self.source(dir).list()?;
        Ok(files
            .into_iter()
            .filter(|f| !applied.contains(f))
            .collect())
    }

    /// Apply every pending migration in `dir`, in filename order.
    ///
    /// Stops at the first failure and returns that error; files after it are
    /// not attempted and no report is produced.
    pub fn run<D: Database>(&self, db: &D, dir: &Path) -> MigrateResult<RunReport> {
        let pending = self.plan(db, dir)?;
        if pending.is_empty() {
            log::info!("No pending migrations in {}", dir.display());
            return Ok(RunReport::default());
        }
        log::info!(
            "{} pending migration(s) against {}",
            pending.len(),
            db.db_type()
        );

        let source = self.source(dir);
        let applier = TransactionalApplier::new(&self.ledger, &self.separator);
        let mut applied = Vec::with_capacity(pending.len());

        for filename in &pending {
            let text = source.read(filename)?;
            let batches = applier.apply(db, filename, &text)?;
            log::info!("Applied {filename} ({batches} batch(es))");
            applied.push(filename.clone());
        }

        log::info!("Applied {} migration(s)", applied.len());
        Ok(RunReport { applied, pending })
    }

    /// Status of every migration on disk or in the ledger, ordered by filename.
    pub fn status<D: Database>(&self, db: &D, dir: &Path) -> MigrateResult<Vec<MigrationStatus>> {
        self.ledger.ensure_schema(db)?;
        let entries = self.ledger.entries(db)?;
        let source = self.source(dir);
        let files = source
            .list()?
            .into_iter()
            .map(|filename| {
                let checksum = compute_checksum(&source.read(&filename)?);
                Ok((filename, checksum))
            })
            .collect::<MigrateResult<Vec<_>>>()?;

        let statuses = build_status(&files, entries);
        for row in &statuses {
            if row.state == MigrationState::Modified {
                log::warn!("{} changed after it was applied and will not be re-run", row.filename);
            }
        }
        Ok(statuses)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
