//! Applying one migration file atomically.

use crate::batch::split_batches;
use crate::error::{MigrateError, MigrateResult};
use crate::ledger::Ledger;
use till_core::compute_checksum;
use till_db::{Database, Transaction};

/// Runs every batch of a file plus its ledger insert in one transaction.
#[derive(Debug, Clone)]
pub struct TransactionalApplier<'a> {
    ledger: &'a Ledger,
    separator: &'a str,
}

impl<'a> TransactionalApplier<'a> {
    pub fn new(ledger: &'a Ledger, separator: &'a str) -> Self {
        Self { ledger, separator }
    }

    /// Apply `text` as migration `filename`.
    ///
    /// Either every batch and the ledger row are committed, or the
    /// transaction is rolled back and the first error is returned. A failure
    /// during rollback is logged and never replaces that error. Returns the
    /// number of batches executed.
    pub fn apply<D: Database>(&self, db: &D, filename: &str, text: &str) -> MigrateResult<usize> {
        let mut tx = db.begin().map_err(|e| MigrateError::BeginTransaction {
            filename: filename.to_string(),
            source: e,
        })?;

        match self.apply_in(&mut tx, filename, text) {
            Ok(batch_count) => {
                tx.commit().map_err(|e| MigrateError::Commit {
                    filename: filename.to_string(),
                    source: e,
                })?;
                Ok(batch_count)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    log::warn!("Rollback of {filename} failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    fn apply_in<T: Transaction>(
        &self,
        tx: &mut T,
        filename: &str,
        text: &str,
    ) -> MigrateResult<usize> {
        let batches = split_batches(text, self.separator);
        if batches.is_empty() {
            log::warn!("Migration {filename} contains no SQL; recording it as applied");
        }

        for (idx, batch) in batches.iter().enumerate() {
            log::debug!("{filename}: executing batch {}/{}", idx + 1, batches.len());
            tx.execute_batch(batch)
                .map_err(|e| MigrateError::BatchExecution {
                    filename: filename.to_string(),
                    batch: idx + 1,
                    source: e,
                })?;
        }

        self.ledger
            .record_applied(tx, filename, &compute_checksum(text))?;
        Ok(batches.len())
    }
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
