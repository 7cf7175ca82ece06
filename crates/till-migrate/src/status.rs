//! Per-file status rows joining the migrations directory with the ledger.

use crate::ledger::LedgerEntry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Where a migration stands relative to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationState {
    /// In the ledger, file unchanged (or no checksum recorded)
    Applied,
    /// On disk, not in the ledger
    Pending,
    /// In the ledger, but the file text changed since it was applied
    Modified,
    /// In the ledger, but no longer on disk
    Missing,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::Applied => write!(f, "applied"),
            MigrationState::Pending => write!(f, "pending"),
            MigrationState::Modified => write!(f, "modified"),
            MigrationState::Missing => write!(f, "missing"),
        }
    }
}

/// One row of `till status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub filename: String,
    pub state: MigrationState,
    pub applied_at: Option<DateTime<Utc>>,
}

/// Join on-disk files (with their current checksums) and ledger entries.
///
/// Output is ordered by filename.
pub(crate) fn build_status(
    files: &[(String, String)],
    entries: Vec<LedgerEntry>,
) -> Vec<MigrationStatus> {
    let mut by_name: BTreeMap<String, LedgerEntry> = entries
        .into_iter()
        .map(|e| (e.filename.clone(), e))
        .collect();

    let mut rows: Vec<MigrationStatus> = files
        .iter()
        .map(|(filename, checksum)| match by_name.remove(filename) {
            Some(entry) => {
                let drifted = entry
                    .checksum
                    .as_deref()
                    .is_some_and(|recorded| recorded != checksum);
                MigrationStatus {
                    filename: filename.clone(),
                    state: if drifted {
                        MigrationState::Modified
                    } else {
                        MigrationState::Applied
                    },
                    applied_at: Some(entry.applied_at),
                }
            }
            None => MigrationStatus {
                filename: filename.clone(),
                state: MigrationState::Pending,
                applied_at: None,
            },
        })
        .collect();

    rows.extend(by_name.into_values().map(|entry| MigrationStatus {
        filename: entry.filename,
        state: MigrationState::Missing,
        applied_at: Some(entry.applied_at),
    }));

    rows.sort_by(|a, b| a.filename.cmp(&b.filename));
    rows
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
