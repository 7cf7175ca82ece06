//! Migration file discovery.
//!
//! Filenames are the identity of a migration, so ordering uses plain byte-wise
//! string comparison: the same directory sorts identically on every machine
//! regardless of locale.

use crate::error::{MigrateError, MigrateResult};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// A directory of migration files with a recognized extension.
#[derive(Debug, Clone)]
pub struct MigrationSource {
    dir: PathBuf,
    suffix: String,
}

impl MigrationSource {
    /// Create a source for `dir`, matching files ending in `.{extension}`
    /// (case-insensitive).
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            suffix: format!(".{}", extension.to_ascii_lowercase()),
        }
    }

    /// Check whether `filename` carries the migration extension
    pub fn matches(&self, filename: &str) -> bool {
        filename.len() > self.suffix.len()
            && filename.to_ascii_lowercase().ends_with(&self.suffix)
    }

    /// List migration filenames in ordinal order.
    ///
    /// A directory that does not exist yields an empty list.
    pub fn list(&self) -> MigrateResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "Migrations directory {} does not exist, nothing to apply",
                    self.dir.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(MigrateError::DirectoryRead {
                    path: self.dir.clone(),
                    source: e,
                })
            }
        };

        let mut filenames = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MigrateError::DirectoryRead {
                path: self.dir.clone(),
                source: e,
            })?;
            if !entry.path().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                log::warn!(
                    "Skipping migration with non UTF-8 name: {}",
                    entry.path().display()
                );
                continue;
            };
            if self.matches(&name) {
                filenames.push(name);
            }
        }

        filenames.sort_unstable();
        Ok(filenames)
    }

    /// Read one migration file's text
    pub fn read(&self, filename: &str) -> MigrateResult<String> {
        fs::read_to_string(self.dir.join(filename)).map_err(|e| MigrateError::ReadFailure {
            filename: filename.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
