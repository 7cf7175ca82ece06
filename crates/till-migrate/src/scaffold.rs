//! Creating new, sequentially numbered migration files.

use crate::error::{MigrateError, MigrateResult};
use crate::source::MigrationSource;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Width of the zero-padded sequence prefix.
const SEQUENCE_WIDTH: usize = 4;

/// Write an empty migration template named `NNNN_<name>.<extension>` into
/// `dir`, creating the directory if needed.
///
/// `NNNN` is one more than the highest numeric prefix already present.
pub fn create_migration(
    dir: &Path,
    name: &str,
    extension: &str,
    separator: &str,
) -> MigrateResult<PathBuf> {
    let slug = sanitize_name(name);
    if slug.is_empty() {
        return Err(MigrateError::InvalidName(name.to_string()));
    }

    let source = MigrationSource::new(dir, extension);
    let next = next_sequence(&source.list()?)
        .ok_or_else(|| MigrateError::InvalidName(name.to_string()))?;
    let filename = format!("{next:0width$}_{slug}.{extension}", width = SEQUENCE_WIDTH);
    let path = dir.join(&filename);
    if path.exists() {
        return Err(MigrateError::AlreadyExists(path));
    }

    fs::create_dir_all(dir).map_err(|e| MigrateError::Write {
        path: dir.to_path_buf(),
        source: e,
    })?;
    fs::write(&path, template(&slug, separator)).map_err(|e| MigrateError::Write {
        path: path.clone(),
        source: e,
    })?;

    log::info!("Created migration {}", path.display());
    Ok(path)
}

/// Lowercase, map runs of non-alphanumerics to a single `_`, trim `_`.
fn sanitize_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

/// One past the highest numeric prefix, or `None` once the sequence is exhausted.
fn next_sequence(existing: &[String]) -> Option<u64> {
    existing
        .iter()
        .filter_map(|f| {
            let digits: String = f.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u64>().ok()
        })
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

/// Header comment only; `slug` is already restricted to `[a-z0-9_]`.
fn template(slug: &str, separator: &str) -> String {
    format!(
        "-- Migration: {slug}\n\
         -- Created: {created}\n\
         --\n\
         -- Put '{separator}' on a line of its own to start a new batch.\n\
         -- Every batch in this file runs inside one transaction.\n\
         \n",
        created = Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;
