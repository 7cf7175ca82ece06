//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use till_core::Config;
use till_db::DuckDbBackend;
use till_migrate::MigrationRunner;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that the database connection is dropped and closed first.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs downcasts and exits without printing.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the project configuration from `--project-dir`.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let config = Config::load_from_dir(&global.project_dir)
        .context("Failed to load project configuration")?;
    log::debug!("Loaded project {} (version {})", config.name, config.version);
    Ok(config)
}

/// Open the database selected by `--database`, else the resolved target.
pub(crate) fn open_database(config: &Config, global: &GlobalArgs) -> Result<DuckDbBackend> {
    let target = Config::resolve_target(global.target.as_deref());
    let mut db_config = config
        .get_database_config(target.as_deref())
        .context("Failed to get database configuration")?;
    if let Some(path) = &global.database {
        db_config.path = path.clone();
    }

    let path = db_config.resolved_path(&global.project_dir);
    log::debug!(
        "Opening {} database at {path} (target: {})",
        db_config.db_type,
        target.as_deref().unwrap_or("default")
    );
    DuckDbBackend::new(&path).with_context(|| format!("Failed to open database: {path}"))
}

/// Runner configured from the project's migration settings.
pub(crate) fn build_runner(config: &Config) -> Result<MigrationRunner> {
    MigrationRunner::new(&config.migrations).context("Invalid migration settings")
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Path relative to the project directory for display, or unchanged.
pub(crate) fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ---------------------------------------------------------------------------
// Table-printing utilities
// ---------------------------------------------------------------------------

/// Maximum width per column across the header and every row.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Render a left-aligned table: header, dashed rule, then one line per row.
///
/// Columns are separated by two spaces and trailing padding is trimmed.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = calculate_column_widths(headers, rows);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.iter().copied(), &widths));
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    lines.push(rule.join("  "));
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let parts: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
        .collect();
    parts.join("  ").trim_end().to_string()
}

pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", format_table(headers, rows));
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
