//! Status command implementation

use anyhow::Result;
use till_migrate::{MigrationState, MigrationStatus};

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::{self, load_config, open_database, ExitCode};

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let runner = common::build_runner(&config)?;
    let db = open_database(&config, global)?;
    let dir = config.migrations_path_absolute(&global.project_dir);

    let statuses = runner.status(&db, &dir)?;

    if args.json {
        common::print_json(&statuses)?;
    } else if statuses.is_empty() {
        println!("No migrations found in {}", dir.display());
    } else {
        let rows = build_rows(&statuses);
        common::print_table(&["FILE", "STATE", "APPLIED AT"], &rows);
        println!();
        println!("{}", summarize(&statuses));
    }

    if args.check && !is_clean(&statuses) {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

fn build_rows(statuses: &[MigrationStatus]) -> Vec<Vec<String>> {
    statuses
        .iter()
        .map(|s| {
            vec![
                s.filename.clone(),
                s.state.to_string(),
                s.applied_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}

/// One-line count per state, e.g. `2 applied, 1 pending, 0 modified, 0 missing`.
fn summarize(statuses: &[MigrationStatus]) -> String {
    let count = |state: MigrationState| statuses.iter().filter(|s| s.state == state).count();
    format!(
        "{} applied, {} pending, {} modified, {} missing",
        count(MigrationState::Applied),
        count(MigrationState::Pending),
        count(MigrationState::Modified),
        count(MigrationState::Missing),
    )
}

fn is_clean(statuses: &[MigrationStatus]) -> bool {
    statuses.iter().all(|s| s.state == MigrationState::Applied)
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
