//! Migrate command implementation

use anyhow::Result;
use till_migrate::RunReport;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{self, load_config, open_database};

/// Execute the migrate command
pub(crate) fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let runner = common::build_runner(&config)?;
    let db = open_database(&config, global)?;
    let dir = config.migrations_path_absolute(&global.project_dir);

    if args.dry_run {
        let pending = runner.plan(&db, &dir)?;
        if args.json {
            return common::print_json(&RunReport {
                applied: Vec::new(),
                pending,
            });
        }
        if pending.is_empty() {
            println!("Nothing to apply, database is up to date.");
        } else {
            println!("Would apply {} migration(s):", pending.len());
            for filename in &pending {
                println!("  {filename}");
            }
        }
        return Ok(());
    }

    let report = runner.run(&db, &dir)?;
    if args.json {
        return common::print_json(&report);
    }
    if report.applied.is_empty() {
        println!("Nothing to apply, database is up to date.");
    } else {
        for filename in &report.applied {
            println!("  applied  {filename}");
        }
        println!("\nApplied {} migration(s).", report.applied.len());
    }
    Ok(())
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
