//! New command implementation

use anyhow::Result;
use till_migrate::create_migration;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::{self, load_config};

/// Execute the new command
pub(crate) fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let dir = config.migrations_path_absolute(&global.project_dir);
    let path = create_migration(
        &dir,
        &args.name,
        &config.migrations.extension,
        &config.migrations.separator,
    )?;
    println!(
        "Created {}",
        common::display_path(&path, &global.project_dir)
    );
    Ok(())
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
