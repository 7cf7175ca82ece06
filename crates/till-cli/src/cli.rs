//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Till - versioned SQL migrations for the point-of-sale database
#[derive(Parser, Debug)]
#[command(name = "till")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override target (database connection)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override the database path from config
    #[arg(short, long, global = true, env = "TILL_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations
    Migrate(MigrateArgs),

    /// Show applied, pending, modified, and missing migrations
    Status(StatusArgs),

    /// Create a new, sequentially numbered migration file
    New(NewArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print status rows as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 if anything is pending, modified, or missing
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Descriptive migration name, e.g. "add customer credit"
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
