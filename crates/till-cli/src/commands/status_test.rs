use super::*;
use chrono::{TimeZone, Utc};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn status(filename: &str, state: MigrationState) -> MigrationStatus {
    MigrationStatus {
        filename: filename.to_string(),
        state,
        applied_at: match state {
            MigrationState::Pending => None,
            _ => Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
        },
    }
}

fn project(root: &Path) -> GlobalArgs {
    fs::write(
        root.join("till.yml"),
        "name: corner_store\ndatabase:\n  path: pos.duckdb\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("migrations")).unwrap();
    GlobalArgs {
        verbose: false,
        project_dir: root.to_path_buf(),
        target: None,
        database: None,
    }
}

#[test]
fn rows_show_dash_for_unapplied() {
    let rows = build_rows(&[
        status("0001_a.sql", MigrationState::Applied),
        status("0002_b.sql", MigrationState::Pending),
    ]);
    assert_eq!(rows[0], vec!["0001_a.sql", "applied", "2024-03-01 09:30:00"]);
    assert_eq!(rows[1], vec!["0002_b.sql", "pending", "-"]);
}

#[test]
fn summary_counts_each_state() {
    let statuses = vec![
        status("0001_a.sql", MigrationState::Applied),
        status("0002_b.sql", MigrationState::Modified),
        status("0003_c.sql", MigrationState::Pending),
        status("0004_d.sql", MigrationState::Pending),
    ];
    assert_eq!(
        summarize(&statuses),
        "1 applied, 2 pending, 1 modified, 0 missing"
    );
    assert!(!is_clean(&statuses));
    assert!(is_clean(&statuses[..1]));
}

#[test]
fn check_fails_when_migrations_are_pending() {
    let dir = tempdir().unwrap();
    let global = project(dir.path());
    fs::write(dir.path().join("migrations/0001_a.sql"), "CREATE TABLE a(id INT)").unwrap();

    let args = StatusArgs {
        json: false,
        check: true,
    };
    let err = execute(&args, &global).unwrap_err();
    assert_eq!(err.downcast_ref::<ExitCode>().map(|c| c.0), Some(1));
}

#[test]
fn check_passes_once_everything_is_applied() {
    let dir = tempdir().unwrap();
    let global = project(dir.path());
    fs::write(dir.path().join("migrations/0001_a.sql"), "CREATE TABLE a(id INT)").unwrap();

    crate::commands::migrate::execute(
        &crate::cli::MigrateArgs {
            dry_run: false,
            json: false,
        },
        &global,
    )
    .unwrap();

    let args = StatusArgs {
        json: true,
        check: true,
    };
    execute(&args, &global).unwrap();
}
