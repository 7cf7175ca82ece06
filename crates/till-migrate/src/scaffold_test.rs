use super::*;
use crate::batch::split_batches;
use tempfile::tempdir;

#[test]
fn first_migration_is_0001_and_creates_directory() {
    let dir = tempdir().unwrap();
    let migrations = dir.path().join("migrations");

    let path = create_migration(&migrations, "Create Sales", "sql", "GO").unwrap();
    assert_eq!(path, migrations.join("0001_create_sales.sql"));
    assert!(path.exists());
}

#[test]
fn numbering_follows_highest_existing_prefix() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("0001_a.sql"), "").unwrap();
    fs::write(dir.path().join("0007_b.sql"), "").unwrap();
    fs::write(dir.path().join("notes.sql"), "").unwrap();

    let path = create_migration(dir.path(), "add index", "sql", "GO").unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "0008_add_index.sql"
    );
}

#[test]
fn name_is_sanitized() {
    assert_eq!(sanitize_name("  Add Customer-Credit!! limits "), "add_customer_credit_limits");
    assert_eq!(sanitize_name("__x__"), "x");
    assert_eq!(sanitize_name("../../etc/passwd"), "etc_passwd");
}

#[test]
fn empty_name_is_rejected() {
    let dir = tempdir().unwrap();
    let err = create_migration(dir.path(), " -- ", "sql", "GO").unwrap_err();
    assert!(matches!(err, MigrateError::InvalidName(_)));
}

#[test]
fn template_contains_no_executable_batches() {
    let dir = tempdir().unwrap();
    let path = create_migration(dir.path(), "noop", "sql", "GO").unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("-- Migration: noop"));
    // Only comment lines remain after splitting.
    for batch in split_batches(&text, "GO") {
        assert!(batch.lines().all(|l| l.trim().is_empty() || l.starts_with("--")));
    }
}

#[test]
fn multiline_name_cannot_inject_sql() {
    let dir = tempdir().unwrap();
    let path = create_migration(dir.path(), "fix\nDROP TABLE sales\r\nGO", "sql", "GO").unwrap();
    let text = fs::read_to_string(&path).unwrap();

    assert!(text.contains("-- Migration: fix_drop_table_sales_go\n"));
    assert!(text.lines().all(|l| l.trim().is_empty() || l.starts_with("--")));
    for batch in split_batches(&text, "GO") {
        assert!(batch.lines().all(|l| l.starts_with("--")), "live SQL: {batch}");
    }
}

#[test]
fn sequence_starts_at_one_and_stops_at_u64_max() {
    assert_eq!(next_sequence(&[]), Some(1));
    assert_eq!(next_sequence(&["0041_a.sql".to_string()]), Some(42));
    assert_eq!(next_sequence(&[format!("{}_max.sql", u64::MAX)]), None);
}

#[test]
fn exhausted_sequence_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(format!("{}_max.sql", u64::MAX)), "").unwrap();

    let err = create_migration(dir.path(), "one more", "sql", "GO").unwrap_err();
    assert!(matches!(err, MigrateError::InvalidName(_)));
}
