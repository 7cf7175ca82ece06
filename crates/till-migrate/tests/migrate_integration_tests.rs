//! Integration tests for the migration engine against file-backed DuckDB.
//!
//! These reopen the database between runs to check that the ledger and the
//! applied schema survive a process restart.

use std::fs;
use std::path::Path;
use till_core::{Config, MigrationsConfig};
use till_db::{Database, DuckDbBackend};
use till_migrate::{create_migration, MigrateError, MigrationRunner, MigrationState};

fn write(dir: &Path, name: &str, sql: &str) {
    fs::write(dir.join(name), sql).unwrap();
}

fn open(path: &Path) -> DuckDbBackend {
    DuckDbBackend::from_path(path).unwrap()
}

fn scalar(db: &DuckDbBackend, sql: &str) -> String {
    db.query_rows(sql).unwrap()[0][0].clone().unwrap()
}

#[test]
fn ledger_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let migrations = tmp.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    let db_path = tmp.path().join("pos.duckdb");
    write(
        &migrations,
        "0001_products.sql",
        "CREATE TABLE products (sku VARCHAR PRIMARY KEY, price DECIMAL(10,2))\n\
         GO\n\
         INSERT INTO products VALUES ('A-1', 9.99)",
    );

    let runner = MigrationRunner::new(&MigrationsConfig::default()).unwrap();
    {
        let db = open(&db_path);
        let report = runner.run(&db, &migrations).unwrap();
        assert_eq!(report.applied, vec!["0001_products.sql"]);
    }

    write(
        &migrations,
        "0002_stock.sql",
        "ALTER TABLE products ADD COLUMN stock INT DEFAULT 0",
    );

    let db = open(&db_path);
    let report = runner.run(&db, &migrations).unwrap();
    assert_eq!(report.applied, vec!["0002_stock.sql"]);
    assert_eq!(report.pending, vec!["0002_stock.sql"]);
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM products"), "1");
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM till_migrations"), "2");
}

#[test]
fn fixed_migration_applies_on_next_run() {
    let tmp = tempfile::tempdir().unwrap();
    let migrations = tmp.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    let db_path = tmp.path().join("pos.duckdb");

    write(&migrations, "0001_a.sql", "CREATE TABLE shifts (id INT)");
    write(
        &migrations,
        "0002_b.sql",
        "CREATE TABLE tills (id INT)\nGO\nINSERT INTO tills VALUES ('not a number')",
    );

    let runner = MigrationRunner::new(&MigrationsConfig::default()).unwrap();
    {
        let db = open(&db_path);
        let err = runner.run(&db, &migrations).unwrap_err();
        assert!(matches!(err, MigrateError::BatchExecution { batch: 2, .. }));
        assert!(err.to_string().contains("0002_b.sql"));
    }

    write(
        &migrations,
        "0002_b.sql",
        "CREATE TABLE tills (id INT)\nGO\nINSERT INTO tills VALUES (1)",
    );
    let db = open(&db_path);
    let statuses = runner.status(&db, &migrations).unwrap();
    assert_eq!(statuses[0].state, MigrationState::Applied);
    assert_eq!(statuses[1].state, MigrationState::Pending);

    let report = runner.run(&db, &migrations).unwrap();
    assert_eq!(report.applied, vec!["0002_b.sql"]);
    assert_eq!(scalar(&db, "SELECT COUNT(*) FROM tills"), "1");
}

#[test]
fn scaffolded_migration_is_picked_up() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("till.yml"), "name: corner_store\n").unwrap();
    let config = Config::load_from_dir(tmp.path()).unwrap();
    let migrations = config.migrations_path_absolute(tmp.path());

    let path = create_migration(
        &migrations,
        "customers",
        &config.migrations.extension,
        &config.migrations.separator,
    )
    .unwrap();
    let template = fs::read_to_string(&path).unwrap();
    fs::write(
        &path,
        format!("{template}CREATE TABLE customers (id INT, credit DECIMAL(10,2))\n"),
    )
    .unwrap();

    let db = DuckDbBackend::in_memory().unwrap();
    let runner = MigrationRunner::new(&config.migrations).unwrap();
    let report = runner.run(&db, &migrations).unwrap();
    assert_eq!(report.applied, vec!["0001_customers.sql"]);
    assert!(db.relation_exists("customers").unwrap());
}
