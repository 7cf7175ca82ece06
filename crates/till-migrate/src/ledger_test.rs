use super::*;
use till_db::test_utils::ScriptedDb;
use till_db::DuckDbBackend;

fn ledger() -> Ledger {
    Ledger::new("till_migrations").unwrap()
}

fn record(db: &DuckDbBackend, ledger: &Ledger, filename: &str) -> MigrateResult<()> {
    let mut tx = db.begin().unwrap();
    let result = ledger.record_applied(&mut tx, filename, "abc123");
    match result {
        Ok(()) => tx.commit().unwrap(),
        Err(_) => tx.rollback().unwrap(),
    }
    result
}

#[test]
fn rejects_invalid_table_names() {
    assert!(matches!(
        Ledger::new("drop table x").unwrap_err(),
        MigrateError::InvalidLedgerTable(_)
    ));
    assert!(Ledger::new("ops.till_migrations").is_ok());
}

#[test]
fn ensure_schema_creates_table_once() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = ledger();
    assert!(!db.relation_exists("till_migrations").unwrap());

    ledger.ensure_schema(&db).unwrap();
    assert!(db.relation_exists("till_migrations").unwrap());

    record(&db, &ledger, "0001_init.sql").unwrap();
    // Second call must not recreate (and so not empty) the table.
    ledger.ensure_schema(&db).unwrap();
    assert_eq!(ledger.load_applied(&db).unwrap().len(), 1);
}

#[test]
fn ensure_schema_skips_ddl_when_table_exists() {
    let db = ScriptedDb::new().with_relation("till_migrations");
    ledger().ensure_schema(&db).unwrap();
    assert!(db.log().is_empty(), "unexpected statements: {:?}", db.log());
}

#[test]
fn ensure_schema_creates_schema_for_qualified_name() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new("ops.applied_scripts").unwrap();
    ledger.ensure_schema(&db).unwrap();
    assert!(db.relation_exists("ops.applied_scripts").unwrap());
}

#[test]
fn load_applied_on_empty_ledger() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = ledger();
    ledger.ensure_schema(&db).unwrap();
    assert!(ledger.load_applied(&db).unwrap().is_empty());
}

#[test]
fn record_and_load_applied() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = ledger();
    ledger.ensure_schema(&db).unwrap();

    record(&db, &ledger, "0002_b.sql").unwrap();
    record(&db, &ledger, "0001_a.sql").unwrap();

    let applied: Vec<String> = ledger.load_applied(&db).unwrap().into_iter().collect();
    assert_eq!(applied, vec!["0001_a.sql", "0002_b.sql"]);
}

#[test]
fn duplicate_filename_is_duplicate_migration() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = ledger();
    ledger.ensure_schema(&db).unwrap();

    record(&db, &ledger, "0001_a.sql").unwrap();
    let err = record(&db, &ledger, "0001_a.sql").unwrap_err();
    assert!(
        matches!(err, MigrateError::DuplicateMigration { ref filename } if filename == "0001_a.sql"),
        "unexpected error: {err}"
    );
    assert_eq!(ledger.load_applied(&db).unwrap().len(), 1);
}

#[test]
fn other_insert_failures_are_ledger_insert() {
    let db = ScriptedDb::new().fail_when_contains("INSERT INTO till_migrations");
    let mut tx = db.begin().unwrap();
    let err = ledger()
        .record_applied(&mut tx, "0001_a.sql", "abc")
        .unwrap_err();
    assert!(matches!(err, MigrateError::LedgerInsert { .. }));
}

#[test]
fn non_unique_constraint_failure_is_ledger_insert() {
    let db = DuckDbBackend::in_memory().unwrap();
    // A pre-existing ledger with an extra CHECK is left untouched by ensure_schema.
    db.execute_batch(
        "CREATE TABLE till_migrations (
             filename   VARCHAR NOT NULL UNIQUE,
             applied_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             checksum   VARCHAR CHECK (length(checksum) < 4)
         )",
    )
    .unwrap();
    let ledger = ledger();
    ledger.ensure_schema(&db).unwrap();

    let err = record(&db, &ledger, "0001_a.sql").unwrap_err();
    assert!(
        matches!(err, MigrateError::LedgerInsert { ref filename, .. } if filename == "0001_a.sql"),
        "unexpected error: {err}"
    );
}

#[test]
fn entries_carry_timestamp_and_checksum() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = ledger();
    ledger.ensure_schema(&db).unwrap();

    let before = Utc::now() - chrono::Duration::seconds(1);
    record(&db, &ledger, "0001_a.sql").unwrap();
    let after = Utc::now() + chrono::Duration::seconds(1);

    let entries = ledger.entries(&db).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].filename, "0001_a.sql");
    assert_eq!(entries[0].checksum.as_deref(), Some("abc123"));
    assert!(entries[0].applied_at >= before && entries[0].applied_at <= after);
}

#[test]
fn entries_accept_rows_without_checksum() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = ledger();
    ledger.ensure_schema(&db).unwrap();
    db.execute_batch(
        "INSERT INTO till_migrations (filename, applied_at) \
         VALUES ('0001_manual.sql', TIMESTAMP '2024-03-01 08:30:00')",
    )
    .unwrap();

    let entries = ledger.entries(&db).unwrap();
    assert_eq!(entries[0].checksum, None);
    assert_eq!(
        entries[0].applied_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2024-03-01 08:30:00"
    );
}

#[test]
fn malformed_timestamp_is_reported() {
    let db = ScriptedDb::new().with_rows(vec![vec![
        Some("0001_a.sql".to_string()),
        Some("yesterday".to_string()),
        None,
    ]]);
    let err = ledger().entries(&db).unwrap_err();
    assert!(matches!(err, MigrateError::MalformedLedgerRow(_)));
}

#[test]
fn query_failure_is_ledger_query() {
    let db = ScriptedDb::new().fail_when_contains("SELECT filename");
    assert!(matches!(
        ledger().load_applied(&db).unwrap_err(),
        MigrateError::LedgerQuery(_)
    ));
}
