//! Tests for LedgerDb connection handling and transactions.

use crate::{LedgerDb, LedgerError, LedgerResult};

fn count(db: &LedgerDb, sql: &str) -> i64 {
    db.conn()
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .unwrap()
}

#[test]
fn open_memory_succeeds() {
    let db = LedgerDb::open_memory().unwrap();
    db.ping().unwrap();
    assert!(db.supports_schema_transactions());
}

#[test]
fn new_handles_memory_path() {
    let db = LedgerDb::new(":memory:").unwrap();
    db.ping().unwrap();
}

#[test]
fn open_file_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.duckdb");
    assert!(!path.exists());
    let _db = LedgerDb::open(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn open_in_missing_directory_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/ledger.duckdb");
    assert!(matches!(
        LedgerDb::open(&path),
        Err(LedgerError::StoreUnavailable(_))
    ));
}

#[test]
fn schema_transactions_can_be_disabled() {
    let db = LedgerDb::open_memory()
        .unwrap()
        .with_schema_transactions(false);
    assert!(!db.supports_schema_transactions());
}

#[test]
fn transaction_commits_on_success() {
    let db = LedgerDb::open_memory().unwrap();
    db.conn().execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let result: LedgerResult<()> = db.transaction(|conn| {
        conn.execute("INSERT INTO t VALUES (1)", [])?;
        Ok(())
    });
    result.unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 1);
}

#[test]
fn transaction_rolls_back_on_error() {
    let db = LedgerDb::open_memory().unwrap();
    db.conn().execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let result: LedgerResult<()> = db.transaction(|conn| {
        conn.execute("INSERT INTO t VALUES (1)", [])?;
        Err(LedgerError::Query("boom".to_string()))
    });
    assert!(result.is_err());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 0);
}

#[test]
fn transaction_rolls_back_ddl() {
    let db = LedgerDb::open_memory().unwrap();

    let result: LedgerResult<()> = db.transaction(|conn| {
        conn.execute_batch("CREATE TABLE created_inside (id INTEGER)")?;
        Err(LedgerError::Query("boom".to_string()))
    });
    assert!(result.is_err());
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'created_inside'"
        ),
        0
    );
}

#[test]
fn connection_usable_after_rollback() {
    let db = LedgerDb::open_memory().unwrap();
    let _: LedgerResult<()> = db.transaction(|_| Err(LedgerError::Query("boom".to_string())));
    db.ping().unwrap();
    let ok: LedgerResult<i32> = db.transaction(|_| Ok(7));
    assert_eq!(ok.unwrap(), 7);
}
