//! Tests for LedgerStore provisioning, ordering and appends.

use super::*;
use chrono::NaiveDate;
use sv_core::{PreRelease, ReleaseNotes, Version};

// ── Helpers ────────────────────────────────────────────────────────────

fn store() -> LedgerStore {
    let store = LedgerStore::new(LedgerDb::open_memory().unwrap(), "deployments").unwrap();
    store.create().unwrap();
    store
}

fn at(day: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn record(name: &str, version: (u64, u64, u64), day: u32) -> NewDeploymentRecord {
    let mut r = NewDeploymentRecord::new(
        DeploymentName::new(name),
        Version::new(version.0, version.1, version.2),
    );
    r.deployed_at = at(day);
    r
}

fn names(list: &[DeploymentName]) -> Vec<&str> {
    list.iter().map(|n| n.as_str()).collect()
}

// ── Provisioning ───────────────────────────────────────────────────────

#[test]
fn exists_false_before_create() {
    let store = LedgerStore::new(LedgerDb::open_memory().unwrap(), "deployments").unwrap();
    assert!(!store.exists().unwrap());
    store.create().unwrap();
    assert!(store.exists().unwrap());
}

#[test]
fn create_twice_is_schema_error() {
    let store = store();
    assert!(matches!(store.create(), Err(LedgerError::Schema(_))));
}

#[test]
fn invalid_table_name_rejected() {
    let result = LedgerStore::new(LedgerDb::open_memory().unwrap(), "bad name");
    assert!(matches!(result, Err(LedgerError::Schema(_))));
}

#[test]
fn custom_table_name() {
    let store = LedgerStore::new(LedgerDb::open_memory().unwrap(), "release_log").unwrap();
    store.create().unwrap();
    store.append(&record("a", (1, 0, 0), 1)).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.table(), "release_log");
}

// ── Append ─────────────────────────────────────────────────────────────

#[test]
fn append_and_read_back_all_fields() {
    let store = store();
    let mut r = record("add_users", (2, 1, 0), 3);
    r.pre_release = Some(PreRelease::parse("alpha").unwrap());
    r.build = Some("8752f75".to_string());
    r.release_notes = ReleaseNotes::from_lines(["Users table"]);
    store.append(&r).unwrap();

    let latest = store.latest().unwrap().unwrap();
    assert_eq!(latest.deployment, "add_users");
    assert_eq!(latest.version, Version::new(2, 1, 0));
    assert_eq!(latest.pre_release.as_deref(), Some("alpha"));
    assert_eq!(latest.build.as_deref(), Some("8752f75"));
    assert_eq!(latest.release_notes, ReleaseNotes::from_lines(["Users table"]));
    assert_eq!(latest.deployed_at, Some(at(3)));
    assert_eq!(latest.release(), "2.1.0-alpha");
    assert!(latest.id >= 1);
}

#[test]
fn append_duplicate_rejected() {
    let store = store();
    store.append(&record("a", (1, 0, 0), 1)).unwrap();
    let err = store.append(&record("a", (1, 0, 1), 2)).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateDeployment(ref n) if n == "a"));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn unique_constraint_enforced_by_table() {
    let store = store();
    store.append(&record("a", (1, 0, 0), 1)).unwrap();
    let raw_insert = store.db().conn().execute(
        "INSERT INTO deployments (deployment, version, release_notes) VALUES ('a', '9.9.9', '[]')",
        [],
    );
    assert!(raw_insert.is_err());
}

#[test]
fn append_without_table_fails() {
    let store = LedgerStore::new(LedgerDb::open_memory().unwrap(), "deployments").unwrap();
    assert!(store.append(&record("a", (1, 0, 0), 1)).is_err());
}

#[test]
fn ids_increment() {
    let store = store();
    store.append(&record("a", (1, 0, 0), 1)).unwrap();
    store.append(&record("b", (1, 0, 1), 2)).unwrap();
    let all = store.all(RecordFilter::All).unwrap();
    assert!(all[0].id > all[1].id);
}

// ── Queries ────────────────────────────────────────────────────────────

#[test]
fn latest_empty_is_none() {
    assert!(store().latest().unwrap().is_none());
}

#[test]
fn latest_uses_semantic_ordering() {
    let store = store();
    store.append(&record("nine", (9, 0, 0), 1)).unwrap();
    store.append(&record("ten", (10, 0, 0), 2)).unwrap();
    store.append(&record("two", (2, 0, 0), 3)).unwrap();
    assert_eq!(store.latest().unwrap().unwrap().deployment, "ten");
}

#[test]
fn latest_tie_broken_by_identifier_descending() {
    let store = store();
    store.append(&record("alpha", (1, 0, 0), 1)).unwrap();
    store.append(&record("beta", (1, 0, 0), 1)).unwrap();
    assert_eq!(store.latest().unwrap().unwrap().deployment, "beta");
}

#[test]
fn ran_ordered_by_version_desc_then_identifier_asc() {
    let store = store();
    store.append(&record("c", (1, 0, 0), 1)).unwrap();
    store.append(&record("b", (2, 0, 0), 2)).unwrap();
    store.append(&record("a", (2, 0, 0), 2)).unwrap();
    assert_eq!(names(&store.ran().unwrap()), vec!["a", "b", "c"]);
}

#[test]
fn all_ordering() {
    let store = store();
    store.append(&record("one", (1, 0, 0), 1)).unwrap();
    store.append(&record("one_one", (1, 1, 0), 2)).unwrap();
    store.append(&record("two", (2, 0, 0), 3)).unwrap();
    store.append(&record("two_again", (2, 0, 0), 4)).unwrap();

    let all = store.all(RecordFilter::All).unwrap();
    let order: Vec<&str> = all.iter().map(|r| r.deployment.as_str()).collect();
    assert_eq!(order, vec!["two_again", "two", "one_one", "one"]);
}

#[test]
fn all_filters() {
    let store = store();
    store.append(&record("a", (1, 0, 0), 1)).unwrap();
    store.append(&record("b", (1, 1, 0), 2)).unwrap();
    store.append(&record("c", (1, 1, 1), 3)).unwrap();
    store.append(&record("d", (2, 0, 0), 4)).unwrap();

    assert_eq!(store.all(RecordFilter::Major(1)).unwrap().len(), 3);
    assert_eq!(store.all(RecordFilter::MajorMinor(1, 1)).unwrap().len(), 2);
    assert_eq!(store.all(RecordFilter::Major(2)).unwrap().len(), 1);
    assert!(store.all(RecordFilter::Major(3)).unwrap().is_empty());
}

#[test]
fn malformed_stored_version_read_leniently() {
    let store = store();
    store
        .db()
        .conn()
        .execute(
            "INSERT INTO deployments (deployment, version, release_notes) VALUES ('hand_edit', '3.x', 'oops')",
            [],
        )
        .unwrap();
    let latest = store.latest().unwrap().unwrap();
    assert_eq!(latest.version, Version::new(3, 0, 0));
    assert_eq!(latest.release_notes.value(), &serde_json::json!("oops"));
    assert!(latest.deployed_at.is_none());
}

#[test]
fn contains_and_count() {
    let store = store();
    assert_eq!(store.count().unwrap(), 0);
    store.append(&record("a", (0, 0, 1), 1)).unwrap();
    assert!(store.contains(&DeploymentName::new("a")).unwrap());
    assert!(!store.contains(&DeploymentName::new("b")).unwrap());
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn append_without_table_is_query_error() {
    let store = LedgerStore::new(LedgerDb::open_memory().unwrap(), "deployments").unwrap();
    let err = store.append(&record("a", (1, 0, 0), 1)).unwrap_err();
    assert!(matches!(err, LedgerError::Query(_)), "{err}");
}

// ── Failure classification ─────────────────────────────────────────────

#[test]
fn connection_failures_surface_as_store_unavailable() {
    let name = DeploymentName::new("a");
    for msg in [
        "Connection Error: Connection already closed!",
        "IO Error: Could not write file \"shipver.duckdb\": No space left on device",
        "FATAL Error: Failed: database has been invalidated because of a previous fatal error",
        "Invalid Input Error: database has been invalidated",
    ] {
        let err = classify_failure("insert deployment record", msg, &name);
        assert!(matches!(err, LedgerError::StoreUnavailable(_)), "{msg}");
    }
}

#[test]
fn constraint_failures_surface_as_duplicate() {
    let err = classify_failure(
        "insert deployment record",
        "Constraint Error: Duplicate key \"deployment: a\" violates unique constraint",
        &DeploymentName::new("a"),
    );
    assert!(matches!(err, LedgerError::DuplicateDeployment(ref n) if n == "a"));
}

#[test]
fn statement_failures_surface_as_query() {
    let err = classify_failure(
        "insert deployment record",
        "Catalog Error: Table with name deployments does not exist!",
        &DeploymentName::new("a"),
    );
    assert!(matches!(err, LedgerError::Query(ref m) if m.starts_with("insert deployment record")));
}
