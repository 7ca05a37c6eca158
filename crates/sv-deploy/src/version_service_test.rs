//! Tests for version rendering and release notes.

use super::*;
use chrono::NaiveDate;
use sv_core::PreRelease;
use sv_ledger::{LedgerDb, NewDeploymentRecord};

// ── Helpers ────────────────────────────────────────────────────────────

fn store() -> LedgerStore {
    let store = LedgerStore::new(LedgerDb::open_memory().unwrap(), "deployments").unwrap();
    store.create().unwrap();
    store
}

fn append(store: &LedgerStore, name: &str, version: (u64, u64, u64), day: u32, note: &str) {
    let mut record = NewDeploymentRecord::new(
        DeploymentName::new(name),
        Version::new(version.0, version.1, version.2),
    );
    record.deployed_at = NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    record.release_notes = ReleaseNotes::from_lines([note]);
    store.append(&record).unwrap();
}

fn service(store: &LedgerStore) -> VersionService<'_> {
    VersionService::new(store, StartingVersion::default(), "shop")
}

fn labels(entries: &[ReleaseEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.release.as_str()).collect()
}

// ── Rendering ──────────────────────────────────────────────────────────

#[test]
fn renders_all_formats() {
    let store = store();
    let mut record = NewDeploymentRecord::new(DeploymentName::new("beta"), Version::new(2, 1, 0));
    record.pre_release = Some(PreRelease::parse("alpha").unwrap());
    record.build = Some("8752f75".to_string());
    store.append(&record).unwrap();

    let svc = service(&store);
    assert_eq!(svc.render(VersionFormat::Release).unwrap(), "2.1.0-alpha");
    assert_eq!(svc.render(VersionFormat::Short).unwrap(), "v2.1.0-alpha");
    assert_eq!(svc.render(VersionFormat::Full).unwrap(), "v2.1.0-alpha+8752f75");
    assert_eq!(
        svc.render(VersionFormat::Long).unwrap(),
        "Version 2.1.0-alpha (build 8752f75)"
    );
    assert_eq!(svc.release().unwrap(), "2.1.0-alpha");
}

#[test]
fn missing_build_renders_empty() {
    let store = store();
    append(&store, "a", (1, 0, 0), 1, "first");
    let svc = service(&store);
    assert_eq!(svc.render(VersionFormat::Full).unwrap(), "v1.0.0+");
    assert_eq!(
        svc.render(VersionFormat::Long).unwrap(),
        "Version 1.0.0 (build )"
    );
}

#[test]
fn latest_is_highest_version() {
    let store = store();
    append(&store, "ten", (10, 0, 0), 1, "ten");
    append(&store, "nine", (9, 0, 0), 2, "nine");
    let svc = service(&store);
    assert_eq!(svc.release().unwrap(), "10.0.0");
    let date = svc.date().unwrap().unwrap();
    assert_eq!(date.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
}

#[test]
fn fallback_when_ledger_empty() {
    let store = store();
    let svc = VersionService::new(&store, "1.2.0-rc.1".parse().unwrap(), "shop");
    let info = svc.current().unwrap();
    assert!(info.is_fallback());
    assert_eq!(info.release(), "1.2.0-rc.1");
    let expected_build = short_hash("shop");
    assert_eq!(
        svc.render(VersionFormat::Full).unwrap(),
        format!("v1.2.0-rc.1+{expected_build}")
    );
    assert!(svc.date().unwrap().is_some());
}

#[test]
fn fallback_when_table_missing() {
    let store = LedgerStore::new(LedgerDb::open_memory().unwrap(), "deployments").unwrap();
    let svc = service(&store);
    assert_eq!(svc.render(VersionFormat::Short).unwrap(), "v0.0.0");
    assert!(!store.exists().unwrap());
}

#[test]
fn format_names_parse() {
    assert_eq!("long".parse::<VersionFormat>().unwrap(), VersionFormat::Long);
    assert!("verbose".parse::<VersionFormat>().is_err());
    assert_eq!("single".parse::<NotesLevel>().unwrap(), NotesLevel::Single);
    assert!("patch".parse::<NotesLevel>().is_err());
}

// ── Release notes ──────────────────────────────────────────────────────

fn history() -> LedgerStore {
    let store = store();
    append(&store, "a", (1, 0, 0), 1, "launch");
    append(&store, "b", (1, 1, 0), 2, "search");
    append(&store, "c", (2, 0, 0), 3, "redesign");
    append(&store, "d", (2, 0, 1), 4, "hotfix");
    append(&store, "e", (2, 1, 0), 5, "exports");
    store
}

#[test]
fn notes_all_levels() {
    let store = history();
    let svc = service(&store);

    let all = svc.release_notes(NotesLevel::All).unwrap();
    assert_eq!(labels(&all), vec!["2.1.0", "2.0.1", "2.0.0", "1.1.0", "1.0.0"]);

    let major = svc.release_notes(NotesLevel::Major).unwrap();
    assert_eq!(labels(&major), vec!["2.1.0", "2.0.1", "2.0.0"]);

    let minor = svc.release_notes(NotesLevel::Minor).unwrap();
    assert_eq!(labels(&minor), vec!["2.1.0"]);

    let single = svc.release_notes(NotesLevel::Single).unwrap();
    assert_eq!(labels(&single), vec!["2.1.0"]);
    assert_eq!(single[0].notes, ReleaseNotes::from_lines(["exports"]));
}

#[test]
fn notes_are_labelled_per_record() {
    let store = history();
    let svc = service(&store);
    let major = svc.release_notes(NotesLevel::Major).unwrap();
    assert_eq!(major[1].release, "2.0.1");
    assert_eq!(major[1].notes, ReleaseNotes::from_lines(["hotfix"]));
}

#[test]
fn notes_with_empty_ledger_return_fallback() {
    let store = store();
    let svc = service(&store);
    let notes = svc.release_notes(NotesLevel::Major).unwrap();
    assert_eq!(labels(&notes), vec!["0.0.0"]);
    assert!(notes[0].notes.is_empty());
}

#[test]
fn entries_serialize_to_json() {
    let store = history();
    let svc = service(&store);
    let single = svc.release_notes(NotesLevel::Single).unwrap();
    let json = serde_json::to_value(&single).unwrap();
    assert_eq!(json[0]["release"], "2.1.0");
    assert_eq!(json[0]["notes"][0], "exports");
}
