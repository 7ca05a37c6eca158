use super::*;
use std::fs;
use tempfile::tempdir;

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "bump: patch\n").unwrap();
    path
}

fn names(files: &[DeploymentFile]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn test_from_path_strips_timestamp_and_extension() {
    let file = DeploymentFile::from_path(Path::new("/x/2020_01_02_030405_add_users.yml")).unwrap();
    assert_eq!(file.name, "add_users");
    assert_eq!(file.file_name, "2020_01_02_030405_add_users.yml");
    assert_eq!(
        file.created_at.format(TIMESTAMP_FORMAT).to_string(),
        "2020_01_02_030405"
    );
}

#[test]
fn test_from_path_rejects_missing_timestamp() {
    let err = DeploymentFile::from_path(Path::new("add_users.yml")).unwrap_err();
    assert!(matches!(err, CoreError::InvalidDeploymentFile { .. }));
}

#[test]
fn test_from_path_rejects_impossible_date() {
    let err = DeploymentFile::from_path(Path::new("2020_13_45_000000_bad.yml")).unwrap_err();
    assert!(matches!(err, CoreError::InvalidDeploymentFile { .. }));
}

#[test]
fn test_deployment_name_helper() {
    let name = deployment_name(Path::new("2021_06_01_000000_fix-login.yaml")).unwrap();
    assert_eq!(name, "fix-login");
}

#[test]
fn test_discover_orders_chronologically() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2020_01_02_000000_b.yml");
    touch(dir.path(), "2020_01_01_000000_a.yml");
    touch(dir.path(), "2019_12_31_235959_z.yaml");

    let files = discover(&[dir.path()]).unwrap();
    assert_eq!(names(&files), vec!["z", "a", "b"]);
}

#[test]
fn test_discover_ignores_other_extensions() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2020_01_01_000000_a.yml");
    touch(dir.path(), "2020_01_01_000000_notes.txt");
    touch(dir.path(), "README.md");

    let files = discover(&[dir.path()]).unwrap();
    assert_eq!(names(&files), vec!["a"]);
}

#[test]
fn test_discover_missing_directory_is_empty() {
    let dir = tempdir().unwrap();
    let files = discover(&[dir.path().join("nope")]).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_discover_merges_multiple_paths() {
    let one = tempdir().unwrap();
    let two = tempdir().unwrap();
    touch(one.path(), "2020_01_03_000000_c.yml");
    touch(two.path(), "2020_01_01_000000_a.yml");

    let files = discover(&[one.path(), two.path()]).unwrap();
    assert_eq!(names(&files), vec!["a", "c"]);
}

#[test]
fn test_discover_rejects_duplicate_identifier() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2020_01_01_000000_same.yml");
    touch(dir.path(), "2020_02_01_000000_same.yml");

    let err = discover(&[dir.path()]).unwrap_err();
    match err {
        CoreError::DuplicateIdentifier { name, first, .. } => {
            assert_eq!(name, "same");
            assert!(first.contains("2020_01_01"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_discover_rejects_malformed_name() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "not_a_deployment.yml");
    assert!(discover(&[dir.path()]).is_err());
}

#[test]
fn test_pending_preserves_order() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2020_01_01_000000_a.yml");
    touch(dir.path(), "2020_01_02_000000_b.yml");
    touch(dir.path(), "2020_01_03_000000_c.yml");
    let files = discover(&[dir.path()]).unwrap();

    let all = pending(&files, &Vec::<DeploymentName>::new());
    assert_eq!(names(&all), vec!["a", "b", "c"]);

    let ran = [DeploymentName::new("b")];
    let rest = pending(&files, &ran);
    assert_eq!(names(&rest), vec!["a", "c"]);
}

#[test]
fn test_pending_ignores_unknown_ran_entries() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2020_01_01_000000_a.yml");
    let files = discover(&[dir.path()]).unwrap();

    let ran = [DeploymentName::new("removed_long_ago")];
    assert_eq!(names(&pending(&files, &ran)), vec!["a"]);
}
