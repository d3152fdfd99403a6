//! Artifact store lifecycle on a temp directory.

use std::fs;

use chrono::{TimeDelta, Utc};
use pharm_report::{ArtifactStore, ReportError, Token, sha256_hex};
use tempfile::TempDir;

fn files() -> Vec<(String, Vec<u8>)> {
    vec![
        ("a.xlsx".to_string(), b"first".to_vec()),
        ("b.xlsx".to_string(), b"second".to_vec()),
    ]
}

#[test]
fn put_then_get_returns_verified_path() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();

    let token = store.put("supply-gapji", &files()).unwrap();
    let path = store.get(token, "b.xlsx").unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"second");

    let manifest = store.manifest(token).unwrap();
    assert_eq!(manifest.kind, "supply-gapji");
    assert_eq!(manifest.files.len(), 2);
    assert_eq!(manifest.files[0].size, 5);
    assert_eq!(manifest.files[0].sha256, sha256_hex(b"first"));
    assert!(dir.path().join(token.to_string()).join("manifest.json").is_file());
}

#[test]
fn submissions_do_not_overwrite_each_other() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();

    let first = store.put("shortage", &[("r.xlsx".to_string(), b"one".to_vec())]).unwrap();
    let second = store.put("shortage", &[("r.xlsx".to_string(), b"two".to_vec())]).unwrap();
    assert_ne!(first, second);
    assert_eq!(fs::read(store.get(first, "r.xlsx").unwrap()).unwrap(), b"one");
    assert_eq!(fs::read(store.get(second, "r.xlsx").unwrap()).unwrap(), b"two");
    assert_eq!(store.list().len(), 2);
}

#[test]
fn reopened_store_sees_previous_submissions() {
    let dir = TempDir::new().unwrap();
    let token = {
        let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();
        store.put("shortage", &files()).unwrap()
    };
    let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();
    assert!(store.get(token, "a.xlsx").is_ok());
}

#[test]
fn unknown_token_and_file() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();
    let token = store.put("shortage", &files()).unwrap();

    let stranger: Token = "00000000-0000-4000-8000-000000000000".parse().unwrap();
    assert!(matches!(store.get(stranger, "a.xlsx"), Err(ReportError::UnknownToken { .. })));
    assert!(matches!(store.get(token, "c.xlsx"), Err(ReportError::UnknownFile { .. })));
}

#[test]
fn tampered_file_fails_checksum() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();
    let token = store.put("shortage", &files()).unwrap();

    let path = dir.path().join(token.to_string()).join("a.xlsx");
    fs::write(&path, b"changed").unwrap();
    assert!(matches!(
        store.get(token, "a.xlsx"),
        Err(ReportError::ChecksumMismatch { .. })
    ));
}

#[test]
fn expired_submissions_are_refused_and_swept() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();
    let token = store.put("shortage", &files()).unwrap();

    assert_eq!(store.sweep(Utc::now()).unwrap(), 0);
    let later = Utc::now() + TimeDelta::hours(2);
    assert_eq!(store.sweep(later).unwrap(), 1);
    assert!(!dir.path().join(token.to_string()).exists());
    assert!(matches!(store.get(token, "a.xlsx"), Err(ReportError::UnknownToken { .. })));

    let instant = ArtifactStore::open(dir.path(), TimeDelta::zero()).unwrap();
    let token = instant.put("shortage", &files()).unwrap();
    assert!(matches!(instant.get(token, "a.xlsx"), Err(ReportError::Expired { .. })));
    assert!(instant.list().is_empty());
}

#[test]
fn path_like_names_are_rejected() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();
    let result = store.put("shortage", &[("../x.xlsx".to_string(), Vec::new())]);
    assert!(matches!(result, Err(ReportError::InvalidName { .. })));
}

fn entry_count(dir: &std::path::Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn failed_put_leaves_no_directory_behind() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();

    let too_long = format!("{}.xlsx", "x".repeat(300));
    let result = store.put(
        "shortage",
        &[
            ("ok.xlsx".to_string(), b"fine".to_vec()),
            (too_long, b"unwritable".to_vec()),
        ],
    );
    assert!(matches!(result, Err(ReportError::Io { .. })));
    assert_eq!(entry_count(dir.path()), 0);
    assert!(store.list().is_empty());
}

#[test]
fn sweep_removes_stale_directories_without_manifest() {
    let dir = TempDir::new().unwrap();
    let orphan = dir.path().join("0b6d5f1e-4c2a-4e8b-9a57-3f1c2d4e5f60");
    fs::create_dir(&orphan).unwrap();
    fs::write(orphan.join("ok.xlsx"), b"partial").unwrap();
    fs::create_dir(dir.path().join("notes")).unwrap();

    let store = ArtifactStore::open(dir.path(), TimeDelta::hours(1)).unwrap();
    assert!(store.list().is_empty());

    assert_eq!(store.sweep(Utc::now()).unwrap(), 0);
    assert!(orphan.exists());

    let later = Utc::now() + TimeDelta::hours(2);
    assert_eq!(store.sweep(later).unwrap(), 1);
    assert!(!orphan.exists());
    assert!(dir.path().join("notes").is_dir());
}
