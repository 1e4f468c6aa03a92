use std::fs;

use pq_readiness::{canonicalize_or_current, fmt_opt, fmt_ratio, sha256_file};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_resolves_existing_relative_path() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current("nested").expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_keeps_absolute_missing_path() {
    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("not-yet");
    let result = canonicalize_or_current(missing.to_str().unwrap()).expect("canonicalize");
    assert!(result.ends_with("not-yet"));
}

#[test]
fn sha256_file_matches_known_hash() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("abc.jsonl");
    fs::write(&path, b"abc").expect("write");
    assert_eq!(
        sha256_file(&path).expect("hash"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn sha256_file_errors_for_missing_file() {
    let tmp = tempdir().expect("tempdir");
    let err = sha256_file(&tmp.path().join("missing.jsonl")).unwrap_err();
    assert!(err.to_string().contains("Failed to open record store for hashing"));
}

#[test]
fn fmt_opt_renders_absence_as_dash() {
    assert_eq!(fmt_opt(Some(128)), "128");
    assert_eq!(fmt_opt(None), "-");
}

#[test]
fn fmt_ratio_uses_three_decimals() {
    assert_eq!(fmt_ratio(Some(23.4376)), "23.438");
    assert_eq!(fmt_ratio(None), "-");
}
