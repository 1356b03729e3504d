//! End-to-end tests for the `linesift` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn linesift() -> Command {
    Command::cargo_bin("linesift").unwrap()
}

#[test]
fn test_contains_and_uppercase() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.txt");
    let dest = dir.path().join("out.txt");
    fs::write(&src, "ab\nc\nabc\n").unwrap();

    linesift()
        .arg(&src)
        .arg(&dest)
        .args(["--contains", "a", "--case", "upper", "--ordered"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 lines read, 2 accepted"));

    assert_eq!(fs::read_to_string(&dest).unwrap(), "AB\nABC\n");
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.txt");
    let dest = dir.path().join("out.txt");
    fs::write(&src, "keep\n\n  keep  \ndrop\n").unwrap();

    let output = linesift()
        .arg(&src)
        .arg(&dest)
        .args(["--trim", "--skip-empty", "-x", "drop", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["lines_read"], 4);
    assert_eq!(report["lines_written"], 2);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "keep\nkeep\n");
}

#[test]
fn test_missing_source_fails() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("out.txt");

    linesift()
        .arg(dir.path().join("missing.txt"))
        .arg(&dest)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to open source file"));

    assert!(!dest.exists());
}

#[test]
fn test_zero_queue_capacity_fails_before_io() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.txt");
    let dest = dir.path().join("out.txt");
    fs::write(&src, "a\n").unwrap();

    linesift()
        .arg(&src)
        .arg(&dest)
        .args(["--queue-capacity", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("queue_capacity must be greater than 0"));

    assert!(!dest.exists());
}

#[test]
fn test_config_file_is_applied() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.txt");
    let dest = dir.path().join("out.txt");
    let config = dir.path().join("linesift.toml");
    let source: String = (0..200).map(|i| format!("{}\n", i)).collect();
    fs::write(&src, &source).unwrap();
    fs::write(&config, "workers = 4\nqueue_capacity = 2\noutput_order = \"preserve\"\n").unwrap();

    linesift()
        .arg(&src)
        .arg(&dest)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&dest).unwrap(), source);
}
