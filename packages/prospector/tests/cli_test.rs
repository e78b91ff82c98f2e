//! Tests for the `prospector` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn prospector() -> Command {
    let mut cmd = Command::cargo_bin("prospector").unwrap();
    cmd.arg("--config").arg(fixture("website_config.json"));
    cmd
}

#[test]
fn test_mine_exports_csv() {
    let dir = tempdir().unwrap();

    prospector()
        .arg("--export-dir")
        .arg(dir.path())
        .args(["mine", "sample_forum_dates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Records: 4"));

    let csv = std::fs::read_to_string(dir.path().join("sample_forum_dates.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("id,name,date,body"));
    assert_eq!(csv.lines().count(), 5);
    assert!(csv.contains(",10/1/2000,"));
}

#[test]
fn test_mine_exports_json() {
    let dir = tempdir().unwrap();

    prospector()
        .arg("--export-dir")
        .arg(dir.path())
        .args(["mine", "sample_forum", "--format", "json"])
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("sample_forum.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(4));
}

#[test]
fn test_mine_unknown_site_fails() {
    let dir = tempdir().unwrap();

    prospector()
        .arg("--export-dir")
        .arg(dir.path())
        .args(["mine", "nonexistent_site"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nonexistent_site not found"));
}

#[test]
fn test_mine_base_site_fails() {
    let dir = tempdir().unwrap();

    prospector()
        .arg("--export-dir")
        .arg(dir.path())
        .args(["mine", "sample_forum_base"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing classifier"));
}

#[test]
fn test_run_mines_every_site() {
    let dir = tempdir().unwrap();

    prospector()
        .arg("--export-dir")
        .arg(dir.path())
        .arg("run")
        .arg(fixture("run.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("sample_forum_dates"));

    assert!(dir.path().join("sample_forum.csv").exists());
    assert!(dir.path().join("sample_forum_dates.json").exists());
}

#[test]
fn test_run_reports_failed_sites() {
    let dir = tempdir().unwrap();
    let run_file = dir.path().join("run.yml");
    std::fs::write(
        &run_file,
        "websites:\n  sample_forum:\n    filetype: html\n  sample_forum_base: {}\n",
    )
    .unwrap();

    prospector()
        .arg("--export-dir")
        .arg(dir.path())
        .arg("run")
        .arg(&run_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 sites failed"));

    assert!(dir.path().join("sample_forum.html").exists());
}
