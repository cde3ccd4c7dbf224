//! The `navguard` binary, end to end.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test_config.yaml")
}

/// A `navguard` command with its data directory in a scratch location.
fn navguard(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("navguard").unwrap();
    cmd.env("NAVGUARD_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("NAVGUARD_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_check_fixture() {
    let home = TempDir::new().unwrap();
    navguard(&home)
        .arg("check")
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"))
        .stdout(predicate::str::contains("test-shell"));
}

#[test]
fn test_check_rejects_url_as_domain() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.yaml");
    std::fs::write(
        &config,
        "site_url: https://oliva.church/\nowned_domain: https://oliva.church\n",
    )
    .unwrap();

    navguard(&home)
        .arg("check")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bare hostname"));
}

#[test]
fn test_classify_reports_verdicts() {
    let home = TempDir::new().unwrap();
    navguard(&home)
        .arg("classify")
        .arg("--config")
        .arg(fixture())
        .args([
            "https://oliva.church/giving",
            "https://youtube.com/watch?v=x",
            "javascript:alert(1)",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("stays in the app"))
        .stdout(predicate::str::contains("opens outside the app"))
        .stdout(predicate::str::contains("rejected"));
}

#[test]
fn test_classify_with_non_user_trigger() {
    let home = TempDir::new().unwrap();
    navguard(&home)
        .args(["classify", "--trigger", "other", "--config"])
        .arg(fixture())
        .arg("https://youtube.com/")
        .assert()
        .success()
        .stdout(predicate::str::contains("left to the view"));
}

#[test]
fn test_init_writes_loadable_config() {
    let home = TempDir::new().unwrap();
    let output = home.path().join("shell.yaml");

    navguard(&home)
        .args(["init", "--domain", "example.org", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    navguard(&home).arg("check").arg(&output).assert().success();
}

#[test]
fn test_serve_stdio_then_log() {
    let home = TempDir::new().unwrap();

    navguard(&home)
        .args(["serve", "--config"])
        .arg(fixture())
        .write_stdin(
            "{\"event\":\"navigation\",\"url\":\"https://youtube.com/\",\"navigation_type\":\"click\"}\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("{\"command\":\"load\""))
        .stdout(predicate::str::contains("{\"command\":\"decision\",\"allow\":false}"))
        .stdout(predicate::str::contains("{\"command\":\"open_external\",\"url\":\"https://youtube.com/\"}"));

    navguard(&home)
        .args(["log", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("test-shell"));

    navguard(&home)
        .args(["log", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded sessions"));
}

#[test]
fn test_print_script() {
    let home = TempDir::new().unwrap();
    navguard(&home)
        .args(["serve", "--print-script"])
        .assert()
        .success()
        .stdout(predicate::str::contains("openLink"));
}
