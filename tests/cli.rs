use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary home directory
fn temp_home_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp dir
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".beer-analytics").join("config.json")
}

const BINARY_NAME: &str = "beer-analytics";

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Command-line arguments"))
        .stdout(contains("analyze"))
        .stdout(contains("reset"));
}

#[test]
/// Reset should drop the saved analysis and keep the other settings.
fn reset_forgets_saved_analysis() {
    let tmp = temp_home_dir();
    let config_path = config_file_path(&tmp);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(
        &config_path,
        r#"{"telemetry": false, "last_analysis": "hops=citra&ibu=10%2C50"}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("reset")
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Forgetting the saved analysis"));

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(!saved.contains("last_analysis"));
    assert!(saved.contains("\"telemetry\": false"));
}

#[test]
/// Reset without any config file is a no-op.
fn reset_without_config_succeeds() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("reset").env("HOME", tmp.path()).assert().success();
    assert!(!config_file_path(&tmp).exists());
}

#[test]
/// The analyzer cannot start when the site is unreachable.
fn headless_analyze_fails_without_site() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["analyze", "--headless", "--base-url", "http://127.0.0.1:9"])
        .env("HOME", tmp.path())
        .env("BEER_ANALYTICS_ENVIRONMENT", "local")
        .assert()
        .failure()
        .stdout(contains("Failed to load the analyzer entities"));
}

#[test]
/// Malformed base URLs are rejected before anything is requested.
fn invalid_base_url_is_rejected() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["recipes", "/recipes", "--base-url", "localhost"])
        .env("HOME", tmp.path())
        .assert()
        .failure()
        .stderr(contains("InvalidBaseUrl"));
}
