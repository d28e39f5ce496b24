use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::net::TcpListener;

const BINARY_NAME: &str = "shadow-realm-dash";

/// A local URL nothing is listening on.
fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Command-line arguments"));
}

#[test]
fn start_help_lists_backend_flags() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["start", "--help"])
        .assert()
        .success()
        .stdout(contains("--api-url"))
        .stdout(contains("--interval-secs"))
        .stdout(contains("--status-policy"))
        .stdout(contains("--headless"));
}

#[test]
/// A failed cycle makes `once` exit non-zero without printing JSON.
fn once_fails_when_backend_is_unreachable() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("once")
        .arg("--api-url")
        .arg(unreachable_url())
        .env("HOME", tmp.path()) // no config file
        .env_remove("SHADOW_REALM_API_URL")
        .assert()
        .failure()
        .stderr(contains("Refresh failed"));
}

#[test]
fn once_rejects_out_of_range_limit() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["once", "--limit", "0"])
        .env("HOME", tmp.path())
        .env_remove("SHADOW_REALM_API_URL")
        .assert()
        .failure()
        .stderr(contains("fetch limit must be between 1 and 1000"));
}

#[test]
fn once_rejects_unknown_status_policy() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["once", "--status-policy", "sometimes"])
        .assert()
        .failure()
        .stderr(contains("unknown status policy"));
}

#[test]
/// An unparsable config file is reported instead of silently ignored.
fn once_reports_invalid_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("config.json");
    fs::write(&config_path, "not json").unwrap();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("once")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(contains("Invalid config file"));
}

#[test]
/// `init-config` writes the merged settings so later runs pick them up.
fn init_config_writes_flags_to_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("nested").join("config.json");

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("init-config")
        .arg("--config")
        .arg(&config_path)
        .args(["--api-url", "https://realm.example.org", "--limit", "20"])
        .env_remove("SHADOW_REALM_API_URL")
        .assert()
        .success()
        .stdout(contains("Configuration saved"));

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("\"api_url\": \"https://realm.example.org\""));
    assert!(saved.contains("\"fetch_limit\": 20"));
    assert!(saved.contains("\"status_policy\": \"lenient\""));
}
