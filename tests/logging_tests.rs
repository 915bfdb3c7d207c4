use predicates::prelude::*;
use tempfile::tempdir;

mod test_helpers;
use test_helpers::happyday_command;

#[test]
fn test_default_level_hides_debug() {
    let dir = tempdir().unwrap();
    happyday_command(dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stderr(predicate::str::contains("Starting happyday"))
        .stderr(predicate::str::contains("CLI arguments").not());
}

#[test]
fn test_verbose_enables_debug() {
    let dir = tempdir().unwrap();
    happyday_command(dir.path())
        .args(["--verbose", "whoami"])
        .assert()
        .success()
        .stderr(predicate::str::contains("CLI arguments"));
}

#[test]
fn test_rust_log_overrides_log_level() {
    let dir = tempdir().unwrap();
    happyday_command(dir.path())
        .args(["--log-level", "debug", "whoami"])
        .env("RUST_LOG", "error")
        .assert()
        .success()
        .stderr(predicate::str::contains("Starting happyday").not());
}

#[test]
fn test_config_debug_output_is_redacted() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().to_string_lossy().to_string();
    happyday_command(dir.path())
        .args(["--verbose", "whoami"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[REDACTED]"))
        .stderr(predicate::str::contains(format!("data_dir: \"{}\"", data_dir)).not());
}

#[test]
fn test_json_lines_carry_invocation_id() {
    let dir = tempdir().unwrap();
    let output = happyday_command(dir.path())
        .args(["--log-format", "json", "whoami"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let line = stderr
        .lines()
        .find(|line| line.contains("Starting happyday"))
        .unwrap();
    let record: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(record["span"]["name"], "app_invocation");
    assert!(record["span"]["invocation_id"].as_str().is_some());
    assert_eq!(record["span"]["service_name"], "happyday");
}
