#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

pub const TEST_PASSWORD: &str = "password";

/// Creates a `Command` for the `happyday` binary with a clean, non-interactive
/// environment rooted at `data_dir`.
pub fn happyday_command(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("happyday").expect("happyday binary not built");
    configure_happyday_command(&mut cmd, data_dir);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_happyday_command(cmd: &mut Command, data_dir: &Path) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("HOME", data_dir)
        .env("HAPPYDAY_DIR", data_dir)
        .env("HAPPYDAY_AUTH_LATENCY_MS", "0")
        .env("HAPPYDAY_TEST_PASSWORD", TEST_PASSWORD);
}

/// Logs the demo user in for the data directory.
pub fn login_demo(data_dir: &Path) {
    happyday_command(data_dir)
        .args(["login", "demo"])
        .assert()
        .success();
}
