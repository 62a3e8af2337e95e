//! Argument parsing, validation and exit codes.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

pub fn movpn() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("movpn"));
    cmd.env("NO_COLOR", "1")
        .env("MOVPN_CONFIG", "/nonexistent/movpn-test/config.yaml")
        .env_remove("MOVPN_HOST")
        .env_remove("MOVPN_PASSWORD")
        .env_remove("MOVPN_YES")
        .env_remove("CI")
        .write_stdin("");
    cmd
}

#[test]
fn test_help_lists_setup_flag() {
    movpn()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--setup"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_version_flag_shows_version() {
    movpn()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("movpn"));
}

#[test]
fn test_unknown_setup_is_a_usage_error() {
    movpn()
        .args(["--setup", "wireguard"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_serve_with_host_is_a_usage_error() {
    movpn()
        .args(["--serve", "--host", "203.0.113.7"])
        .assert()
        .code(2);
}

#[test]
fn test_non_interactive_without_setup_fails() {
    movpn()
        .arg("--yes")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("setup is required"));
}

#[test]
fn test_ci_env_implies_non_interactive() {
    movpn()
        .env("CI", "true")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("setup is required"));
}

#[test]
fn test_invalid_email_fails_before_any_step() {
    movpn()
        .args(["-y", "--setup", "vless", "--domain", "example.com", "--email", "admin.example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("email invalid"))
        .stdout(predicate::str::contains("→").not());
}

#[test]
fn test_empty_domain_fails_before_any_step() {
    movpn()
        .args(["-y", "--setup", "vless", "--domain", "", "--email", "a@b.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("domain invalid"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_invalid_client_name_fails() {
    movpn()
        .args(["-y", "--setup", "add_openvpn_user", "--clients", "alice;rm -rf /"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid client name"));
}
