//! `--dry-run` prints the plan and never runs a step.

use predicates::prelude::*;

use crate::cli_tests::movpn;

#[test]
fn test_openvpn_plan_lists_phases_and_artifact() {
    movpn()
        .args(["-y", "--dry-run", "--setup", "openvpn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan: openvpn on local"))
        .stdout(predicate::str::contains("docker install:"))
        .stdout(predicate::str::contains("docker compose up -d"))
        .stdout(predicate::str::contains("ufw enable"))
        .stdout(predicate::str::contains("/root/configs/c1.ovpn"));
}

#[test]
fn test_add_users_plan_skips_installation() {
    movpn()
        .args(["-y", "--dry-run", "--setup", "add_openvpn_user", "--clients", "alice,bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/root/configs/alice.ovpn"))
        .stdout(predicate::str::contains("/root/configs/bob.ovpn"))
        .stdout(predicate::str::contains("apt-get").not())
        .stdout(predicate::str::contains("git clone").not())
        .stdout(predicate::str::contains("docker-ce").not());
}

#[test]
fn test_vless_plan_carries_domain_and_email() {
    movpn()
        .args([
            "-y",
            "--dry-run",
            "--setup",
            "vless",
            "--domain",
            "Example.com",
            "--email",
            "a@b.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("--issue -d example.com --standalone"))
        .stdout(predicate::str::contains("--register-account -m a@b.com"))
        .stdout(predicate::str::contains("ufw allow 54321"));
}

#[test]
fn test_serve_opens_serve_port() {
    movpn()
        .args(["-y", "--dry-run", "--setup", "openvpn", "--serve", "--serve-port", "8080"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ufw allow 8080/tcp"));
}

#[test]
fn test_remote_plan_names_target() {
    movpn()
        .args([
            "-y",
            "--dry-run",
            "--setup",
            "add_openvpn_user",
            "--host",
            "203.0.113.7",
            "--password",
            "hunter2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("on root@203.0.113.7"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_no_color_env_with_any_value_is_accepted() {
    for value in ["1", "true", "yes"] {
        movpn()
            .env("NO_COLOR", value)
            .args(["-y", "--dry-run", "--setup", "add_openvpn_user"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/root/configs/c1.ovpn"))
            .stdout(predicate::str::contains("\x1b[").not());
    }
}

#[test]
fn test_serve_with_vless_warns_and_opens_nothing() {
    movpn()
        .args([
            "-y",
            "--dry-run",
            "--setup",
            "vless",
            "--domain",
            "example.com",
            "--email",
            "a@b.com",
            "--serve",
            "--serve-port",
            "8080",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("--serve ignored"))
        .stdout(predicate::str::contains("ufw allow 8080").not());
}

#[test]
fn test_openvpn_plan_lists_relay_config() {
    movpn()
        .args(["-y", "--dry-run", "--setup", "openvpn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/root/configs/stunnel-client.conf (if present)"));
}
