//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

/// Binary isolated from any developer `.env` files.
fn brainag() -> Command {
    let mut cmd = Command::cargo_bin("brainag").unwrap();
    let scratch = std::env::temp_dir();
    cmd.current_dir(&scratch)
        .env("HOME", &scratch)
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    brainag()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("seed"));
}

#[test]
fn test_serve_help() {
    brainag()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--max-connections"))
        .stdout(predicate::str::contains("127.0.0.1:3030"));
}

#[test]
fn test_seed_help() {
    brainag()
        .args(["seed", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--reset"));
}

#[test]
fn test_completions_bash() {
    brainag()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brainag"));
}

#[test]
fn test_serve_requires_database_url() {
    brainag()
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_migrate_requires_database_url() {
    brainag()
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_serve_rejects_bad_bind_address() {
    brainag()
        .args(["serve", "--bind", "not-an-address"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bind"));
}
