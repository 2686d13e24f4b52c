//! Smoke tests for the `bookstore` operator binary

use assert_cmd::Command;
use predicates::prelude::*;

fn bookstore(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bookstore").unwrap();
    cmd.env("BOOKSTORE_CONFIG_DIR", config_dir.path())
        .env_remove("BOOKSTORE_ENV")
        .env_remove("DB_HOST")
        .env_remove("DB_PORT")
        .env_remove("DB_USER")
        .env_remove("DB_NAME")
        .env_remove("DB_PASSWORD");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    bookstore(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("ping"))
        .stdout(predicate::str::contains("settings"));
}

#[test]
fn test_ping_help() {
    let dir = tempfile::tempdir().unwrap();
    bookstore(&dir)
        .args(["ping", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Number of ping attempts"));
}

#[test]
fn test_settings_shows_defaults() {
    let dir = tempfile::tempdir().unwrap();
    bookstore(&dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("localhost"))
        .stdout(predicate::str::contains("bookstore"))
        .stdout(predicate::str::contains("5432"));
}

#[test]
fn test_settings_redacts_password() {
    let dir = tempfile::tempdir().unwrap();
    bookstore(&dir)
        .arg("settings")
        .env("DB_PASSWORD", "correct-horse")
        .env("DB_HOST", "db.internal")
        .assert()
        .success()
        .stdout(predicate::str::contains("db.internal"))
        .stdout(predicate::str::contains("[REDACTED]"))
        .stdout(predicate::str::contains("correct-horse").not());
}

#[test]
fn test_unknown_environment_fails() {
    let dir = tempfile::tempdir().unwrap();
    bookstore(&dir)
        .arg("settings")
        .env("BOOKSTORE_ENV", "moon")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported environment"));
}
