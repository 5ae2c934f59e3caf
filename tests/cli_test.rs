// tests/cli_test.rs

//! Command-line tests for the eopkg3p binary
//!
//! Only commands that never touch `eopkg`, `git` or `pkexec` are run here.

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn eopkg3p() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("eopkg3p"));
    cmd.env_remove("EOPKG3P_CACHE_DIR")
        .env_remove("EOPKG3P_REPO_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_command_aliases() {
    eopkg3p()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update-repo"))
        .stdout(predicate::str::contains("list-available"))
        .stdout(predicate::str::contains("aliases: ur").or(predicate::str::contains("alias: ur")));
}

#[test]
fn test_no_command_prints_help() {
    eopkg3p()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cache_flag_prints_cache_dir() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache");

    eopkg3p()
        .arg("--cache")
        .arg("--cache-dir")
        .arg(&cache)
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", cache.display())));

    // Printing the location does not create it
    assert!(!cache.exists());
}

#[test]
fn test_cache_dir_from_environment() {
    let dir = tempdir().unwrap();

    eopkg3p()
        .env("EOPKG3P_CACHE_DIR", dir.path())
        .arg("--cache")
        .assert()
        .success()
        .stdout(predicate::str::contains(dir.path().to_string_lossy().to_string()));
}

#[test]
fn test_delete_cache_removes_cache_dir() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("cache");
    fs::create_dir_all(cache.join("3rd-party/network/foo")).unwrap();
    fs::create_dir_all(cache.join("builds/foo")).unwrap();

    eopkg3p()
        .arg("dc")
        .arg("--cache-dir")
        .arg(&cache)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleting all caches"))
        .stdout(predicate::str::contains("Done!"));

    assert!(!cache.exists());
}

#[test]
fn test_delete_cache_without_cache_dir_succeeds() {
    let dir = tempdir().unwrap();

    eopkg3p()
        .arg("delete-cache")
        .arg("--cache-dir")
        .arg(dir.path().join("never-created"))
        .assert()
        .success();
}

#[test]
fn test_completions() {
    eopkg3p()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("eopkg3p"));
}

#[test]
fn test_missing_tools_are_reported() {
    let dir = tempdir().unwrap();

    eopkg3p()
        .env("PATH", dir.path())
        .arg("li")
        .arg("--cache-dir")
        .arg(dir.path().join("cache"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("executable not found"));
}

#[test]
fn test_unknown_subcommand_fails() {
    eopkg3p()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
