//! Integration tests for the CLI surface.
//!
//! These exercise the full binary: argument parsing, config loading,
//! and the error paths that never reach the network.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for running the dashboard, isolated from any config on
/// the host.
fn fdash() -> Command {
    let mut cmd = Command::cargo_bin("fdash").unwrap();
    cmd.env_remove("GITHUB_TOKEN");
    cmd.env("FDASH_CONFIG", "/nonexistent/fdash-config.toml");
    cmd
}

#[test]
fn version_flag_works() {
    fdash()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("feature-dashboard"));
}

#[test]
fn help_flag_works() {
    fdash()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("feature delivery"));
}

#[test]
fn unknown_command_fails() {
    fdash().arg("burndown").assert().failure();
}

#[test]
fn summary_without_repos_fails_with_hint() {
    fdash()
        .arg("summary")
        .arg("--label")
        .arg("feature:reactions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repositories specified"));
}

#[test]
fn plan_without_labels_or_epic_fails_with_hint() {
    fdash()
        .arg("plan")
        .arg("--repo")
        .arg("example-org/app")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to plan"));
}

#[test]
fn config_file_supplies_defaults() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "labels = [\"feature:reactions\"]\n").unwrap();

    // Repos still missing, so the repo hint fires; the labels error does
    // not, proving the file was read.
    let mut cmd = Command::cargo_bin("fdash").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .env("FDASH_CONFIG", &config)
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repositories specified"));
}

#[test]
fn malformed_config_is_reported() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "repos = \"not-a-list\"\n").unwrap();

    let mut cmd = Command::cargo_bin("fdash").unwrap();
    cmd.env("FDASH_CONFIG", &config)
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn completion_emits_a_script() {
    fdash()
        .arg("completion")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("feature-dashboard"));
}
