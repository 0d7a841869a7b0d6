//! CLI smoke tests

#![allow(deprecated)] // cargo_bin is the standard way to test CLI binaries

mod common;

use assert_cmd::Command;
use common::TempGitRepo;
use predicates::prelude::*;

fn git_agent(repo: &TempGitRepo) -> Command {
    let mut cmd = Command::cargo_bin("git-agent").unwrap();
    cmd.current_dir(repo.path())
        .env("GIT_AGENT_CONFIG", repo.path().join("no-config.toml"))
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("git-agent").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pull request"))
        .stdout(predicate::str::contains("ship"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("git-agent").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_conflicts_on_clean_repository() {
    let repo = TempGitRepo::with_initial_commit();

    git_agent(&repo)
        .arg("conflicts")
        .assert()
        .success()
        .stdout(predicate::str::contains("No merge conflicts."));
}

#[test]
fn test_branch_command_creates_branch() {
    let repo = TempGitRepo::with_initial_commit();

    git_agent(&repo)
        .args(["branch", "release-1"])
        .assert()
        .success();

    assert_eq!(repo.current_branch(), "release-1");
}

#[test]
fn test_merge_conflict_json_report() {
    let repo = TempGitRepo::with_initial_commit();
    repo.diverge_on("path/to/file");

    git_agent(&repo)
        .args(["merge", "main", "feature", "--json"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("\"conflicts\""))
        .stdout(predicate::str::contains("path/to/file"));
}

#[test]
fn test_outside_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("git-agent").unwrap();
    cmd.current_dir(dir.path())
        .env("GIT_AGENT_CONFIG", dir.path().join("no-config.toml"))
        .env("RUST_LOG", "off")
        .arg("stash");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));
}

#[test]
fn test_repo_requires_token() {
    let repo = TempGitRepo::with_initial_commit();

    git_agent(&repo)
        .env_remove("GITHUB_TOKEN")
        .args(["repo", "--repo", "octo/repo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_invalid_repo_slug() {
    let repo = TempGitRepo::with_initial_commit();

    git_agent(&repo)
        .args(["pr", "status", "1", "--repo", "not-a-slug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid repository name"));
}
