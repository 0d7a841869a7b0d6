//! Throwaway git repositories for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// A git repository in a temporary directory, on branch `main`
pub struct TempGitRepo {
    dir: TempDir,
}

impl TempGitRepo {
    /// Empty repository with a local identity configured
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let repo = Self { dir };
        repo.git(&["init", "--quiet"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.email", "agent@example.com"]);
        repo.git(&["config", "user.name", "Test Agent"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    /// Repository with one commit on `main`
    pub fn with_initial_commit() -> Self {
        let repo = Self::new();
        repo.commit_file("README.md", "# test\n", "initial commit");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the repository, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        let output = self.git_output(args);
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Run git in the repository without checking the exit status
    pub fn git_output(&self, args: &[&str]) -> std::process::Output {
        Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("failed to run git")
    }

    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create directories");
        }
        fs::write(&full, content).expect("failed to write file");
        full
    }

    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.path().join(path)).expect("failed to read file")
    }

    /// Write a file and commit it on the current branch
    pub fn commit_file(&self, path: &str, content: &str, message: &str) {
        self.write_file(path, content);
        self.git(&["add", "--", path]);
        self.git(&["commit", "--quiet", "-m", message]);
    }

    pub fn current_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    /// Install an executable hook script under `.git/hooks`
    #[cfg(unix)]
    pub fn install_hook(&self, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let hook = self.path().join(".git/hooks").join(name);
        fs::create_dir_all(hook.parent().unwrap()).expect("failed to create hooks dir");
        fs::write(&hook, script).expect("failed to write hook");
        fs::set_permissions(&hook, fs::Permissions::from_mode(0o755))
            .expect("failed to make hook executable");
    }

    /// `main` and `feature` both change `path` differently
    pub fn diverge_on(&self, path: &str) {
        self.commit_file(path, "base\n", "add shared file");
        self.git(&["checkout", "--quiet", "-b", "feature"]);
        self.commit_file(path, "feature side\n", "feature change");
        self.git(&["checkout", "--quiet", "main"]);
        self.commit_file(path, "main side\n", "main change");
    }

    /// Bare repository registered as `origin`
    pub fn add_bare_remote(&self) -> TempDir {
        let remote = tempfile::tempdir().expect("failed to create temp dir");
        let status = Command::new("git")
            .args(["init", "--bare", "--quiet"])
            .current_dir(remote.path())
            .status()
            .expect("failed to run git");
        assert!(status.success());
        let status = Command::new("git")
            .args(["symbolic-ref", "HEAD", "refs/heads/main"])
            .current_dir(remote.path())
            .status()
            .expect("failed to run git");
        assert!(status.success());

        let url = remote.path().to_string_lossy().to_string();
        self.git(&["remote", "add", "origin", &url]);
        remote
    }
}
