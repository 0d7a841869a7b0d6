//! Local git repository operations
//!
//! Working-copy changes go through the system `git` binary so hooks,
//! credential helpers and SSH agents behave exactly as they do on the
//! command line. git2 is only used to locate the repository and to read
//! the index when looking for conflicts.
//!
//! - Branch creation and checkout
//! - Pull, commit and push
//! - Stash and stash pop
//! - Local merges with conflict detection and resolution

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::core::merge::{
    conflict_paths_from_output, index_stage, is_conflict_output, keep_both_sides,
    unmerged_paths, ConflictResolution, MergeStrategy,
};
use crate::error::{AgentError, LogOutcome, Result};

/// Result of committing and pushing the working copy
#[derive(Debug, Clone, Serialize)]
pub struct PushSummary {
    /// Commit created from the working copy
    pub commit: String,
    /// Branch that was pushed (the current branch when none was given)
    pub branch: String,
}

/// Result of a clean local merge
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub base: String,
    pub feature: String,
    pub strategy: MergeStrategy,
    /// HEAD after the merge
    pub commit: String,
}

/// Wrapper for local git repository operations
pub struct GitRepository {
    repo: Repository,
    workdir: PathBuf,
    remote: String,
}

impl GitRepository {
    /// Discover a git repository from the given path
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "not inside a git repository");
            AgentError::NotGitRepository
        })?;
        let Some(workdir) = repo.workdir().map(Path::to_path_buf) else {
            error!(path = %path.display(), "repository has no working tree");
            return Err(AgentError::NotGitRepository);
        };

        info!(path = %workdir.display(), "opened git repository");
        Ok(Self {
            repo,
            workdir,
            remote: "origin".to_string(),
        })
    }

    /// Use a remote other than `origin` for pull and push
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Check if the given path is inside a git repository
    pub fn is_git_repository<P: AsRef<Path>>(path: P) -> bool {
        Repository::discover(path).is_ok()
    }

    /// Get the repository root directory
    pub fn root_dir(&self) -> &Path {
        &self.workdir
    }

    /// Name of the remote used for pull and push
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) => {
                if head.is_branch() {
                    Ok(head.shorthand().unwrap_or("HEAD").to_string())
                } else {
                    // Detached HEAD state
                    Ok("HEAD".to_string())
                }
            }
            Err(e) => {
                // Unborn HEAD (no commits yet)
                if e.code() == git2::ErrorCode::UnbornBranch {
                    let output = self.git(&["symbolic-ref", "--short", "HEAD"])?;
                    Ok(output)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Get the URL of the configured remote
    pub fn remote_url(&self) -> Result<String> {
        let remote = self
            .repo
            .find_remote(&self.remote)
            .map_err(|_| AgentError::NoGitHubRemote(self.remote.clone()))?;
        remote
            .url()
            .map(|s| s.to_string())
            .ok_or_else(|| AgentError::NoGitHubRemote(self.remote.clone()))
    }

    /// Commit id HEAD points at
    pub fn head_commit(&self) -> Result<String> {
        self.git(&["rev-parse", "HEAD"])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pull and push
    // ─────────────────────────────────────────────────────────────────────────

    /// Pull from the remote, optionally naming the branch to pull
    pub fn pull(&self, branch: Option<&str>) -> Result<()> {
        let result = match branch {
            Some(branch) => self.git(&["pull", &self.remote, branch]),
            None => self.git(&["pull"]),
        };
        result.map(|_| ()).log_outcome("pull", "pulled latest changes")
    }

    /// Stage everything, commit it and push
    ///
    /// A commit is always recorded, empty when nothing changed, so a fresh
    /// branch can be pushed and opened as a pull request. With a branch the push targets `<remote> <branch>`; without one git's
    /// configured upstream is used.
    pub fn push_changes(&self, branch: Option<&str>, message: &str) -> Result<PushSummary> {
        self.push_changes_inner(branch, message)
            .log_outcome("push", "pushed changes")
    }

    fn push_changes_inner(&self, branch: Option<&str>, message: &str) -> Result<PushSummary> {
        self.git(&["add", "."])?;
        self.git(&["commit", "--allow-empty", "-m", message])?;

        let branch = match branch {
            Some(branch) => {
                self.git(&["push", &self.remote, branch])?;
                branch.to_string()
            }
            None => {
                self.git(&["push"])?;
                self.current_branch()?
            }
        };

        Ok(PushSummary {
            commit: self.head_commit()?,
            branch,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Branches
    // ─────────────────────────────────────────────────────────────────────────

    /// Checkout a local branch
    pub fn checkout(&self, branch_name: &str) -> Result<()> {
        self.git(&["checkout", branch_name])
            .map(|_| ())
            .log_outcome("checkout", "checked out branch")
    }

    /// Create a new branch from current HEAD and switch to it
    pub fn create_branch(&self, branch_name: &str) -> Result<()> {
        self.git(&["checkout", "-b", branch_name])
            .map(|_| ())
            .log_outcome("create_branch", "created and switched to branch")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stash
    // ─────────────────────────────────────────────────────────────────────────

    /// Stash uncommitted changes
    pub fn stash(&self) -> Result<()> {
        self.git(&["stash", "push"])
            .map(|_| ())
            .log_outcome("stash", "stashed changes")
    }

    /// Re-apply and drop the most recent stash
    pub fn apply_stash(&self) -> Result<()> {
        self.git(&["stash", "pop"])
            .map(|_| ())
            .log_outcome("apply_stash", "applied stash")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Merging
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge `feature` into `base`
    ///
    /// The merge runs with `--no-commit` so conflicts can be inspected before
    /// anything is recorded. Conflicting merges are aborted, leaving `base`
    /// as it was, and reported as [`AgentError::MergeConflict`]. Clean merges
    /// are committed.
    pub fn merge(&self, base: &str, feature: &str, strategy: MergeStrategy) -> Result<MergeSummary> {
        self.merge_inner(base, feature, strategy)
            .log_outcome("merge", "merged branches")
    }

    fn merge_inner(&self, base: &str, feature: &str, strategy: MergeStrategy) -> Result<MergeSummary> {
        self.git(&["checkout", base])?;

        let mut args = vec!["merge", "--no-commit", "--no-ff"];
        args.extend_from_slice(strategy.git_args());
        args.push(feature);

        let merge_result = self.git(&args);

        let mut conflicts = self.detect_conflicts();
        if let Err(AgentError::GitCommand { message, .. }) = &merge_result {
            if conflicts.is_empty() && is_conflict_output(message) {
                conflicts = conflict_paths_from_output(message);
            }
        }

        if !conflicts.is_empty() {
            warn!(base, feature, ?conflicts, "merge stopped on conflicts, aborting");
            self.abort_merge();
            return Err(AgentError::MergeConflict { conflicts });
        }

        if let Err(e) = merge_result {
            self.abort_merge();
            return Err(e);
        }

        if self.merge_in_progress() {
            if let Err(e) = self.git(&["commit", "--no-edit"]) {
                warn!(base, feature, error = %e, "merge commit failed, aborting");
                self.abort_merge();
                return Err(e);
            }
        }

        Ok(MergeSummary {
            base: base.to_string(),
            feature: feature.to_string(),
            strategy,
            commit: self.head_commit()?,
        })
    }

    /// Whether a merge is waiting to be committed or aborted
    pub fn merge_in_progress(&self) -> bool {
        self.repo.path().join("MERGE_HEAD").exists()
    }

    fn abort_merge(&self) {
        if !self.merge_in_progress() {
            return;
        }
        if let Err(e) = self.git(&["merge", "--abort"]) {
            warn!(error = %e, "failed to abort merge");
        }
    }

    /// Paths with unmerged (non-zero stage) index entries
    ///
    /// Never fails: problems reading the index are logged and reported as
    /// no conflicts.
    pub fn detect_conflicts(&self) -> Vec<String> {
        match self.read_unmerged_paths() {
            Ok(paths) => {
                debug!(count = paths.len(), "detected conflicting paths");
                paths
            }
            Err(e) => {
                warn!(error = %e, "could not read index for conflicts");
                Vec::new()
            }
        }
    }

    fn read_unmerged_paths(&self) -> Result<Vec<String>> {
        let mut index = self.repo.index()?;
        // The git binary may have rewritten the index since it was cached
        index.read(true)?;

        let entries = index.iter().map(|entry| {
            (
                String::from_utf8_lossy(&entry.path).into_owned(),
                index_stage(entry.flags),
            )
        });
        Ok(unmerged_paths(entries))
    }

    /// Resolve one conflicted path and stage the result
    pub fn resolve_conflict(&self, path: &str, resolution: ConflictResolution) -> Result<()> {
        self.resolve_conflict_inner(path, resolution)
            .log_outcome("resolve_conflict", "resolved conflict")
    }

    fn resolve_conflict_inner(&self, path: &str, resolution: ConflictResolution) -> Result<()> {
        match resolution {
            ConflictResolution::Ours => {
                self.git(&["checkout", "--ours", "--", path])?;
            }
            ConflictResolution::Theirs => {
                self.git(&["checkout", "--theirs", "--", path])?;
            }
            ConflictResolution::Both => {
                let full_path = self.workdir.join(path);
                let content = fs::read_to_string(&full_path)?;
                fs::write(&full_path, keep_both_sides(&content))?;
            }
        }

        self.git(&["add", "--", path])?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Process plumbing
    // ─────────────────────────────────────────────────────────────────────────

    /// Run git in the working copy, returning trimmed stdout
    fn git(&self, args: &[&str]) -> Result<String> {
        let command = args.first().copied().unwrap_or_default().to_string();
        debug!(?args, "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| AgentError::GitSpawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Conflict reports go to stdout, everything else to stderr
            let message = [stdout.as_str(), stderr.trim()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("\n");
            let message = if message.is_empty() {
                output.status.to_string()
            } else {
                message
            };
            return Err(AgentError::GitCommand { command, message });
        }

        Ok(stdout)
    }
}
