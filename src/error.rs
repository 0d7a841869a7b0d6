//! Custom error types for git-agent
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

/// Main error type for git-agent
#[derive(Error, Debug)]
pub enum AgentError {
    /// Not running in a git repository
    #[error("This directory is not a git repository.\n\n  → Run 'git init' to create one, or pass --path to an existing working copy.")]
    NotGitRepository,

    /// No usable remote URL configured
    #[error("No GitHub remote found in this repository.\n\n  → Make sure '{0}' points to a GitHub URL, or pass --repo owner/name.")]
    NoGitHubRemote(String),

    /// Invalid GitHub URL format
    #[error("Cannot parse GitHub URL: {0}\n\n  → Expected format: https://github.com/owner/repo or git@github.com:owner/repo")]
    InvalidGitHubUrl(String),

    /// Repository name is not an owner/name pair
    #[error("Invalid repository name '{0}'.\n\n  → Expected format: owner/name")]
    InvalidRepoSlug(String),

    /// GITHUB_TOKEN is not set
    #[error("GitHub token not found in environment variables.\n\n  → Export GITHUB_TOKEN or add it to a .env file.")]
    MissingToken,

    /// The git binary could not be started
    #[error("Failed to execute git {command}: {source}")]
    GitSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A git command exited with a failure status
    #[error("git {command} failed: {message}")]
    GitCommand { command: String, message: String },

    /// A local merge stopped on conflicting paths and was aborted
    #[error("Merge conflict in {}.\n\n  → The merge was aborted; resolve the conflicts and try again.", .conflicts.join(", "))]
    MergeConflict { conflicts: Vec<String> },

    /// Git index inspection error
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    /// GitHub API error
    #[error("GitHub API request failed: {0}\n\n  → Check your internet connection and that GITHUB_TOKEN is still valid.")]
    GitHubApi(String),

    /// GitHub rate limit hit
    #[error("API rate limit exceeded. Please wait a few minutes and try again.")]
    RateLimited,

    /// Repository or pull request does not exist (or is not visible to the token)
    #[error("GitHub resource not found: {0}\n\n  → It may be private or your token may not have access.")]
    NotFound(String),

    /// GitHub refused the merge
    #[error("Cannot merge this PR: {0}\n\n  → Resolve conflicts locally and push, or try a different merge method.")]
    PullRequestNotMergeable(String),

    /// Merge attempted before the pull request was ready
    #[error("Pull request #{number} is not ready to merge: {}", .reasons.join(", "))]
    MergeBlocked { number: u64, reasons: Vec<String> },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),

    /// Operation cancelled by user
    #[error("Operation cancelled.")]
    Cancelled,
}

impl AgentError {
    /// Conflicting paths carried by a merge conflict, if any
    pub fn conflicts(&self) -> Option<&[String]> {
        match self {
            AgentError::MergeConflict { conflicts } => Some(conflicts),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for AgentError {
    fn from(err: toml::de::Error) -> Self {
        AgentError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for AgentError {
    fn from(err: toml::ser::Error) -> Self {
        AgentError::Toml(err.to_string())
    }
}

impl From<octocrab::Error> for AgentError {
    fn from(err: octocrab::Error) -> Self {
        crate::github::error_handler::classify_github_error(err)
    }
}

/// Result type alias using AgentError
pub type Result<T> = std::result::Result<T, AgentError>;

/// Log the outcome of a façade operation before handing it back
///
/// Successes are logged at info with `done`, failures at error level with
/// the error's display text.
pub trait LogOutcome<T> {
    fn log_outcome(self, operation: &str, done: &str) -> Result<T>;
}

impl<T> LogOutcome<T> for Result<T> {
    fn log_outcome(self, operation: &str, done: &str) -> Result<T> {
        match &self {
            Ok(_) => tracing::info!(operation, "{}", done),
            Err(e) => tracing::error!(operation, error = %e, "operation failed"),
        }
        self
    }
}
