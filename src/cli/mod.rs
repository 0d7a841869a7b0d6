//! CLI module for git-agent
//!
//! Command definitions live in `commands`; each handler module builds the
//! façades it needs from a shared [`Context`] and prints the outcome.

pub mod commands;
pub mod git;
pub mod pr;
pub mod ship;

use std::path::PathBuf;

use serde::Serialize;

use crate::core::{Config, Credentials, GitRepository, RepoSlug};
use crate::error::Result;
use crate::github::GitHubClient;
use crate::report::OperationReport;

pub use commands::{Cli, Commands};

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    pub path: PathBuf,
    pub repo: Option<String>,
    pub json: bool,
}

impl Context {
    pub fn new(cli: &Cli, config: Config) -> Self {
        Self {
            config,
            path: cli.path.clone(),
            repo: cli.repo.clone(),
            json: cli.json,
        }
    }

    /// Open the working copy named by `--path`
    pub fn open_git(&self) -> Result<GitRepository> {
        Ok(GitRepository::discover(&self.path)?.with_remote(self.config.git.remote.clone()))
    }

    /// Repository from `--repo`, or inferred from the working copy's remote
    pub fn repo_slug(&self) -> Result<RepoSlug> {
        match &self.repo {
            Some(name) => name.parse(),
            None => RepoSlug::from_remote(&self.open_git()?),
        }
    }

    /// Authenticated GitHub client; fails fast without a token
    pub fn github_client(&self) -> Result<GitHubClient> {
        let credentials = Credentials::from_env()?;
        GitHubClient::new(&self.config.github, &credentials)
    }
}

/// Print an operation's outcome, human-readable or as a JSON report
///
/// The error, if any, is handed back so the process exits non-zero.
pub fn emit<T, F>(ctx: &Context, result: Result<T>, message: &str, print: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    if ctx.json {
        let report = OperationReport::from_result(&result, message);
        println!("{}", report.to_json()?);
        return result.map(|_| ());
    }

    let value = result?;
    print(&value);
    Ok(())
}
