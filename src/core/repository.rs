//! Remote repository naming
//!
//! GitHub repositories are addressed as `owner/name`. A slug is either given
//! explicitly or inferred from the working copy's remote URL.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::git::GitRepository;
use crate::error::{AgentError, Result};

/// Repository owner and name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Infer the slug from a working copy's remote URL
    pub fn from_remote(git: &GitRepository) -> Result<Self> {
        parse_remote_url(&git.remote_url()?)
    }

    /// Get the full repository name (owner/name)
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// API route prefix: `/repos/{owner}/{name}`
    pub fn api_path(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name)) if is_valid_segment(owner) && is_valid_segment(name) => {
                Ok(Self::new(owner, name))
            }
            _ => Err(AgentError::InvalidRepoSlug(s.to_string())),
        }
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = AgentError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RepoSlug> for String {
    fn from(slug: RepoSlug) -> Self {
        slug.full_name()
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Scp-like remote syntax: `git@host:owner/name.git`
static SCP_REMOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+:(?P<path>[^/].*)$")
        .expect("Invalid regex pattern for scp-style remotes")
});

/// Extract the repository slug from a remote URL
///
/// Accepts the forms git itself understands for a hosted repository, on
/// github.com or a GitHub Enterprise host:
/// - `https://github.com/owner/name(.git)`
/// - `ssh://git@github.com/owner/name(.git)`
/// - `git@github.com:owner/name(.git)`
pub fn parse_remote_url(url: &str) -> Result<RepoSlug> {
    let url = url.trim();

    if let Some(caps) = SCP_REMOTE.captures(url) {
        return slug_from_path(&caps["path"])
            .ok_or_else(|| AgentError::InvalidGitHubUrl(url.to_string()));
    }

    Url::parse(url)
        .ok()
        .filter(|parsed| parsed.host_str().is_some())
        .and_then(|parsed| slug_from_path(parsed.path()))
        .ok_or_else(|| AgentError::InvalidGitHubUrl(url.to_string()))
}

/// `owner/name` from the path part of a remote URL
fn slug_from_path(path: &str) -> Option<RepoSlug> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    path.parse().ok()
}
