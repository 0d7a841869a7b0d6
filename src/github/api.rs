//! The hosting API surface used by pull request operations
//!
//! `GitHubClient` implements it over the REST API. Tests drive the same
//! handler through a scripted implementation.

use async_trait::async_trait;

use crate::core::RepoSlug;
use crate::error::Result;
use crate::github::pull_request::{CreatePrParams, MergeMethod, MergeResponse, PullRequestInfo};
use crate::github::status::{CheckRun, Review};

/// Raw GitHub REST calls, one method per endpoint
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// `GET /repos/{owner}/{name}`
    async fn get_repository(&self, repo: &RepoSlug) -> Result<serde_json::Value>;

    /// `POST /repos/{owner}/{name}/pulls`
    async fn create_pull(&self, repo: &RepoSlug, params: &CreatePrParams)
        -> Result<PullRequestInfo>;

    /// `GET /repos/{owner}/{name}/pulls/{number}`
    async fn get_pull(&self, repo: &RepoSlug, number: u64) -> Result<PullRequestInfo>;

    /// `GET /repos/{owner}/{name}/commits/{sha}/check-runs`
    async fn list_check_runs(&self, repo: &RepoSlug, sha: &str) -> Result<Vec<CheckRun>>;

    /// `GET /repos/{owner}/{name}/pulls/{number}/reviews`
    async fn list_reviews(&self, repo: &RepoSlug, number: u64) -> Result<Vec<Review>>;

    /// `PUT /repos/{owner}/{name}/pulls/{number}/merge`
    async fn merge_pull(
        &self,
        repo: &RepoSlug,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResponse>;
}
