//! Pull request operations

use serde::{Deserialize, Serialize};

use crate::core::RepoSlug;
use crate::error::{AgentError, LogOutcome, Result};
use crate::github::api::HostingApi;
use crate::github::polling::{MonitorReport, PrMonitor};
use crate::github::status::{MergeableState, PrState, PullRequestStatus};

/// Merge method for pull requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash and merge
    Squash,
    /// Rebase and merge
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MergeMethod::Merge => "merge",
            MergeMethod::Squash => "squash",
            MergeMethod::Rebase => "rebase",
        };
        write!(f, "{}", name)
    }
}

/// Parameters for creating a pull request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePrParams {
    /// PR title
    pub title: String,
    /// PR body/description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Head branch (source branch with changes)
    pub head: String,
    /// Base branch (target branch to merge into)
    pub base: String,
    /// Create as draft
    pub draft: bool,
}

impl CreatePrParams {
    pub fn new(base: impl Into<String>, head: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            head: head.into(),
            base: base.into(),
            draft: false,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// One side of a pull request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub ref_field: String,
    pub sha: String,
}

/// The subset of a pull request payload this tool reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestInfo {
    pub number: u64,
    pub state: PrState,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub mergeable_state: Option<MergeableState>,
    pub head: BranchRef,
    pub base: BranchRef,
}

/// Response of the merge endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeResponse {
    #[serde(default)]
    pub sha: Option<String>,
    pub merged: bool,
    #[serde(default)]
    pub message: String,
}

/// Pull request operations handler
pub struct PullRequestHandler<'a> {
    api: &'a dyn HostingApi,
}

impl<'a> PullRequestHandler<'a> {
    /// Create a new handler
    pub fn new(api: &'a dyn HostingApi) -> Self {
        Self { api }
    }

    /// Fetch repository metadata as returned by the API
    pub async fn get_repo_info(&self, repo: &RepoSlug) -> Result<serde_json::Value> {
        self.api
            .get_repository(repo)
            .await
            .log_outcome("get_repo_info", "Fetched repository info")
    }

    /// Open a pull request from `params.head` into `params.base`
    pub async fn create_pr(
        &self,
        repo: &RepoSlug,
        params: &CreatePrParams,
    ) -> Result<PullRequestInfo> {
        if params.title.trim().is_empty() {
            let err = AgentError::InvalidInput("Pull request title must not be empty".to_string());
            tracing::error!(operation = "create_pr", error = %err, "operation failed");
            return Err(err);
        }

        let pr = self
            .api
            .create_pull(repo, params)
            .await
            .log_outcome("create_pr", "Created pull request")?;
        tracing::info!(repo = %repo, number = pr.number, url = %pr.html_url, "pull request opened");
        Ok(pr)
    }

    /// Fetch the pull request, its head commit's check runs and its reviews
    pub async fn get_pr_status(&self, repo: &RepoSlug, number: u64) -> Result<PullRequestStatus> {
        self.fetch_status(repo, number)
            .await
            .log_outcome("get_pr_status", "Fetched pull request status")
    }

    async fn fetch_status(&self, repo: &RepoSlug, number: u64) -> Result<PullRequestStatus> {
        let pr = self.api.get_pull(repo, number).await?;
        let check_runs = self.api.list_check_runs(repo, &pr.head.sha).await?;
        let reviews = self.api.list_reviews(repo, number).await?;

        Ok(PullRequestStatus {
            number: pr.number,
            state: pr.state,
            merged: pr.merged.unwrap_or(false),
            mergeable: pr.mergeable,
            mergeable_state: pr.mergeable_state.unwrap_or_default(),
            head_sha: pr.head.sha,
            check_runs,
            reviews,
        })
    }

    /// True iff at least one review approves the pull request
    pub async fn is_pr_approved(&self, repo: &RepoSlug, number: u64) -> Result<bool> {
        Ok(self.get_pr_status(repo, number).await?.is_approved())
    }

    /// True iff every check run on the head commit succeeded
    pub async fn are_checks_passing(&self, repo: &RepoSlug, number: u64) -> Result<bool> {
        Ok(self.get_pr_status(repo, number).await?.checks_passing())
    }

    /// Merge the pull request once it is ready
    ///
    /// ## Errors
    ///
    /// - `MergeBlocked` - a fresh snapshot is not approved, green and mergeable
    /// - `PullRequestNotMergeable` - GitHub answered without merging
    pub async fn merge_pr(
        &self,
        repo: &RepoSlug,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResponse> {
        self.merge_when_ready(repo, number, method)
            .await
            .log_outcome("merge_pr", "Merged pull request")
    }

    async fn merge_when_ready(
        &self,
        repo: &RepoSlug,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResponse> {
        let status = self.fetch_status(repo, number).await?;
        let reasons = status.blocking_reasons();
        if !reasons.is_empty() {
            return Err(AgentError::MergeBlocked { number, reasons });
        }

        tracing::debug!(repo = %repo, number, method = %method, "requesting merge");
        let response = self.api.merge_pull(repo, number, method).await?;
        if !response.merged {
            return Err(AgentError::PullRequestNotMergeable(response.message));
        }
        Ok(response)
    }

    /// Poll until the pull request is ready, closed or the monitor gives up
    pub async fn monitor_pr(
        &self,
        repo: &RepoSlug,
        number: u64,
        monitor: &PrMonitor,
    ) -> Result<MonitorReport> {
        monitor.watch(self, repo, number).await
    }
}
