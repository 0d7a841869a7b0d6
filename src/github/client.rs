//! GitHub API client wrapper using octocrab

use async_trait::async_trait;
use octocrab::Octocrab;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::core::config::GitHubConfig;
use crate::core::{Credentials, RepoSlug};
use crate::error::{AgentError, Result};
use crate::github::api::HostingApi;
use crate::github::pull_request::{CreatePrParams, MergeMethod, MergeResponse, PullRequestInfo};
use crate::github::status::{CheckRun, Review};

/// Page size for list endpoints
const PER_PAGE: u8 = 100;

/// GitHub API client wrapper
pub struct GitHubClient {
    inner: Octocrab,
}

#[derive(Deserialize)]
struct CheckRunsPage {
    total_count: u64,
    check_runs: Vec<CheckRun>,
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

impl PageParams {
    fn nth(page: u32) -> Self {
        Self {
            per_page: PER_PAGE,
            page,
        }
    }
}

/// Whether a listing continues past a page of `page_len` items
///
/// A short page always ends it. `total_count`, when the endpoint reports
/// one, ends it as soon as that many items were collected.
fn has_next_page(page_len: usize, collected: usize, total_count: Option<u64>) -> bool {
    if page_len < usize::from(PER_PAGE) {
        return false;
    }
    match total_count {
        Some(total) => (collected as u64) < total,
        None => true,
    }
}

#[derive(Serialize)]
struct MergeRequest {
    merge_method: MergeMethod,
}

impl GitHubClient {
    /// Create an authenticated client for the configured API root
    ///
    /// ## Errors
    ///
    /// - `Config` - the API URL is not a valid URI
    /// - `GitHubApi` - the HTTP client could not be built
    pub fn new(config: &GitHubConfig, credentials: &Credentials) -> Result<Self> {
        let octocrab = Octocrab::builder()
            .personal_token(credentials.token().expose_secret().to_string())
            .base_uri(config.api_url.as_str())
            .map_err(|e| {
                AgentError::Config(format!("Invalid GitHub API URL '{}': {}", config.api_url, e))
            })?
            .build()?;

        tracing::debug!(api_url = %config.api_url, "GitHub client initialized");

        Ok(Self { inner: octocrab })
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn get_repository(&self, repo: &RepoSlug) -> Result<serde_json::Value> {
        let route = repo.api_path();
        let info: serde_json::Value = self.inner.get(&route, None::<&()>).await?;
        Ok(info)
    }

    async fn create_pull(
        &self,
        repo: &RepoSlug,
        params: &CreatePrParams,
    ) -> Result<PullRequestInfo> {
        let route = format!("{}/pulls", repo.api_path());
        let pr: PullRequestInfo = self.inner.post(&route, Some(params)).await?;
        Ok(pr)
    }

    async fn get_pull(&self, repo: &RepoSlug, number: u64) -> Result<PullRequestInfo> {
        let route = format!("{}/pulls/{}", repo.api_path(), number);
        let pr: PullRequestInfo = self.inner.get(&route, None::<&()>).await?;
        Ok(pr)
    }

    async fn list_check_runs(&self, repo: &RepoSlug, sha: &str) -> Result<Vec<CheckRun>> {
        let route = format!("{}/commits/{}/check-runs", repo.api_path(), sha);
        let mut runs = Vec::new();
        for page in 1.. {
            let params = PageParams::nth(page);
            let batch: CheckRunsPage = self.inner.get(&route, Some(&params)).await?;
            let page_len = batch.check_runs.len();
            runs.extend(batch.check_runs);
            if !has_next_page(page_len, runs.len(), Some(batch.total_count)) {
                break;
            }
        }
        Ok(runs)
    }

    async fn list_reviews(&self, repo: &RepoSlug, number: u64) -> Result<Vec<Review>> {
        let route = format!("{}/pulls/{}/reviews", repo.api_path(), number);
        let mut reviews = Vec::new();
        for page in 1.. {
            let params = PageParams::nth(page);
            let batch: Vec<Review> = self.inner.get(&route, Some(&params)).await?;
            let page_len = batch.len();
            reviews.extend(batch);
            if !has_next_page(page_len, reviews.len(), None) {
                break;
            }
        }
        Ok(reviews)
    }

    async fn merge_pull(
        &self,
        repo: &RepoSlug,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResponse> {
        let route = format!("{}/pulls/{}/merge", repo.api_path(), number);
        let body = MergeRequest {
            merge_method: method,
        };
        let response: MergeResponse = self.inner.put(&route, Some(&body)).await?;
        Ok(response)
    }
}
