//! Scripted in-memory GitHub API for testing
//!
//! Hand-written instead of a mock framework: responses are queued per
//! endpoint and every call is recorded for verification. The last queued
//! pull request and review responses repeat once the queue runs down to
//! one, so a polling loop can be fed a short script.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use git_agent::core::RepoSlug;
use git_agent::error::{AgentError, Result};
use git_agent::github::status::{CheckRun, Review};
use git_agent::github::{CreatePrParams, HostingApi, MergeMethod, MergeResponse, PullRequestInfo};

type Scripted<T> = std::result::Result<T, String>;

#[derive(Default)]
pub struct ScriptedApi {
    repository: Mutex<Option<serde_json::Value>>,
    pulls: Mutex<VecDeque<Scripted<PullRequestInfo>>>,
    check_runs: Mutex<VecDeque<Vec<CheckRun>>>,
    reviews: Mutex<VecDeque<Vec<Review>>>,
    merge_response: Mutex<Option<MergeResponse>>,
    // Call tracking
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<CreatePrParams>>,
    merges: Mutex<Vec<(u64, MergeMethod)>>,
}

fn next_sticky<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    // === Scripting ===

    pub fn with_repository(self, info: serde_json::Value) -> Self {
        *self.repository.lock().unwrap() = Some(info);
        self
    }

    pub fn push_pull(&self, pr: PullRequestInfo) {
        self.pulls.lock().unwrap().push_back(Ok(pr));
    }

    pub fn push_pull_error(&self, message: &str) {
        self.pulls.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub fn push_check_runs(&self, runs: Vec<CheckRun>) {
        self.check_runs.lock().unwrap().push_back(runs);
    }

    pub fn push_reviews(&self, reviews: Vec<Review>) {
        self.reviews.lock().unwrap().push_back(reviews);
    }

    pub fn set_merge_response(&self, response: MergeResponse) {
        *self.merge_response.lock().unwrap() = Some(response);
    }

    // === Verification ===

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == endpoint).count()
    }

    pub fn created(&self) -> Vec<CreatePrParams> {
        self.created.lock().unwrap().clone()
    }

    pub fn merges(&self) -> Vec<(u64, MergeMethod)> {
        self.merges.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &str) {
        self.calls.lock().unwrap().push(endpoint.to_string());
    }
}

#[async_trait]
impl HostingApi for ScriptedApi {
    async fn get_repository(&self, repo: &RepoSlug) -> Result<serde_json::Value> {
        self.record("get_repository");
        self.repository
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AgentError::NotFound(repo.full_name()))
    }

    async fn create_pull(
        &self,
        _repo: &RepoSlug,
        params: &CreatePrParams,
    ) -> Result<PullRequestInfo> {
        self.record("create_pull");
        self.created.lock().unwrap().push(params.clone());

        let number = self.created.lock().unwrap().len() as u64;
        let mut pr = super::open_pr(number, None);
        pr.title = params.title.clone();
        pr.head.ref_field = params.head.clone();
        pr.base.ref_field = params.base.clone();
        Ok(pr)
    }

    async fn get_pull(&self, _repo: &RepoSlug, number: u64) -> Result<PullRequestInfo> {
        self.record("get_pull");
        match next_sticky(&self.pulls) {
            Some(Ok(pr)) => Ok(pr),
            Some(Err(message)) => Err(AgentError::GitHubApi(message)),
            None => Err(AgentError::NotFound(format!("pull request #{}", number))),
        }
    }

    async fn list_check_runs(&self, _repo: &RepoSlug, _sha: &str) -> Result<Vec<CheckRun>> {
        self.record("list_check_runs");
        Ok(next_sticky(&self.check_runs).unwrap_or_default())
    }

    async fn list_reviews(&self, _repo: &RepoSlug, _number: u64) -> Result<Vec<Review>> {
        self.record("list_reviews");
        Ok(next_sticky(&self.reviews).unwrap_or_default())
    }

    async fn merge_pull(
        &self,
        _repo: &RepoSlug,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResponse> {
        self.record("merge_pull");
        self.merges.lock().unwrap().push((number, method));
        Ok(self
            .merge_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(MergeResponse {
                sha: Some("merged-sha".to_string()),
                merged: true,
                message: "Pull Request successfully merged".to_string(),
            }))
    }
}
