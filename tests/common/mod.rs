//! Shared helpers for integration tests

#![allow(dead_code)]

mod log_capture;
mod scripted_api;
mod temp_repo;

pub use log_capture::capture_logs;
pub use scripted_api::ScriptedApi;
pub use temp_repo::TempGitRepo;

use git_agent::github::status::{
    CheckConclusion, CheckRun, MergeableState, PrState, Review, ReviewState, Reviewer,
};
use git_agent::github::pull_request::BranchRef;
use git_agent::github::PullRequestInfo;

/// An open pull request payload
pub fn open_pr(number: u64, mergeable: Option<bool>) -> PullRequestInfo {
    PullRequestInfo {
        number,
        state: PrState::Open,
        title: format!("PR {}", number),
        html_url: format!("https://github.com/octo/repo/pull/{}", number),
        merged: Some(false),
        mergeable,
        mergeable_state: Some(if mergeable == Some(true) {
            MergeableState::Clean
        } else {
            MergeableState::Unknown
        }),
        head: BranchRef {
            ref_field: "feature".to_string(),
            sha: format!("sha-{}", number),
        },
        base: BranchRef {
            ref_field: "main".to_string(),
            sha: "base-sha".to_string(),
        },
    }
}

/// A closed pull request payload
pub fn closed_pr(number: u64) -> PullRequestInfo {
    PullRequestInfo {
        state: PrState::Closed,
        ..open_pr(number, Some(false))
    }
}

pub fn approval() -> Review {
    Review {
        user: Some(Reviewer {
            login: "reviewer".to_string(),
        }),
        state: ReviewState::Approved,
    }
}

pub fn check(name: &str, conclusion: Option<CheckConclusion>) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        status: if conclusion.is_some() {
            "completed".to_string()
        } else {
            "in_progress".to_string()
        },
        conclusion,
    }
}
