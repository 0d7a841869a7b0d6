//! GitHub API integration module
//!
//! This module provides the remote-hosting side of git-agent:
//! - Repository lookup
//! - Pull request creation, status and merging
//! - Bounded pull request monitoring
//! - Error classification

pub mod api;
pub mod client;
pub mod error_handler;
pub mod polling;
pub mod pull_request;
pub mod status;

pub use api::HostingApi;
pub use client::GitHubClient;
pub use error_handler::classify_github_error;
pub use polling::{MonitorReport, MonitorState, PrMonitor};
pub use pull_request::{CreatePrParams, MergeMethod, MergeResponse, PullRequestHandler, PullRequestInfo};
pub use status::PullRequestStatus;
