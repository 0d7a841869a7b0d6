//! Pull request monitoring
//!
//! Polls a pull request until it becomes ready to merge or is closed. The
//! loop is bounded: after `max_attempts` snapshots it stops with
//! `MonitorState::TimedOut`.

use std::time::Duration;

use serde::Serialize;

use crate::core::config::PollingConfig;
use crate::core::RepoSlug;
use crate::error::Result;
use crate::github::pull_request::PullRequestHandler;
use crate::github::status::PullRequestStatus;

/// Where the monitor stands after a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    Polling,
    ReadyToMerge,
    Closed,
    Failed,
    TimedOut,
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MonitorState::Polling => "polling",
            MonitorState::ReadyToMerge => "ready_to_merge",
            MonitorState::Closed => "closed",
            MonitorState::Failed => "failed",
            MonitorState::TimedOut => "timed_out",
        };
        write!(f, "{}", name)
    }
}

/// Next state for a single snapshot; closed wins over ready
pub fn evaluate(status: &PullRequestStatus) -> MonitorState {
    if status.is_closed() {
        MonitorState::Closed
    } else if status.ready_to_merge() {
        MonitorState::ReadyToMerge
    } else {
        MonitorState::Polling
    }
}

/// How a watch ended
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub state: MonitorState,
    /// Snapshots taken, including the final one
    pub attempts: u32,
    /// Last snapshot seen
    pub status: Option<PullRequestStatus>,
}

/// Bounded polling loop over pull request status
#[derive(Debug, Clone)]
pub struct PrMonitor {
    interval: Duration,
    max_attempts: u32,
}

impl PrMonitor {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(config.interval(), config.max_attempts)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Poll until ready, closed, a request fails or attempts run out
    ///
    /// A failed request ends the watch with that error.
    pub async fn watch(
        &self,
        handler: &PullRequestHandler<'_>,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<MonitorReport> {
        let mut last = None;

        for attempt in 1..=self.max_attempts {
            let status = match handler.get_pr_status(repo, number).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::error!(
                        number,
                        attempt,
                        state = %MonitorState::Failed,
                        error = %e,
                        "stopped monitoring pull request"
                    );
                    return Err(e);
                }
            };

            let state = evaluate(&status);
            tracing::info!(
                number,
                attempt,
                state = %state,
                approved = status.is_approved(),
                checks_passing = status.checks_passing(),
                mergeable = ?status.mergeable,
                "pull request status"
            );

            if state != MonitorState::Polling {
                return Ok(MonitorReport {
                    state,
                    attempts: attempt,
                    status: Some(status),
                });
            }

            last = Some(status);
            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        tracing::warn!(
            number,
            attempts = self.max_attempts,
            "gave up waiting for pull request"
        );
        Ok(MonitorReport {
            state: MonitorState::TimedOut,
            attempts: self.max_attempts,
            status: last,
        })
    }
}
