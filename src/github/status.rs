//! Pull request status snapshots
//!
//! A snapshot combines the pull request itself, the check runs on its head
//! commit and its reviews. The readiness predicates are evaluated on a single
//! snapshot so they always agree with each other.

use serde::{Deserialize, Serialize};

/// Open/closed state reported by GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
}

/// GitHub's computed mergeability of a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeableState {
    Clean,
    Dirty,
    Blocked,
    Behind,
    Unstable,
    HasHooks,
    Draft,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for MergeableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Clean => "clean",
            Self::Dirty => "dirty",
            Self::Blocked => "blocked",
            Self::Behind => "behind",
            Self::Unstable => "unstable",
            Self::HasHooks => "has_hooks",
            Self::Draft => "draft",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Conclusion of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    StartupFailure,
    #[serde(other)]
    Unknown,
}

/// A CI check run on a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRun {
    pub name: String,
    /// queued, in_progress or completed
    pub status: String,
    /// Absent until the run completes
    pub conclusion: Option<CheckConclusion>,
}

impl CheckRun {
    pub fn is_success(&self) -> bool {
        self.conclusion == Some(CheckConclusion::Success)
    }
}

/// Review verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Unknown,
}

/// Account that left a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reviewer {
    pub login: String,
}

/// A pull request review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub user: Option<Reviewer>,
    pub state: ReviewState,
}

/// True iff at least one review approves
pub fn is_approved(reviews: &[Review]) -> bool {
    reviews.iter().any(|r| r.state == ReviewState::Approved)
}

/// True iff every check run concluded successfully (vacuously true with none)
pub fn checks_passing(check_runs: &[CheckRun]) -> bool {
    check_runs.iter().all(CheckRun::is_success)
}

/// Everything needed to decide whether a pull request can be merged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequestStatus {
    pub number: u64,
    pub state: PrState,
    pub merged: bool,
    /// `None` while GitHub is still computing mergeability
    pub mergeable: Option<bool>,
    pub mergeable_state: MergeableState,
    pub head_sha: String,
    pub check_runs: Vec<CheckRun>,
    pub reviews: Vec<Review>,
}

impl PullRequestStatus {
    pub fn is_closed(&self) -> bool {
        self.state == PrState::Closed
    }

    pub fn is_approved(&self) -> bool {
        is_approved(&self.reviews)
    }

    pub fn checks_passing(&self) -> bool {
        checks_passing(&self.check_runs)
    }

    /// Unknown mergeability counts as not mergeable
    pub fn is_mergeable(&self) -> bool {
        self.mergeable == Some(true)
    }

    /// Approved, checks passing and mergeable, all on this snapshot
    pub fn ready_to_merge(&self) -> bool {
        self.is_mergeable() && self.is_approved() && self.checks_passing()
    }

    /// Human-readable reasons the pull request cannot be merged yet
    pub fn blocking_reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if self.is_closed() {
            reasons.push("pull request is closed".to_string());
        }
        if !self.is_approved() {
            reasons.push("not approved".to_string());
        }
        if !self.checks_passing() {
            let failing: Vec<&str> = self
                .check_runs
                .iter()
                .filter(|run| !run.is_success())
                .map(|run| run.name.as_str())
                .collect();
            reasons.push(format!("checks not passing ({})", failing.join(", ")));
        }
        match self.mergeable {
            Some(true) => {}
            Some(false) => reasons.push(format!("not mergeable ({})", self.mergeable_state)),
            None => reasons.push("mergeability still being computed".to_string()),
        }
        reasons
    }
}
