//! CLI command definitions using clap
//!
//! Defines the command structure for the `git-agent` CLI tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::{ConflictResolution, MergeStrategy};
use crate::github::MergeMethod;

/// git-agent - automate git and GitHub pull request workflows
///
/// Local operations drive the `git` binary in the working copy. Pull request
/// operations use the GitHub REST API with the token from GITHUB_TOKEN.
#[derive(Parser, Debug)]
#[command(name = "git-agent", version, about, long_about = None)]
pub struct Cli {
    /// Working copy to operate on
    #[arg(long, global = true, default_value = ".")]
    pub path: PathBuf,

    /// GitHub repository as owner/name (defaults to the remote's URL)
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "GIT_AGENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the outcome as a JSON report
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pull from the remote
    Pull {
        /// Branch to pull (defaults to the upstream of the current branch)
        #[arg(long, short)]
        branch: Option<String>,
    },

    /// Create a branch and switch to it
    Branch {
        /// Name of the new branch
        name: String,
    },

    /// Stage everything, commit and push
    Push(PushArgs),

    /// Stash uncommitted changes
    Stash,

    /// Restore the most recent stash
    #[command(name = "stash-pop")]
    StashPop,

    /// Merge a feature branch into a base branch locally
    Merge(MergeArgs),

    /// List paths with unresolved merge conflicts
    Conflicts,

    /// Resolve a conflicted path
    Resolve(ResolveArgs),

    /// Show repository information from GitHub
    Repo,

    /// Manage pull requests
    Pr(PrArgs),

    /// Branch, push, open a pull request, wait for it and merge it
    Ship(ShipArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Local Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Push arguments
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Commit message
    #[arg(short, long)]
    pub message: String,

    /// Branch to push (defaults to the current branch)
    #[arg(long, short)]
    pub branch: Option<String>,
}

/// Merge arguments
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Branch to merge into
    pub base: String,

    /// Branch to merge
    pub feature: String,

    /// Merge strategy
    #[arg(long, short, default_value = "recursive")]
    pub strategy: StrategyArg,
}

/// Resolve arguments
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Conflicted path, relative to the repository root
    #[arg(id = "conflict_path", value_name = "PATH")]
    pub path: String,

    /// Which side to keep
    #[arg(long)]
    pub take: ResolutionArg,
}

/// Merge strategy choices
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum StrategyArg {
    #[default]
    Recursive,
    Ours,
    Theirs,
    Resolve,
    Octopus,
}

impl From<StrategyArg> for MergeStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Recursive => MergeStrategy::Recursive,
            StrategyArg::Ours => MergeStrategy::Ours,
            StrategyArg::Theirs => MergeStrategy::Theirs,
            StrategyArg::Resolve => MergeStrategy::Resolve,
            StrategyArg::Octopus => MergeStrategy::Octopus,
        }
    }
}

/// Conflict resolution choices
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ResolutionArg {
    Ours,
    Theirs,
    Both,
}

impl From<ResolutionArg> for ConflictResolution {
    fn from(arg: ResolutionArg) -> Self {
        match arg {
            ResolutionArg::Ours => ConflictResolution::Ours,
            ResolutionArg::Theirs => ConflictResolution::Theirs,
            ResolutionArg::Both => ConflictResolution::Both,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PR Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Pull request commands
#[derive(Parser, Debug)]
pub struct PrArgs {
    #[command(subcommand)]
    pub command: PrCommand,
}

#[derive(Subcommand, Debug)]
pub enum PrCommand {
    /// Create a new pull request
    Create {
        /// Target branch
        #[arg(long, default_value = "main")]
        base: String,

        /// Source branch (defaults to current branch)
        #[arg(long)]
        head: Option<String>,

        /// Pull request title
        #[arg(long, short)]
        title: String,

        /// Pull request body/description
        #[arg(long, short)]
        body: Option<String>,
    },

    /// Show approval, checks and mergeability
    Status {
        /// PR number
        number: u64,
    },

    /// Poll until the pull request is ready to merge or closed
    Watch {
        /// PR number
        number: u64,

        #[command(flatten)]
        polling: PollingArgs,
    },

    /// Merge a pull request that is ready
    Merge {
        /// PR number
        number: u64,

        /// Merge method
        #[arg(long, default_value = "merge")]
        method: MethodArg,
    },
}

/// Overrides for the configured polling settings
#[derive(Args, Debug, Clone, Default)]
pub struct PollingArgs {
    /// Seconds between status checks
    #[arg(long)]
    pub interval: Option<u64>,

    /// Status checks before giving up
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

/// Pull request merge methods
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum MethodArg {
    #[default]
    Merge,
    Squash,
    Rebase,
}

impl From<MethodArg> for MergeMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Merge => MergeMethod::Merge,
            MethodArg::Squash => MergeMethod::Squash,
            MethodArg::Rebase => MergeMethod::Rebase,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ship Command
// ─────────────────────────────────────────────────────────────────────────────

/// End-to-end workflow arguments
#[derive(Args, Debug)]
pub struct ShipArgs {
    /// Commit message, also used as the pull request title
    #[arg(short, long)]
    pub message: String,

    /// Branch to create (defaults to <prefix>-<unix timestamp>)
    #[arg(long)]
    pub branch: Option<String>,

    /// Prefix for generated branch names
    #[arg(long, default_value = "feature")]
    pub prefix: String,

    /// Branch the pull request targets
    #[arg(long, default_value = "main")]
    pub base: String,

    /// Pull request body/description
    #[arg(long)]
    pub body: Option<String>,

    /// Merge method once the pull request is ready
    #[arg(long, default_value = "merge")]
    pub method: MethodArg,

    #[command(flatten)]
    pub polling: PollingArgs,
}
