//! git-agent - automation for git working copies and GitHub pull requests
//!
//! The local façade ([`core::GitRepository`]) drives the `git` binary; the
//! remote façade ([`github::PullRequestHandler`]) talks to the GitHub REST
//! API. Both report failures through [`AgentError`].

pub mod cli;
pub mod core;
pub mod error;
pub mod github;
pub mod logging;
pub mod report;

pub use error::{AgentError, Result};
