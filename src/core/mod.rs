//! Core functionality for git-agent
//!
//! This module contains the local side of the tool:
//! - Git working copy operations
//! - Merge strategies and conflict handling
//! - Repository naming and detection
//! - Credentials and application configuration

pub mod config;
pub mod credentials;
pub mod git;
pub mod merge;
pub mod repository;

pub use config::Config;
pub use credentials::Credentials;
pub use git::GitRepository;
pub use merge::{ConflictResolution, MergeStrategy};
pub use repository::RepoSlug;
