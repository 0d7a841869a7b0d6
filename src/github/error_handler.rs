//! GitHub API error classification
//!
//! Maps octocrab errors onto the specific `AgentError` variants callers can
//! react to: missing resources, rate limiting and refused merges.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AgentError;

/// Matches the "API rate limit exceeded" family of messages
static RATE_LIMIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(api )?rate limit|limit exceeded")
        .expect("Invalid regex pattern for rate limit detection")
});

/// Classifies an octocrab error into a more specific AgentError if possible
pub fn classify_github_error(err: octocrab::Error) -> AgentError {
    if let octocrab::Error::GitHub { source, .. } = &err {
        return classify_status(source.status_code.as_u16(), &source.message);
    }

    // Transport and decoding errors only carry useful detail in Debug form
    let error_message = format!("{:?}", err);

    if is_rate_limit_error(&error_message) {
        return AgentError::RateLimited;
    }

    if is_not_found_error(&error_message) {
        return AgentError::NotFound(error_message);
    }

    AgentError::GitHubApi(error_message)
}

/// Classify a GitHub error response by status code and message
pub fn classify_status(status: u16, message: &str) -> AgentError {
    match status {
        404 => AgentError::NotFound(message.to_string()),
        429 => AgentError::RateLimited,
        403 if is_rate_limit_error(message) => AgentError::RateLimited,
        // 405: merge refused, 409: head moved underneath the merge request
        405 | 409 => AgentError::PullRequestNotMergeable(message.to_string()),
        _ => AgentError::GitHubApi(format!("HTTP {}: {}", status, message)),
    }
}

fn is_rate_limit_error(error_message: &str) -> bool {
    RATE_LIMIT_PATTERN.is_match(error_message)
}

fn is_not_found_error(error_message: &str) -> bool {
    error_message.contains("404") || error_message.contains("Not Found")
}
