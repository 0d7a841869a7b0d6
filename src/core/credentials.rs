//! GitHub credentials
//!
//! The token comes from the process environment. A `.env` file in the
//! working directory is loaded first so local setups can keep the token out
//! of their shell profile. Variables already set in the environment win.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{AgentError, Result};

/// Environment variable holding the GitHub token
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Credentials used to authenticate against the GitHub API
pub struct Credentials {
    token: SecretString,
}

impl Credentials {
    /// Wrap an existing token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Load `.env` (if present) and read `GITHUB_TOKEN`
    ///
    /// ## Errors
    ///
    /// - `MissingToken` - the variable is unset or empty
    pub fn from_env() -> Result<Self> {
        load_env_file(Path::new(".env"));
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the token through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(TOKEN_ENV_VAR) {
            Some(token) if !token.trim().is_empty() => Ok(Self::new(token.trim())),
            _ => {
                tracing::error!("GitHub token not found in environment variables");
                Err(AgentError::MissingToken)
            }
        }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Masked form of the token for display
    pub fn masked(&self) -> String {
        mask_token(self.token.expose_secret())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.masked())
            .finish()
    }
}

/// Load a dotenv file without overriding variables already set
pub fn load_env_file(path: &Path) {
    if !path.exists() {
        return;
    }
    match dotenvy::from_path(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not load environment file"),
    }
}

/// Mask a token for display (show first 4 and last 4 characters)
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
