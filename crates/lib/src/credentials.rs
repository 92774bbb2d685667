//! # Credential Resolution
//!
//! The backend API key can arrive from three places. Resolution order is
//! fixed and the first non-empty value wins:
//!
//! 1. a process environment variable (`ANTHROPIC_API_KEY`),
//! 2. a TOML secrets file (the deployment-platform secret-store analog),
//! 3. a value the operator supplied earlier in the session.
//!
//! When every source is empty the caller gets `MissingCredential` and must
//! prompt the operator instead of calling the backend.

use crate::errors::PlanError;
use crate::types::InvestigationPlan;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// The credential key looked up in the environment and the secrets file.
pub const API_KEY_NAME: &str = "ANTHROPIC_API_KEY";

/// Per-session mutable state, owned by the caller and passed explicitly.
///
/// There is deliberately no process-wide singleton here: one session object
/// per operator session, nothing shared.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// A key the operator entered interactively, kept for the session.
    pub cached_credential: Option<String>,
    /// The most recently generated plan, kept for the export surface.
    pub last_plan: Option<InvestigationPlan>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caches an operator-supplied key for the remainder of the session.
    /// Empty input clears the cache instead.
    pub fn cache_credential(&mut self, key: &str) {
        let key = key.trim();
        self.cached_credential = if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        };
    }

    pub fn remember_plan(&mut self, plan: InvestigationPlan) {
        self.last_plan = Some(plan);
    }
}

/// The ordered lookup chain for the backend API key.
#[derive(Debug, Clone)]
pub struct CredentialChain {
    env_var: String,
    secrets_path: Option<PathBuf>,
}

impl Default for CredentialChain {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialChain {
    pub fn new() -> Self {
        Self {
            env_var: API_KEY_NAME.to_string(),
            secrets_path: None,
        }
    }

    /// Adds a TOML secrets file as the second lookup source.
    pub fn with_secrets_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.secrets_path = Some(path.into());
        self
    }

    /// Overrides the environment variable name. Tests use this to avoid
    /// clashing over the real `ANTHROPIC_API_KEY`.
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    /// Resolves the credential, first non-empty source wins.
    ///
    /// Must be called before any backend request is constructed; a
    /// `MissingCredential` result means zero requests go out.
    pub fn resolve(&self, session: &SessionContext) -> Result<String, PlanError> {
        if let Ok(key) = env::var(&self.env_var) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        if let Some(key) = self.from_secrets_file() {
            return Ok(key);
        }

        if let Some(key) = &session.cached_credential {
            if !key.trim().is_empty() {
                return Ok(key.clone());
            }
        }

        Err(PlanError::MissingCredential)
    }

    /// Reads the key from the secrets file, if one is configured and present.
    /// A missing or unreadable file is not an error, it just yields nothing.
    fn from_secrets_file(&self) -> Option<String> {
        let path = self.secrets_path.as_ref()?;
        let content = fs::read_to_string(path).ok()?;
        let table: toml::Table = match content.parse() {
            Ok(table) => table,
            Err(e) => {
                warn!("Ignoring malformed secrets file '{}': {e}", path.display());
                return None;
            }
        };
        table
            .get(&self.env_var)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}
