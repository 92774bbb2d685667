//! # Application State
//!
//! The shared state holds the immutable pieces (configuration, knowledge
//! base, credential chain) plus the session context the original kept in
//! page session state: the cached credential and the last generated plan.
//! A `try_lock`ed mutex enforces one generation request in flight at a time.

use crate::config::Config;
use crashplan::credentials::{CredentialChain, SessionContext};
use crashplan::KnowledgeBase;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Loaded once at startup; malformed input is fatal before we get here.
    pub knowledge_base: KnowledgeBase,
    pub credentials: CredentialChain,
    /// Per-session mutable state: cached credential and last plan.
    pub session: Arc<RwLock<SessionContext>>,
    /// Held for the duration of one generation call; `try_lock` failure
    /// means another submission is in flight and gets rejected.
    pub generation_lock: Arc<Mutex<()>>,
}

/// Builds the shared application state from the configuration.
///
/// Loading the knowledge base happens here, so a missing or malformed
/// document aborts startup before the listener binds.
pub fn build_app_state(config: Config) -> anyhow::Result<AppState> {
    let knowledge_base = KnowledgeBase::load(&config.knowledge_base_path)?;

    let mut credentials = CredentialChain::new().with_env_var(&config.credential_env_var);
    if let Some(path) = &config.secrets_path {
        credentials = credentials.with_secrets_file(path);
    }

    Ok(AppState {
        config: Arc::new(config),
        knowledge_base,
        credentials,
        session: Arc::new(RwLock::new(SessionContext::new())),
        generation_lock: Arc::new(Mutex::new(())),
    })
}
