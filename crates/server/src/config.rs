//! # Application Configuration
//!
//! Environment-driven configuration for the intake server. Everything has a
//! sensible default except the knowledge base path, which must point at a
//! readable JSON document or startup fails.

use crashplan::credentials::API_KEY_NAME;
use crashplan::types::PlanSchema;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// The port for the server to listen on. `PORT`.
    pub port: u16,
    /// Path to the knowledge base JSON document. `KNOWLEDGE_BASE_PATH`.
    pub knowledge_base_path: String,
    /// Optional TOML secrets file, the secret-store credential source. `SECRETS_PATH`.
    pub secrets_path: Option<String>,
    /// Backend API origin. `ANTHROPIC_API_URL`.
    pub api_url: String,
    /// Backend model name. `ANTHROPIC_MODEL`.
    pub model: String,
    /// Reply-schema variant: "flat" or "interrogation". `PLAN_SCHEMA`.
    pub plan_schema: PlanSchema,
    /// Backend request timeout in seconds. `REQUEST_TIMEOUT_SECS`.
    pub request_timeout_secs: u64,
    /// Environment variable consulted first for the API key. Fixed in
    /// production; overridable so tests do not fight over `ANTHROPIC_API_KEY`.
    pub credential_env_var: String,
}

pub fn get_config() -> anyhow::Result<Config> {
    let port = match env::var("PORT") {
        Ok(value) => value.parse()?,
        Err(_) => 9090,
    };
    let plan_schema = match env::var("PLAN_SCHEMA") {
        Ok(value) => value
            .parse::<PlanSchema>()
            .map_err(|e| anyhow::anyhow!(e))?,
        Err(_) => PlanSchema::default(),
    };
    let request_timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
        Ok(value) => value.parse()?,
        Err(_) => 60,
    };

    Ok(Config {
        port,
        knowledge_base_path: env::var("KNOWLEDGE_BASE_PATH")
            .unwrap_or_else(|_| "investigation_knowledge.json".to_string()),
        secrets_path: env::var("SECRETS_PATH").ok().filter(|s| !s.is_empty()),
        api_url: env::var("ANTHROPIC_API_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
        model: env::var("ANTHROPIC_MODEL")
            .unwrap_or_else(|_| "claude-3-opus-20240229".to_string()),
        plan_schema,
        request_timeout_secs,
        credential_env_var: API_KEY_NAME.to_string(),
    })
}
