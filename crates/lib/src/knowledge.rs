//! # Knowledge Base Loading
//!
//! The knowledge base is a static JSON reference document on investigative
//! tactics. It is loaded once at startup, never mutated, and forwarded
//! verbatim (pretty-printed) into every prompt as additional context.

use crate::errors::PlanError;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// The immutable reference document consulted by every prompt.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    document: Value,
}

impl KnowledgeBase {
    /// Loads the knowledge base from a JSON file.
    ///
    /// Failure here is fatal by contract: the caller must refuse to serve
    /// any request without a well-formed knowledge base.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PlanError::MalformedKnowledgeBase(format!(
                "failed to read '{}': {e}",
                path.display()
            ))
        })?;
        let document: Value = serde_json::from_str(&content).map_err(|e| {
            PlanError::MalformedKnowledgeBase(format!(
                "failed to parse '{}': {e}",
                path.display()
            ))
        })?;
        Ok(Self { document })
    }

    /// Wraps an already-parsed document. Used by tests and embedders.
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    /// The pretty-printed form embedded into prompts.
    pub fn to_prompt_context(&self) -> Result<String, PlanError> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }
}
