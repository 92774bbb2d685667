pub mod anthropic;

use crate::errors::PlanError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This trait defines a common interface for obtaining a raw text completion
/// from a Large Language Model backend. The caller owns prompt construction
/// and reply decoding; the provider only moves text across the wire.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    ///
    /// The result is the raw reply text, expected (but not guaranteed)
    /// to contain a JSON document.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, PlanError>;
}

dyn_clone::clone_trait_object!(AiProvider);
