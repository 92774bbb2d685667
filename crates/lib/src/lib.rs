//! # Accident Investigation Planner
//!
//! This crate turns a structured traffic-accident record into an
//! investigation plan by prompting a configurable AI backend with the case
//! facts plus a static knowledge base, then defensively decoding the
//! JSON-structured reply. The HTTP intake surface lives in the server crate;
//! this crate owns the data model, credential resolution, prompt
//! construction, the backend client, decoding, and the question export.

pub mod credentials;
pub mod decode;
pub mod errors;
pub mod export;
pub mod knowledge;
pub mod prompts;
pub mod providers;
pub mod types;

pub use credentials::{CredentialChain, SessionContext, API_KEY_NAME};
pub use decode::decode_plan;
pub use errors::PlanError;
pub use export::export_questions;
pub use knowledge::KnowledgeBase;
pub use types::{CaseRecord, InvestigationPlan, PlanSchema};

use providers::ai::AiProvider;
use tracing::{debug, info};

/// A single-shot generator: one case record in, one plan (or error) out.
///
/// Holds no mutable state and performs exactly one backend call per
/// invocation; failures surface immediately, no retries.
#[derive(Debug, Clone)]
pub struct PlanGenerator {
    ai_provider: Box<dyn AiProvider>,
    knowledge_base: KnowledgeBase,
    schema: PlanSchema,
}

/// A builder for creating `PlanGenerator` instances.
#[derive(Default)]
pub struct PlanGeneratorBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    knowledge_base: Option<KnowledgeBase>,
    schema: PlanSchema,
}

impl PlanGeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider that performs the backend call.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Sets the knowledge base forwarded into every prompt.
    pub fn knowledge_base(mut self, knowledge_base: KnowledgeBase) -> Self {
        self.knowledge_base = Some(knowledge_base);
        self
    }

    /// Selects the reply-schema variant the prompt asks for.
    pub fn schema(mut self, schema: PlanSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn build(self) -> Result<PlanGenerator, PlanError> {
        Ok(PlanGenerator {
            ai_provider: self.ai_provider.ok_or(PlanError::MissingAiProvider)?,
            knowledge_base: self.knowledge_base.ok_or(PlanError::MissingKnowledgeBase)?,
            schema: self.schema,
        })
    }
}

impl PlanGenerator {
    /// Generates an investigation plan for one case record.
    ///
    /// The record is normalized first so that absent participants carry no
    /// details. The caller must have resolved a credential already; this
    /// method assumes the provider it holds is ready to talk to the backend.
    pub async fn generate(&self, case: &CaseRecord) -> Result<InvestigationPlan, PlanError> {
        let case = case.clone().normalized();

        let knowledge_context = self.knowledge_base.to_prompt_context()?;
        let system_prompt = prompts::system_prompt(self.schema);
        let user_prompt = prompts::build_user_prompt(self.schema, &case, &knowledge_context)?;

        debug!(
            schema = ?self.schema,
            prompt_bytes = user_prompt.len(),
            "--> Sending case to the AI provider"
        );
        let raw_reply = self.ai_provider.generate(system_prompt, &user_prompt).await?;
        debug!("<-- Reply from AI: {} bytes", raw_reply.len());

        let plan = decode_plan(&raw_reply)?;
        info!(
            situation_type = plan.situation_type.as_deref().unwrap_or(""),
            actions = plan.primary_actions.len(),
            "Decoded investigation plan"
        );
        Ok(plan)
    }
}
