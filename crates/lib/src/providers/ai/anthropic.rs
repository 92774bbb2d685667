use crate::{errors::PlanError, providers::ai::AiProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

// --- Anthropic-specific request and response structures ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    /// Fixed at zero for determinism of phrasing.
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize, Debug)]
struct ContentBlock {
    text: String,
}

// --- Anthropic Provider implementation ---

/// A provider for interacting with the Anthropic Messages API.
#[derive(Clone, Debug)]
pub struct AnthropicProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    /// Creates a new `AnthropicProvider` with the default request timeout.
    ///
    /// `api_url` is the API origin (e.g. `https://api.anthropic.com`); the
    /// `/v1/messages` path is appended per request.
    pub fn new(api_url: String, api_key: String, model: String) -> Result<Self, PlanError> {
        Self::with_timeout(api_url, api_key, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new `AnthropicProvider` with an explicit request timeout.
    /// A hung backend surfaces as `BackendRequest` once the timeout expires.
    pub fn with_timeout(
        api_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, PlanError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(PlanError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    /// Sends one messages request. No retries: a failure surfaces
    /// immediately to the caller.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PlanError> {
        let request_body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await
            .map_err(PlanError::BackendRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PlanError::BackendApi(error_text));
        }

        let messages_response: MessagesResponse = response
            .json()
            .await
            .map_err(PlanError::BackendDeserialization)?;

        let raw_response = messages_response
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();

        Ok(raw_response)
    }
}
