use thiserror::Error;

/// Custom error types for the application.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the backend: {0}")]
    BackendRequest(reqwest::Error),
    #[error("Failed to deserialize the backend response: {0}")]
    BackendDeserialization(reqwest::Error),
    #[error("The backend returned an error: {0}")]
    BackendApi(String),
    #[error("No usable API key was found in any credential source")]
    MissingCredential,
    #[error("AI provider is missing")]
    MissingAiProvider,
    #[error("Knowledge base is missing")]
    MissingKnowledgeBase,
    #[error("No parseable plan found in the backend reply: {0}")]
    UnparseableResponse(String),
    #[error("Failed to load the knowledge base: {0}")]
    MalformedKnowledgeBase(String),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}
