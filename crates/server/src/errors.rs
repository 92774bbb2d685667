use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crashplan::PlanError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within
/// the server, allowing them to be converted into appropriate HTTP responses.
pub enum AppError {
    /// Errors originating from the `crashplan` library.
    Plan(PlanError),
    /// Another generation request is already in flight for this session.
    GenerationInFlight,
    /// The export surface was hit before any plan was generated.
    NoPlanYet,
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        AppError::Plan(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Plan(err) => {
                // Log the original error for debugging purposes.
                error!("PlanError: {:?}", err);
                match err {
                    PlanError::MissingCredential => (
                        StatusCode::UNAUTHORIZED,
                        "No API key found. Supply one via POST /credential, the secrets file, or the environment.".to_string(),
                    ),
                    PlanError::BackendRequest(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to the backend failed: {e}"),
                    ),
                    PlanError::BackendDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize the backend response: {e}"),
                    ),
                    PlanError::BackendApi(e) => {
                        (StatusCode::BAD_GATEWAY, format!("Backend error: {e}"))
                    }
                    // The raw reply rides along so the operator can diagnose it.
                    PlanError::UnparseableResponse(raw) => (
                        StatusCode::BAD_GATEWAY,
                        format!("No parseable plan found in the backend reply: {raw}"),
                    ),
                    PlanError::MalformedKnowledgeBase(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Knowledge base failure: {e}"),
                    ),
                    PlanError::MissingAiProvider | PlanError::MissingKnowledgeBase => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                    ),
                    PlanError::ReqwestClientBuild(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to build HTTP client: {e}"),
                    ),
                    PlanError::Regex(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Internal regex error: {e}"),
                    ),
                    PlanError::JsonSerialization(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to serialize request data: {e}"),
                    ),
                }
            }
            AppError::GenerationInFlight => (
                StatusCode::CONFLICT,
                "A plan generation request is already in progress for this session.".to_string(),
            ),
            AppError::NoPlanYet => (
                StatusCode::NOT_FOUND,
                "No plan has been generated yet.".to_string(),
            ),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
