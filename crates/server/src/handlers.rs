use crate::errors::AppError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use crashplan::providers::ai::anthropic::AnthropicProvider;
use crashplan::types::{CaseRecord, InvestigationPlan};
use crashplan::{export_questions, PlanGeneratorBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// The root handler.
pub async fn root() -> &'static str {
    "crashplan server is running."
}

/// The health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The handler for the `/plan` endpoint.
///
/// Takes one case record, resolves a credential (first non-empty source
/// wins; no backend request is made when that fails), performs the single
/// backend call, and remembers the decoded plan for the export surface.
pub async fn plan_handler(
    State(app_state): State<AppState>,
    Json(case): Json<CaseRecord>,
) -> Result<Json<InvestigationPlan>, AppError> {
    // One generation request per session at a time; concurrent
    // submissions are rejected rather than queued.
    let _in_flight = app_state
        .generation_lock
        .try_lock()
        .map_err(|_| AppError::GenerationInFlight)?;

    info!("Received plan request for incident at '{}'", case.location);

    // The credential gate runs before any client is constructed.
    let credential = {
        let session = app_state.session.read().await;
        app_state.credentials.resolve(&session)?
    };

    let config = &app_state.config;
    let provider = AnthropicProvider::with_timeout(
        config.api_url.clone(),
        credential,
        config.model.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let generator = PlanGeneratorBuilder::new()
        .ai_provider(Box::new(provider))
        .knowledge_base(app_state.knowledge_base.clone())
        .schema(config.plan_schema)
        .build()?;

    let plan = generator.generate(&case).await?;

    app_state.session.write().await.remember_plan(plan.clone());

    Ok(Json(plan))
}

/// The request body for the `/credential` endpoint.
#[derive(Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

/// The response body for the `/credential` endpoint.
#[derive(Serialize)]
pub struct CredentialResponse {
    pub cached: bool,
}

/// The handler for the `/credential` endpoint.
///
/// Caches an operator-supplied API key for the remainder of the session.
/// Sending an empty key clears the cached value.
pub async fn credential_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<CredentialRequest>,
) -> Json<CredentialResponse> {
    let mut session = app_state.session.write().await;
    session.cache_credential(&payload.api_key);
    Json(CredentialResponse {
        cached: session.cached_credential.is_some(),
    })
}

/// The handler for the `/plan/export` endpoint.
///
/// Flattens the last plan's interrogation questions into the plain-text
/// artifact the operator can download.
pub async fn export_handler(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state.session.read().await;
    let plan = session.last_plan.as_ref().ok_or(AppError::NoPlanYet)?;

    let text = export_questions(plan);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"investigation_questions.txt\"",
            ),
        ],
        text,
    ))
}
