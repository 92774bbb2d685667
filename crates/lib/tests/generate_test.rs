//! # Plan Generation Tests
//!
//! End-to-end tests for the generator against a mocked Anthropic backend,
//! including the credential gate that must stop a submission before any
//! request leaves the process.

use crashplan::credentials::{CredentialChain, SessionContext};
use crashplan::providers::ai::anthropic::AnthropicProvider;
use crashplan::types::*;
use crashplan::{KnowledgeBase, PlanError, PlanGeneratorBuilder};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{any, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .try_init();
}

fn sample_case() -> CaseRecord {
    CaseRecord {
        date_time: "2024-03-14".to_string(),
        location: "перекресток ул. Мира и ул. Садовой".to_string(),
        incident_type: IncidentType::PedestrianStrike,
        participants: Participants {
            vehicle: Participant::absent(),
            victim: Participant::present(VictimDetails {
                condition: VictimCondition::Injured,
            }),
            driver: Participant::present(DriverDetails {
                condition: DriverCondition::Normal,
            }),
        },
        conditions: Conditions {
            weather: Weather::Rain,
            road: RoadCondition::Wet,
            lighting: Lighting::Dark,
        },
    }
}

fn anthropic_reply(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "model": "claude-3-opus-20240229",
        "stop_reason": "end_turn"
    })
}

fn generator_against(server: &MockServer, schema: PlanSchema) -> crashplan::PlanGenerator {
    let provider =
        AnthropicProvider::new(server.uri(), "test-key".to_string(), "claude-3-opus-20240229".to_string())
            .unwrap();
    PlanGeneratorBuilder::new()
        .ai_provider(Box::new(provider))
        .knowledge_base(KnowledgeBase::from_value(
            json!({"тактика": ["осмотр места происшествия"]}),
        ))
        .schema(schema)
        .build()
        .unwrap()
}

#[tokio::test]
async fn valid_credential_and_reply_yield_a_populated_plan() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;

    let plan_json = json!({
        "situation_type": "наезд на пешехода в темное время при дожде",
        "primary_actions": ["осмотр места происшествия", "фиксация следов торможения"],
        "required_examinations": ["автотехническая экспертиза", "судебно-медицинская экспертиза"],
        "witness_questions": ["Что вы видели?"]
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-opus-20240229",
            "temperature": 0.0,
            "max_tokens": 2000
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(anthropic_reply(&plan_json.to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    // --- 2. Act ---
    let generator = generator_against(&server, PlanSchema::Flat);
    let plan = generator.generate(&sample_case()).await.unwrap();

    // --- 3. Assert ---
    assert!(!plan.situation_type.as_deref().unwrap_or("").is_empty());
    assert_eq!(plan.primary_actions.len(), 2);
    assert_eq!(plan.required_examinations.len(), 2);
}

#[tokio::test]
async fn prose_wrapped_reply_is_recovered_via_fallback() {
    setup_tracing();
    let server = MockServer::start().await;

    let reply_text = r#"Here is the plan: {"situation_type":"A","primary_actions":[],"required_examinations":[]} Thanks."#;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_reply(reply_text)))
        .mount(&server)
        .await;

    let generator = generator_against(&server, PlanSchema::Interrogation);
    let plan = generator.generate(&sample_case()).await.unwrap();

    assert_eq!(plan.situation_type.as_deref(), Some("A"));
    assert!(plan.primary_actions.is_empty());
    assert!(plan.required_examinations.is_empty());
}

#[tokio::test]
async fn backend_error_text_is_surfaced_verbatim() {
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"error": {"type": "authentication_error"}}"#),
        )
        .mount(&server)
        .await;

    let generator = generator_against(&server, PlanSchema::Interrogation);
    let err = generator.generate(&sample_case()).await.unwrap_err();

    match err {
        PlanError::BackendApi(text) => assert!(text.contains("authentication_error")),
        other => panic!("Expected BackendApi, got {other:?}"),
    }
}

#[tokio::test]
async fn reply_without_json_is_unparseable() {
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(anthropic_reply("Не могу составить план в формате JSON.")),
        )
        .mount(&server)
        .await;

    let generator = generator_against(&server, PlanSchema::Flat);
    let err = generator.generate(&sample_case()).await.unwrap_err();

    match err {
        PlanError::UnparseableResponse(raw) => {
            assert!(raw.contains("Не могу составить план"))
        }
        other => panic!("Expected UnparseableResponse, got {other:?}"),
    }
}

/// The caller-side flow: resolve a credential first, and only then build a
/// provider and generate. Mirrors what the intake handler does, so a resolve
/// failure provably short-circuits the whole generation attempt.
async fn submit_case(
    chain: &CredentialChain,
    session: &SessionContext,
    server: &MockServer,
    case: &CaseRecord,
) -> Result<InvestigationPlan, PlanError> {
    let credential = chain.resolve(session)?;
    let provider = AnthropicProvider::new(
        server.uri(),
        credential,
        "claude-3-opus-20240229".to_string(),
    )?;
    let generator = PlanGeneratorBuilder::new()
        .ai_provider(Box::new(provider))
        .knowledge_base(KnowledgeBase::from_value(json!({"тактика": []})))
        .schema(PlanSchema::Interrogation)
        .build()?;
    generator.generate(case).await
}

#[tokio::test]
async fn missing_credential_issues_zero_backend_requests() {
    setup_tracing();
    let server = MockServer::start().await;

    // The backend must never be contacted for this submission. Were the
    // resolve step to yield a key, submit_case would hit this mock.
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let chain = CredentialChain::new()
        .with_env_var("CRASHPLAN_TEST_KEY_GATE")
        .with_secrets_file("/nonexistent/secrets.toml");
    let session = SessionContext::new();

    let result = submit_case(&chain, &session, &server, &sample_case()).await;
    assert!(matches!(result, Err(PlanError::MissingCredential)));

    server.verify().await;
}

#[tokio::test]
async fn hung_backend_times_out_as_a_request_failure() {
    setup_tracing();
    let server = MockServer::start().await;

    // The reply is well-formed but arrives after the client's deadline.
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(anthropic_reply("{}"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let provider = AnthropicProvider::with_timeout(
        server.uri(),
        "test-key".to_string(),
        "claude-3-opus-20240229".to_string(),
        Duration::from_millis(200),
    )
    .unwrap();
    let generator = PlanGeneratorBuilder::new()
        .ai_provider(Box::new(provider))
        .knowledge_base(KnowledgeBase::from_value(json!({"тактика": []})))
        .schema(PlanSchema::Flat)
        .build()
        .unwrap();

    let err = generator.generate(&sample_case()).await.unwrap_err();
    match err {
        PlanError::BackendRequest(e) => assert!(e.is_timeout(), "expected a timeout, got {e:?}"),
        other => panic!("Expected BackendRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn interrogation_prompt_reaches_the_backend_with_the_case_facts() {
    setup_tracing();
    let server = MockServer::start().await;

    let plan_json = json!({
        "situation_type": "столкновение",
        "primary_actions": ["осмотр"],
        "required_examinations": ["трасологическая"]
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user"}]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(anthropic_reply(&plan_json.to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let generator = generator_against(&server, PlanSchema::Interrogation);
    generator.generate(&sample_case()).await.unwrap();

    // One request total: no retries on success either.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user_prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(user_prompt.contains("наезд на пешехода"));
    assert!(user_prompt.contains("осмотр места происшествия"));
    assert!(user_prompt.contains("interrogation_plan"));
    assert!(body["system"].as_str().unwrap().contains("следователь"));
}
