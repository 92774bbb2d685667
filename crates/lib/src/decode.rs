//! # Reply Decoding
//!
//! The backend is asked for pure JSON but routinely wraps it in prose. The
//! decoder reproduces the original fallback order exactly: parse the whole
//! reply, then the greedy first-`{`-to-last-`}` substring, then fail with
//! the raw reply attached for diagnosis. It never returns a partial plan.

use crate::errors::PlanError;
use crate::types::InvestigationPlan;
use regex::Regex;
use tracing::debug;

/// Decodes a backend reply into an `InvestigationPlan`.
pub fn decode_plan(reply: &str) -> Result<InvestigationPlan, PlanError> {
    // 1. The whole reply may already be the JSON document.
    if let Ok(plan) = serde_json::from_str::<InvestigationPlan>(reply) {
        return Ok(plan);
    }

    // 2. Greedy brace match: first `{` through last `}`.
    let re = Regex::new(r"(\{[\s\S]*\})")?;
    if let Some(captures) = re.captures(reply) {
        let candidate = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        debug!("Whole-reply parse failed, trying extracted block of {} bytes", candidate.len());
        if let Ok(plan) = serde_json::from_str::<InvestigationPlan>(candidate) {
            return Ok(plan);
        }
    }

    Err(PlanError::UnparseableResponse(reply.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_reply_json_parses_directly() {
        let reply = r#"{"situation_type":"наезд в темное время","primary_actions":["осмотр"],"required_examinations":["автотехническая"]}"#;
        let plan = decode_plan(reply).unwrap();
        assert_eq!(plan.situation_type.as_deref(), Some("наезд в темное время"));
        assert_eq!(plan.primary_actions, vec!["осмотр"]);
        assert_eq!(plan.required_examinations, vec!["автотехническая"]);
    }

    #[test]
    fn json_wrapped_in_prose_is_recovered() {
        let reply = r#"Here is the plan: {"situation_type":"A","primary_actions":[],"required_examinations":[]} Thanks."#;
        let plan = decode_plan(reply).unwrap();
        assert_eq!(plan.situation_type.as_deref(), Some("A"));
        assert!(plan.primary_actions.is_empty());
        assert!(plan.required_examinations.is_empty());
    }

    #[test]
    fn nested_braces_inside_the_document_survive_extraction() {
        let reply = "Ответ:\n{\"interrogation_plan\": {\"driver_questions\": {\"incident\": [\"Где вы находились?\"]}}}\nКонец.";
        let plan = decode_plan(reply).unwrap();
        let questions = plan
            .interrogation_plan
            .unwrap()
            .driver_questions
            .unwrap()
            .incident
            .unwrap();
        assert_eq!(questions, vec!["Где вы находились?"]);
    }

    #[test]
    fn reply_without_braces_is_unparseable() {
        let err = decode_plan("Извините, не могу помочь.").unwrap_err();
        match err {
            PlanError::UnparseableResponse(raw) => {
                assert_eq!(raw, "Извините, не могу помочь.")
            }
            other => panic!("Expected UnparseableResponse, got {other:?}"),
        }
    }

    #[test]
    fn braces_around_garbage_still_fail_cleanly() {
        let err = decode_plan("plan { not json at all }").unwrap_err();
        assert!(matches!(err, PlanError::UnparseableResponse(_)));
    }

    #[test]
    fn never_returns_a_best_guess_structure() {
        // Truncated document: direct parse and extraction both fail.
        let reply = r#"{"situation_type": "A", "primary_actions": ["x""#;
        assert!(matches!(
            decode_plan(reply),
            Err(PlanError::UnparseableResponse(_))
        ));
    }
}
