use crate::errors::PlanError;
use crate::types::{CaseRecord, PlanSchema};
use serde::Serialize;

/// The persona for the flat-schema variant.
pub const FLAT_SYSTEM_PROMPT: &str = "Ты - эксперт по расследованию ДТП. Твоя задача - помогать следователям планировать расследование.";

/// The persona for the interrogation-schema variant, which additionally
/// pins the backend to the nested reply format.
pub const INTERROGATION_SYSTEM_PROMPT: &str = "Ты - опытный следователь-криминалист, специализирующийся на расследовании ДТП. Твоя задача - помочь составить подробный план расследования и список вопросов для допроса всех участников. Строго придерживайся указанного формата JSON в ответе.";

/// The reply schema the flat variant asks for.
const FLAT_REPLY_SCHEMA: &str = r#"{
    "situation_type": "Определенный тип ситуации",
    "primary_actions": ["список первоочередных действий"],
    "required_examinations": ["список необходимых экспертиз"],
    "witness_questions": ["список вопросов для допроса"],
    "special_recommendations": ["особые рекомендации по расследованию"]
}"#;

/// The reply schema the interrogation variant asks for.
const INTERROGATION_REPLY_SCHEMA: &str = r#"{
    "situation_type": "описание типа ситуации",
    "primary_actions": ["список первоочередных действий"],
    "required_examinations": ["список необходимых экспертиз"],
    "interrogation_plan": {
        "witness_questions": {
            "general": ["общие вопросы для свидетелей"],
            "specific": ["вопросы с учетом конкретной ситуации"],
            "technical": ["вопросы о технических аспектах"]
        },
        "driver_questions": {
            "pre_incident": ["вопросы о событиях до ДТП"],
            "incident": ["вопросы о самом ДТП"],
            "post_incident": ["вопросы о действиях после ДТП"],
            "technical": ["вопросы о техническом состоянии ТС"]
        },
        "victim_questions": {
            "pre_incident": ["вопросы о событиях до ДТП"],
            "incident": ["вопросы о самом ДТП"],
            "health": ["вопросы о состоянии здоровья"]
        }
    },
    "special_recommendations": ["особые рекомендации по расследованию"]
}"#;

/// The system instruction for the given schema variant.
pub fn system_prompt(schema: PlanSchema) -> &'static str {
    match schema {
        PlanSchema::Flat => FLAT_SYSTEM_PROMPT,
        PlanSchema::Interrogation => INTERROGATION_SYSTEM_PROMPT,
    }
}

// serde already owns the Russian labels, so the emphasis block reuses them
// instead of duplicating the strings here.
fn label<T: Serialize>(value: &T) -> Result<String, PlanError> {
    let value = serde_json::to_value(value)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

/// Builds the user prompt: the serialized case record, the full knowledge
/// base, and the exact reply schema the backend must produce.
pub fn build_user_prompt(
    schema: PlanSchema,
    case: &CaseRecord,
    knowledge_context: &str,
) -> Result<String, PlanError> {
    let case_json = serde_json::to_string_pretty(case)?;

    match schema {
        PlanSchema::Flat => Ok(format!(
            "На основе следующих обстоятельств ДТП определи тип ситуации и предложи план расследования:\n\n\
             Обстоятельства дела:\n{case_json}\n\n\
             База знаний:\n{knowledge_context}\n\n\
             Пожалуйста, верни ответ в формате JSON со следующей структурой:\n{FLAT_REPLY_SCHEMA}"
        )),
        PlanSchema::Interrogation => {
            let incident_type = label(&case.incident_type)?;
            let weather = label(&case.conditions.weather)?;
            let lighting = label(&case.conditions.lighting)?;
            Ok(format!(
                "На основе следующих обстоятельств ДТП определи тип ситуации и предложи план расследования.\n\n\
                 Обстоятельства дела:\n{case_json}\n\n\
                 База знаний:\n{knowledge_context}\n\n\
                 На основе анализа этих данных, пожалуйста:\n\
                 1. Определи тип следственной ситуации\n\
                 2. Составь список первоочередных действий\n\
                 3. Предложи необходимые экспертизы\n\
                 4. Составь подробный план допросов участников\n\n\
                 Важно: верни ответ строго в следующем формате JSON (все поля обязательны):\n{INTERROGATION_REPLY_SCHEMA}\n\n\
                 Обязательно включи все секции вопросов, учитывая:\n\
                 - Тип ДТП ({incident_type})\n\
                 - Наличие/отсутствие участников (водитель: {driver}, потерпевший: {victim})\n\
                 - Условия происшествия (погода: {weather}, освещение: {lighting})",
                driver = case.participants.driver.present,
                victim = case.participants.victim.present,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn case() -> CaseRecord {
        CaseRecord {
            date_time: "2024-03-14".into(),
            location: "трасса М-4, 211 км".into(),
            incident_type: IncidentType::Collision,
            participants: Participants {
                vehicle: Participant::present(VehicleDetails {
                    vehicle_type: "ВАЗ-2114".into(),
                    damage: "деформация передней части".into(),
                }),
                victim: Participant::absent(),
                driver: Participant::present(DriverDetails {
                    condition: DriverCondition::Normal,
                }),
            },
            conditions: Conditions {
                weather: Weather::Fog,
                road: RoadCondition::Wet,
                lighting: Lighting::Twilight,
            },
        }
    }

    #[test]
    fn flat_prompt_embeds_case_knowledge_and_schema() {
        let prompt = build_user_prompt(PlanSchema::Flat, &case(), "{\"база\": 1}").unwrap();
        assert!(prompt.contains("трасса М-4"));
        assert!(prompt.contains("\"база\": 1"));
        assert!(prompt.contains("\"witness_questions\""));
        assert!(!prompt.contains("interrogation_plan"));
    }

    #[test]
    fn interrogation_prompt_repeats_the_key_circumstances() {
        let prompt =
            build_user_prompt(PlanSchema::Interrogation, &case(), "{}").unwrap();
        assert!(prompt.contains("interrogation_plan"));
        assert!(prompt.contains("Тип ДТП (столкновение)"));
        assert!(prompt.contains("водитель: true"));
        assert!(prompt.contains("потерпевший: false"));
        assert!(prompt.contains("погода: туман"));
        assert!(prompt.contains("освещение: сумерки"));
    }

    #[test]
    fn personas_differ_per_schema() {
        assert_ne!(
            system_prompt(PlanSchema::Flat),
            system_prompt(PlanSchema::Interrogation)
        );
    }
}
