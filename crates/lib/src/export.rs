//! # Question Export
//!
//! Flattens every interrogation question in a plan into a plain-text
//! document with section headers, offered to the operator as a downloadable
//! artifact. Absent groups are skipped silently; an empty plan exports to an
//! empty string.

use crate::types::InvestigationPlan;

fn push_section(lines: &mut Vec<String>, title: &str, questions: &Option<Vec<String>>) {
    if let Some(questions) = questions {
        if questions.is_empty() {
            return;
        }
        lines.push(format!("\n{title}:"));
        lines.extend(questions.iter().map(|q| format!("• {q}")));
    }
}

/// Renders the flattened question list across all role/category groups.
pub fn export_questions(plan: &InvestigationPlan) -> String {
    let mut lines: Vec<String> = Vec::new();

    // Flat-schema replies carry a single undifferentiated witness list.
    if let Some(questions) = &plan.witness_questions {
        if !questions.is_empty() {
            lines.push("\n=== ВОПРОСЫ ДЛЯ СВИДЕТЕЛЕЙ ===\n".to_string());
            lines.extend(questions.iter().map(|q| format!("• {q}")));
        }
    }

    let Some(interrogation) = &plan.interrogation_plan else {
        return lines.join("\n");
    };

    if let Some(witness) = &interrogation.witness_questions {
        lines.push("\n=== ВОПРОСЫ ДЛЯ СВИДЕТЕЛЕЙ ===\n".to_string());
        push_section(&mut lines, "Общие вопросы", &witness.general);
        push_section(&mut lines, "Специфические вопросы", &witness.specific);
        push_section(&mut lines, "Технические аспекты", &witness.technical);
    }

    if let Some(driver) = &interrogation.driver_questions {
        lines.push("\n=== ВОПРОСЫ ДЛЯ ВОДИТЕЛЯ ===\n".to_string());
        push_section(&mut lines, "События до ДТП", &driver.pre_incident);
        push_section(&mut lines, "О происшествии", &driver.incident);
        push_section(&mut lines, "После происшествия", &driver.post_incident);
        push_section(&mut lines, "Техническое состояние ТС", &driver.technical);
    }

    if let Some(victim) = &interrogation.victim_questions {
        lines.push("\n=== ВОПРОСЫ ДЛЯ ПОТЕРПЕВШЕГО ===\n".to_string());
        push_section(&mut lines, "События до ДТП", &victim.pre_incident);
        push_section(&mut lines, "О происшествии", &victim.incident);
        push_section(&mut lines, "Состояние здоровья", &victim.health);
    }

    lines.join("\n")
}
