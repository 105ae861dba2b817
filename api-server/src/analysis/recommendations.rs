// Care recommendations per disease and severity

use skinscan_core::{Recommendations, SeverityLevel, Urgency};

use super::tables::{self, DEFAULT_CARE, LOW_CONFIDENCE_NOTE, SYMPTOM_ADVICE};
use super::prediction::LOW_CONFIDENCE;

const MAX_SYMPTOM_ADVICE: usize = 2;

/// Symptom-specific advice lines, in table order
fn symptom_advice(symptoms: &[String]) -> Vec<&'static str> {
    if symptoms.is_empty() {
        return Vec::new();
    }
    let text = symptoms.join(" ").to_lowercase();
    SYMPTOM_ADVICE
        .iter()
        .filter(|(keyword, _)| text.contains(keyword))
        .map(|(_, advice)| *advice)
        .take(MAX_SYMPTOM_ADVICE)
        .collect()
}

pub fn generate_recommendations(
    disease: &str,
    level: SeverityLevel,
    urgency: Urgency,
    symptoms: &[String],
    confidence: f64,
) -> Recommendations {
    let plan = tables::lookup(disease)
        .and_then(|p| p.care_for(level))
        .unwrap_or(&DEFAULT_CARE);
    let mut recs = plan.to_recommendations();

    for advice in symptom_advice(symptoms) {
        if !recs.immediate_care.iter().any(|c| c == advice) {
            recs.immediate_care.push(advice.to_string());
        }
    }

    match urgency {
        Urgency::Immediate => {
            recs.when_to_see_doctor = "IMMEDIATELY - Do not delay seeking medical care.".to_string()
        }
        Urgency::SeekAttention => {
            recs.when_to_see_doctor = "As soon as possible - within 24-48 hours.".to_string()
        }
        _ => {}
    }

    if confidence < LOW_CONFIDENCE {
        recs.general_advice.push_str(LOW_CONFIDENCE_NOTE);
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symptoms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_plan_with_symptom_advice() {
        let recs = generate_recommendations(
            "Eczema",
            SeverityLevel::Mild,
            Urgency::Routine,
            &symptoms(&["itching", "redness", "dry_skin"]),
            0.87,
        );
        assert!(recs.general_advice.starts_with("Eczema is a chronic"));
        assert_eq!(recs.immediate_care.len(), 4);
        assert!(recs.immediate_care[2].starts_with("For itching"));
        assert!(recs.immediate_care[3].starts_with("Redness"));
        assert_eq!(
            recs.when_to_see_doctor,
            "If itching disrupts sleep or skin becomes infected"
        );
    }

    #[test]
    fn test_urgency_rewrites_doctor_advice() {
        let recs = generate_recommendations("Psoriasis", SeverityLevel::Severe, Urgency::Immediate, &[], 0.9);
        assert_eq!(recs.when_to_see_doctor, "IMMEDIATELY - Do not delay seeking medical care.");
        let recs = generate_recommendations("Psoriasis", SeverityLevel::Severe, Urgency::SeekAttention, &[], 0.9);
        assert_eq!(recs.when_to_see_doctor, "As soon as possible - within 24-48 hours.");
    }

    #[test]
    fn test_low_confidence_note() {
        let recs = generate_recommendations("Tinea", SeverityLevel::Mild, Urgency::Routine, &[], 0.41);
        assert!(recs.general_advice.ends_with(LOW_CONFIDENCE_NOTE));
    }

    #[test]
    fn test_unknown_disease_uses_defaults() {
        let recs = generate_recommendations("Dragon Scale", SeverityLevel::Moderate, Urgency::ConsultDoctor, &[], 0.7);
        assert_eq!(recs.general_advice, DEFAULT_CARE.general_advice);
        assert_eq!(recs.when_to_see_doctor, DEFAULT_CARE.when_to_see_doctor);
    }
}
