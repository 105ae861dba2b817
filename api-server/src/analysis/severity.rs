// Multi-factor severity assessment

use skinscan_core::{SeverityLevel, SeverityPayload, Urgency};

use super::tables::{
    self, AREA_KEYWORDS, INTENSITY_HIGH, INTENSITY_LOW, INTENSITY_MODERATE, RED_FLAG_DISEASES,
    RED_FLAG_SYMPTOMS,
};

const WEIGHT_BASELINE: f64 = 0.25;
const WEIGHT_INTENSITY: f64 = 0.20;
const WEIGHT_COUNT: f64 = 0.15;
const WEIGHT_INDICATORS: f64 = 0.25;
const WEIGHT_AREA: f64 = 0.1;

fn level_score(level: SeverityLevel) -> f64 {
    match level {
        SeverityLevel::Mild | SeverityLevel::Unknown => 1.0,
        SeverityLevel::Moderate => 2.0,
        SeverityLevel::Severe => 3.0,
        SeverityLevel::Critical => 4.0,
    }
}

fn score_to_level(score: f64) -> SeverityLevel {
    if score >= 3.5 {
        SeverityLevel::Critical
    } else if score >= 2.5 {
        SeverityLevel::Severe
    } else if score >= 1.5 {
        SeverityLevel::Moderate
    } else {
        SeverityLevel::Mild
    }
}

fn count_keywords(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
}

fn confidence_adjustment(confidence: f64, baseline: SeverityLevel) -> f64 {
    if confidence >= 0.9 && level_score(baseline) >= 3.0 {
        0.5
    } else if confidence < 0.5 {
        0.5
    } else {
        0.0
    }
}

fn intensity_score(text: &str, has_symptoms: bool) -> f64 {
    if !has_symptoms {
        return 0.0;
    }
    let high = count_keywords(text, &INTENSITY_HIGH);
    let moderate = count_keywords(text, &INTENSITY_MODERATE);
    let low = count_keywords(text, &INTENSITY_LOW);
    match (high, moderate, low) {
        (h, _, _) if h >= 2 => 2.0,
        (1, _, _) => 1.5,
        (_, m, _) if m >= 2 => 1.0,
        (_, 1, _) => 0.5,
        (_, _, l) if l >= 1 => 0.0,
        _ => 0.5,
    }
}

fn count_score(count: usize) -> f64 {
    match count {
        0..=2 => 0.0,
        3..=4 => 0.5,
        5..=6 => 1.0,
        _ => 1.5,
    }
}

fn indicator_score(severe_if: &[&str], text: &str) -> f64 {
    let red_flags = count_keywords(text, &RED_FLAG_SYMPTOMS);
    let indicators = count_keywords(text, severe_if);
    if red_flags > 0 {
        2.5 + (red_flags as f64 * 0.5).min(1.5)
    } else {
        match indicators {
            0 => 0.0,
            1 => 1.0,
            2 => 1.5,
            _ => 2.0,
        }
    }
}

fn area_score(text: &str) -> f64 {
    match count_keywords(text, &AREA_KEYWORDS) {
        0 => 0.0,
        1 => 0.5,
        _ => 1.0,
    }
}

fn determine_urgency(disease: &str, level: SeverityLevel, text: &str) -> (Urgency, Option<String>) {
    let serious = matches!(level, SeverityLevel::Severe | SeverityLevel::Critical);

    if RED_FLAG_DISEASES.iter().any(|d| d.eq_ignore_ascii_case(disease)) {
        return if serious {
            (
                Urgency::Immediate,
                Some(format!(
                    "{} detected with high confidence. Seek immediate medical evaluation.",
                    disease
                )),
            )
        } else {
            (
                Urgency::SeekAttention,
                Some(format!(
                    "{} suspected. Please consult a dermatologist promptly.",
                    disease
                )),
            )
        };
    }

    if let Some(flag) = RED_FLAG_SYMPTOMS.iter().find(|f| text.contains(*f)) {
        return match level {
            SeverityLevel::Severe | SeverityLevel::Critical => (
                Urgency::Immediate,
                Some(format!(
                    "Concerning symptom '{}' detected. Seek immediate medical attention.",
                    flag
                )),
            ),
            SeverityLevel::Moderate => (
                Urgency::SeekAttention,
                Some(format!("Symptom '{}' detected. Please consult a doctor soon.", flag)),
            ),
            _ => (
                Urgency::ConsultDoctor,
                Some(format!(
                    "Symptom '{}' noted. Consider consulting a healthcare provider.",
                    flag
                )),
            ),
        };
    }

    match level {
        SeverityLevel::Critical => (
            Urgency::Immediate,
            Some("Critical condition detected. Seek immediate medical attention.".to_string()),
        ),
        SeverityLevel::Severe => (
            Urgency::SeekAttention,
            Some("Condition appears serious. Please see a doctor soon.".to_string()),
        ),
        SeverityLevel::Moderate => (Urgency::ConsultDoctor, None),
        _ => (Urgency::Routine, None),
    }
}

fn severity_sentence(level: SeverityLevel) -> &'static str {
    match level {
        SeverityLevel::Critical => "Immediate medical attention is strongly recommended.",
        SeverityLevel::Severe => "Please consult a healthcare provider soon.",
        SeverityLevel::Moderate => "Consider scheduling a medical consultation.",
        _ => "Monitor the condition and seek help if it worsens.",
    }
}

/// Assess how serious the predicted condition appears.
///
/// # Arguments
/// * `disease` - Predicted disease name
/// * `confidence` - Classifier confidence in [0, 1]
/// * `symptoms` - Symptoms as reported by the user
pub fn assess_severity(disease: &str, confidence: f64, symptoms: &[String]) -> SeverityPayload {
    let profile = tables::lookup(disease);
    let baseline = profile.map_or(SeverityLevel::Moderate, |p| p.baseline);
    let cap = profile.map_or(SeverityLevel::Severe, |p| p.can_escalate_to);
    let severe_if: &[&str] = profile.map(|p| p.severe_if).unwrap_or(&[]);
    let description = profile.map_or("Unknown condition", |p| p.description);

    let text = symptoms
        .iter()
        .map(|s| s.trim().to_lowercase().replace(' ', "_"))
        .collect::<Vec<_>>()
        .join(" ");
    let has_symptoms = !symptoms.is_empty();

    let total = level_score(baseline) * WEIGHT_BASELINE
        + intensity_score(&text, has_symptoms) * WEIGHT_INTENSITY
        + count_score(symptoms.len()) * WEIGHT_COUNT
        + indicator_score(severe_if, &text) * WEIGHT_INDICATORS
        + confidence_adjustment(confidence, baseline)
        + area_score(&text) * WEIGHT_AREA;
    let score = (total + 1.0).clamp(1.0, 4.0);

    let mut level = score_to_level(score);
    let has_red_flags = count_keywords(&text, &RED_FLAG_SYMPTOMS) > 0;
    if !has_red_flags && level > cap {
        tracing::debug!(disease, from = level.as_str(), to = cap.as_str(), "Severity capped");
        level = cap;
    }

    let (urgency, warning) = determine_urgency(disease, level, &text);

    SeverityPayload {
        level,
        urgency,
        explanation: format!("{} {}", description, severity_sentence(level)),
        score: (score * 100.0).round() / 100.0,
        warning,
    }
}
