// Cross-check reported symptoms against the predicted disease

use skinscan_core::{Alignment, ConfidenceAdjustment, SymptomAnalysisPayload};

use super::tables::{
    self, DiseaseProfile, INTENSITY_MODIFIERS, SYMPTOM_ALIASES, SYMPTOM_WEIGHT_COMMON,
    SYMPTOM_WEIGHT_OPTIONAL, SYMPTOM_WEIGHT_SEVERITY,
};

/// Canonical form of a user-entered symptom, e.g. `"Very Itchy"` -> `"itching"`
pub fn normalize_symptom(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let joined = lowered
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty() && !INTENSITY_MODIFIERS.contains(w))
        .collect::<Vec<_>>()
        .join("_");

    SYMPTOM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == joined)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(joined)
}

fn overlaps(symptom: &str, entry: &str) -> bool {
    symptom == entry || entry.contains(symptom) || symptom.contains(entry)
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|s| s == item) {
        list.push(item.to_string());
    }
}

#[derive(Debug, Default)]
struct Matches {
    common: Vec<String>,
    optional: Vec<String>,
    severity: Vec<String>,
    all: Vec<String>,
}

fn collect_matches(profile: &DiseaseProfile, symptoms: &[String]) -> Matches {
    let mut matches = Matches::default();
    for symptom in symptoms {
        let categories = [
            (profile.common, &mut matches.common),
            (profile.optional, &mut matches.optional),
            (profile.severity_indicators, &mut matches.severity),
        ];
        for (entries, bucket) in categories {
            if let Some(entry) = entries.iter().find(|e| overlaps(symptom, e)) {
                push_unique(bucket, entry);
                push_unique(&mut matches.all, entry);
                break;
            }
        }
    }
    matches
}

/// `floor(0.7 * common% + 0.3 * weighted%)`, computed exactly in integers
fn match_percentage(profile: &DiseaseProfile, matches: &Matches) -> u8 {
    let common_total = profile.common.len() as u64;
    let max_score = common_total * SYMPTOM_WEIGHT_COMMON as u64
        + profile.optional.len() as u64 * SYMPTOM_WEIGHT_OPTIONAL as u64
        + profile.severity_indicators.len() as u64 * SYMPTOM_WEIGHT_SEVERITY as u64;
    if max_score == 0 {
        return 0;
    }

    let score = matches.common.len() as u64 * SYMPTOM_WEIGHT_COMMON as u64
        + matches.optional.len() as u64 * SYMPTOM_WEIGHT_OPTIONAL as u64
        + matches.severity.len() as u64 * SYMPTOM_WEIGHT_SEVERITY as u64;

    let percent = if common_total == 0 {
        3 * score * 100 / (10 * max_score)
    } else {
        let common_matched = matches.common.len() as u64;
        (7 * common_matched * max_score + 3 * score * common_total) * 100
            / (10 * common_total * max_score)
    };
    percent.min(100) as u8
}

fn contradictions(profile: &DiseaseProfile, symptoms: &[String]) -> Vec<String> {
    let mut found = Vec::new();
    for symptom in symptoms {
        if profile.contradictions.iter().any(|c| overlaps(symptom, c)) {
            push_unique(&mut found, symptom);
        }
    }
    found
}

/// Confidence never drops below this floor when lowered
const MIN_ADJUSTED_CONFIDENCE: f64 = 0.1;

/// Nudge the model confidence towards the symptom evidence.
///
/// Strong and moderate matches raise it by a share of the remaining headroom;
/// weak and empty matches scale it down; contradictions cut it further.
/// A 30-49% match leaves it unchanged.
pub fn adjust_confidence(
    original: f64,
    match_percentage: u8,
    has_contradictions: bool,
) -> ConfidenceAdjustment {
    let (mut adjusted, mut reason) = if match_percentage >= 80 {
        (
            (original + (0.1_f64).min((1.0 - original) * 0.3)).min(1.0),
            Some("Confidence increased due to strong symptom alignment"),
        )
    } else if match_percentage >= 50 {
        (
            (original + (0.05_f64).min((1.0 - original) * 0.15)).min(1.0),
            Some("Confidence slightly increased due to moderate symptom alignment"),
        )
    } else if match_percentage == 0 {
        (
            (original * 0.8).max(MIN_ADJUSTED_CONFIDENCE),
            Some("Confidence decreased - no symptom matches found"),
        )
    } else if match_percentage < 30 {
        (
            (original * 0.9).max(MIN_ADJUSTED_CONFIDENCE),
            Some("Confidence slightly decreased due to weak symptom alignment"),
        )
    } else {
        (original, None)
    };

    if has_contradictions {
        adjusted = (adjusted * 0.7).max(MIN_ADJUSTED_CONFIDENCE);
        reason = Some("Confidence significantly decreased due to contradictory symptoms");
    }

    ConfidenceAdjustment {
        original,
        adjusted: (adjusted * 10_000.0).round() / 10_000.0,
        reason: reason.map(str::to_string),
    }
}

/// Compare reported symptoms with the disease profile.
///
/// When the model `confidence` is given, the result also carries the
/// symptom-adjusted confidence. Returns `None` when no symptoms were reported.
pub fn match_symptoms(
    disease: &str,
    symptoms: &[String],
    confidence: Option<f64>,
) -> Option<SymptomAnalysisPayload> {
    let mut normalized: Vec<String> = Vec::new();
    for raw in symptoms {
        let symptom = normalize_symptom(raw);
        if !symptom.is_empty() {
            push_unique(&mut normalized, &symptom);
        }
    }
    if normalized.is_empty() {
        return None;
    }

    let (percentage, matched, contradictory) = match tables::lookup(disease) {
        Some(profile) => {
            let matches = collect_matches(profile, &normalized);
            (
                match_percentage(profile, &matches),
                matches.all,
                contradictions(profile, &normalized),
            )
        }
        None => (0, Vec::new(), Vec::new()),
    };

    let (alignment, message) = if !contradictory.is_empty() {
        (
            Alignment::Contradictory,
            format!(
                "Warning: Some symptoms ({}) don't typically match {}. Professional evaluation strongly recommended.",
                contradictory.join(", "),
                disease
            ),
        )
    } else if percentage >= 80 {
        (
            Alignment::Strong,
            format!("Strong match - your symptoms strongly align with {} prediction.", disease),
        )
    } else if percentage >= 50 {
        (
            Alignment::Moderate,
            format!("Moderate match - some of your symptoms align with {}.", disease),
        )
    } else if percentage > 0 {
        (
            Alignment::Weak,
            format!(
                "Weak match - few symptoms match {}. Consider consulting a doctor for accurate diagnosis.",
                disease
            ),
        )
    } else {
        (
            Alignment::None,
            format!(
                "No symptom matches found for {}. Professional evaluation recommended.",
                disease
            ),
        )
    };

    let confidence_adjustment =
        confidence.map(|c| adjust_confidence(c, percentage, !contradictory.is_empty()));

    tracing::debug!(
        disease,
        percentage,
        alignment = alignment.as_str(),
        "Symptom matching complete"
    );

    Some(SymptomAnalysisPayload {
        match_percentage: percentage,
        alignment,
        matched_symptoms: matched,
        message,
        has_contradictions: !contradictory.is_empty(),
        contradictory_symptoms: contradictory,
        confidence_adjustment,
    })
}
