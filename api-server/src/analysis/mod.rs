// Rule-based post-processing of classifier output

pub mod prediction;
pub mod recommendations;
pub mod severity;
pub mod symptom_matcher;
pub mod tables;

use skinscan_core::{DiseaseInfo, PredictResponse};
use skinscan_model_client::Classification;

pub use prediction::build_prediction;
pub use recommendations::generate_recommendations;
pub use severity::assess_severity;
pub use symptom_matcher::{match_symptoms, normalize_symptom};

/// Split the `symptoms` form field into trimmed, non-empty entries
pub fn parse_symptoms(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Full `/predict` payload from classifier scores and reported symptoms.
///
/// Returns `None` if the classifier produced no scores.
pub fn analyze(classification: &Classification, symptoms: &[String]) -> Option<PredictResponse> {
    let prediction = build_prediction(classification)?;
    let symptom_analysis =
        match_symptoms(&prediction.disease, symptoms, Some(prediction.confidence));
    let severity = assess_severity(&prediction.disease, prediction.confidence, symptoms);
    let recommendations = generate_recommendations(
        &prediction.disease,
        severity.level,
        severity.urgency,
        symptoms,
        prediction.confidence,
    );

    Some(PredictResponse {
        success: true,
        prediction,
        symptom_analysis,
        severity,
        recommendations,
        disclaimer: tables::MEDICAL_DISCLAIMER.to_string(),
    })
}

/// Entries for `GET /diseases`
pub fn disease_catalog() -> Vec<DiseaseInfo> {
    tables::DISEASES
        .iter()
        .map(|p| DiseaseInfo {
            name: p.name.to_string(),
            description: p.description.to_string(),
            baseline_severity: p.baseline,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinscan_core::{Alignment, SeverityLevel, Urgency};
    use skinscan_model_client::ClassScore;

    #[test]
    fn test_parse_symptoms() {
        assert_eq!(
            parse_symptoms(Some(" itching, ,redness ,dry_skin")),
            vec!["itching", "redness", "dry_skin"]
        );
        assert!(parse_symptoms(Some("")).is_empty());
        assert!(parse_symptoms(None).is_empty());
    }

    #[test]
    fn test_analyze_eczema() {
        let classification = Classification {
            predictions: vec![
                ClassScore { label: "Eczema".into(), probability: 0.87 },
                ClassScore { label: "Psoriasis".into(), probability: 0.08 },
                ClassScore { label: "Tinea".into(), probability: 0.05 },
            ],
        };
        let symptoms = parse_symptoms(Some("itching,redness,dry_skin"));
        let response = analyze(&classification, &symptoms).unwrap();

        assert!(response.success);
        assert_eq!(response.prediction.disease, "Eczema");
        assert_eq!(response.prediction.top_predictions.len(), 3);
        let analysis = response.symptom_analysis.unwrap();
        assert_eq!(analysis.alignment, Alignment::Moderate);
        let adjustment = analysis.confidence_adjustment.unwrap();
        assert!((adjustment.adjusted - 0.8895).abs() < 1e-9);
        assert_eq!(response.severity.level, SeverityLevel::Mild);
        assert_eq!(response.severity.urgency, Urgency::Routine);
        assert!(!response.recommendations.immediate_care.is_empty());
        assert!(response.disclaimer.starts_with("IMPORTANT"));
    }

    #[test]
    fn test_analyze_without_symptoms_omits_analysis() {
        let classification = Classification {
            predictions: vec![ClassScore { label: "Acne".into(), probability: 0.9 }],
        };
        let response = analyze(&classification, &[]).unwrap();
        assert!(response.symptom_analysis.is_none());
    }

    #[test]
    fn test_disease_catalog() {
        let catalog = disease_catalog();
        assert_eq!(catalog.len(), tables::DISEASES.len());
        let melanoma = catalog.iter().find(|d| d.name == "Melanoma").unwrap();
        assert_eq!(melanoma.baseline_severity, SeverityLevel::Critical);
    }
}
