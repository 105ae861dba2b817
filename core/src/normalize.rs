// Normalization of the backend's loosely-shaped predict response
//
// The server has shipped several response layouts over time: flat or
// nested prediction fields, snake_case or camelCase keys, recommendations
// as a list or as a structured object, severity as an object or a bare
// level. Everything is decoded into the `Raw*` variants below and then
// folded into one `NormalizedResult` with explicit defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::models::{
    Alignment, Alternative, ConfidenceAdjustment, ConfidenceLevel, NormalizedResult, Prediction,
    Recommendations, Severity, SeverityLevel, SymptomAnalysis, Urgency,
};

pub const DEFAULT_DISCLAIMER: &str = "This analysis is for informational purposes only and is not a medical diagnosis. \
     Always consult a qualified healthcare professional about any skin concern.";

/// Legacy key names and the canonical field they feed
const KEY_ALIASES: &[(&str, &str)] = &[
    ("predicted_disease", "disease"),
    ("name", "disease"),
    ("label", "disease"),
    ("alternatives", "top_predictions"),
    ("probability", "confidence"),
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    /// The server answered but declared the request failed
    #[error("{0}")]
    Rejected(String),

    #[error("Response did not contain a prediction")]
    MissingPrediction,

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// `null` decodes to the type's default instead of failing
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Canonical field name for `key` and its rank; lower ranks win when
/// several spellings of one field are present.
fn canonical_key(key: &str) -> (String, u8) {
    let snake = snake_case(key);
    let camel = snake != key;
    match KEY_ALIASES.iter().find(|(from, _)| *from == snake) {
        Some((_, to)) => (to.to_string(), 2 + u8::from(camel)),
        None => (snake, u8::from(camel)),
    }
}

/// Rewrite every object key to its canonical snake_case name.
///
/// `null` members are dropped, and when several spellings of one field
/// appear the canonical one wins, then aliases, each preferring the
/// snake_case copy.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut picked: BTreeMap<String, (u8, Value)> = BTreeMap::new();
            for (key, inner) in map {
                if inner.is_null() {
                    continue;
                }
                let (name, rank) = canonical_key(&key);
                if picked.get(&name).map_or(true, |(existing, _)| rank < *existing) {
                    picked.insert(name, (rank, canonicalize(inner)));
                }
            }
            Value::Object(
                picked
                    .into_iter()
                    .map(|(name, (_, inner))| (name, inner))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Unvalidated predict response, keyed by canonical snake_case names
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawServerResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub prediction: Option<RawPrediction>,

    // Flat layout
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub top_predictions: Option<Vec<RawCandidate>>,
    #[serde(default)]
    pub needs_review: Option<bool>,
    #[serde(default)]
    pub review_reason: Option<String>,

    #[serde(default)]
    pub symptom_analysis: Option<RawSymptomAnalysis>,
    #[serde(default)]
    pub severity: Option<RawSeverity>,
    #[serde(default)]
    pub recommendations: Option<RawRecommendations>,
    #[serde(default)]
    pub disclaimer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrediction {
    Detailed(RawPredictionFields),
    Name(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPredictionFields {
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub top_predictions: Option<Vec<RawCandidate>>,
    #[serde(default)]
    pub needs_review: Option<bool>,
    #[serde(default)]
    pub review_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSymptomAnalysis {
    #[serde(default)]
    pub match_percentage: Option<f64>,
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matched_symptoms: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub confidence_adjustment: Option<RawConfidenceAdjustment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfidenceAdjustment {
    #[serde(default)]
    pub original: Option<f64>,
    #[serde(default)]
    pub adjusted: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSeverity {
    Level(String),
    Detailed {
        #[serde(default)]
        level: Option<String>,
        #[serde(default)]
        urgency: Option<String>,
        #[serde(default)]
        explanation: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRecommendations {
    List(Vec<String>),
    Structured(RawRecommendationFields),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecommendationFields {
    #[serde(default)]
    pub general_advice: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub immediate_care: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub home_remedies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precautions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lifestyle_tips: Vec<String>,
    #[serde(default)]
    pub when_to_see_doctor: Option<String>,
}

impl RawServerResponse {
    /// Decode a JSON value in any of the known key spellings
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(canonicalize(value))
    }

    /// Failure message when the server flagged the request as failed
    pub fn rejection(&self) -> Option<String> {
        let message = match &self.error {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(obj)) => Some(
                obj.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| Value::Object(obj.clone()).to_string()),
            ),
            Some(other) => Some(other.to_string()),
        };
        if message.is_some() {
            return message;
        }
        if self.success == Some(false) {
            return Some(
                self.message
                    .clone()
                    .unwrap_or_else(|| "The server could not analyze this image".to_string()),
            );
        }
        None
    }

    fn disease_name(&self) -> Option<&str> {
        let nested = match &self.prediction {
            Some(RawPrediction::Detailed(fields)) => fields.disease.as_deref(),
            Some(RawPrediction::Name(name)) => Some(name.as_str()),
            None => None,
        };
        nested
            .or(self.disease.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Canonical success predicate: no error, `success` not false and a
    /// disease name present.
    pub fn is_success(&self) -> bool {
        self.rejection().is_none() && self.disease_name().is_some()
    }
}

/// Decode a response body and normalize it
pub fn normalize_json(body: &[u8]) -> Result<NormalizedResult, NormalizeError> {
    let decode = |e: serde_json::Error| NormalizeError::Decode(e.to_string());
    let value: Value = serde_json::from_slice(body).map_err(decode)?;
    normalize(RawServerResponse::from_value(value).map_err(decode)?)
}

/// Fold a raw response into the canonical result
pub fn normalize(raw: RawServerResponse) -> Result<NormalizedResult, NormalizeError> {
    if let Some(message) = raw.rejection() {
        return Err(NormalizeError::Rejected(message));
    }
    let disease = raw
        .disease_name()
        .ok_or(NormalizeError::MissingPrediction)?
        .to_string();

    let nested = match &raw.prediction {
        Some(RawPrediction::Detailed(fields)) => Some(fields),
        _ => None,
    };

    let raw_confidence = nested
        .and_then(|p| p.confidence)
        .or(raw.confidence)
        .unwrap_or(0.0);
    let confidence = fraction(raw_confidence);

    let candidates = nested
        .and_then(|p| p.top_predictions.as_ref())
        .or(raw.top_predictions.as_ref());
    let alternatives = candidates
        .map(|list| {
            list.iter()
                .filter_map(|c| {
                    let name = c.disease.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
                    (!name.eq_ignore_ascii_case(&disease)).then(|| Alternative {
                        disease: name.to_string(),
                        confidence: fraction(c.confidence),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let prediction = Prediction {
        confidence_level: ConfidenceLevel::classify(confidence),
        confidence,
        alternatives,
        needs_review: nested
            .and_then(|p| p.needs_review)
            .or(raw.needs_review)
            .unwrap_or(false),
        review_reason: nested
            .and_then(|p| p.review_reason.clone())
            .or(raw.review_reason.clone()),
        disease,
    };

    Ok(NormalizedResult {
        prediction,
        symptom_analysis: raw.symptom_analysis.map(normalize_symptom_analysis),
        severity: normalize_severity(raw.severity),
        recommendations: normalize_recommendations(raw.recommendations),
        disclaimer: raw
            .disclaimer
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DISCLAIMER.to_string()),
    })
}

/// Bring a confidence on either scale to a fraction in [0, 1]
fn fraction(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return 0.0;
    }
    let value = if confidence > 1.0 { confidence / 100.0 } else { confidence };
    value.clamp(0.0, 1.0)
}

fn parse_alignment(value: &str) -> Alignment {
    match value.trim().to_ascii_lowercase().as_str() {
        "strong" => Alignment::Strong,
        "moderate" => Alignment::Moderate,
        "weak" => Alignment::Weak,
        "none" => Alignment::None,
        "contradictory" => Alignment::Contradictory,
        _ => Alignment::Unknown,
    }
}

fn normalize_symptom_analysis(raw: RawSymptomAnalysis) -> SymptomAnalysis {
    let percentage = raw.match_percentage.unwrap_or(0.0);
    let percentage = if percentage.is_finite() {
        percentage.round().clamp(0.0, 100.0) as u8
    } else {
        0
    };
    SymptomAnalysis {
        match_percentage: percentage,
        alignment: raw
            .alignment
            .as_deref()
            .map(parse_alignment)
            .unwrap_or(Alignment::Unknown),
        matched_symptoms: raw.matched_symptoms,
        message: raw.message.unwrap_or_default(),
        confidence_adjustment: raw.confidence_adjustment.and_then(|adj| {
            let adjusted = adj.adjusted?;
            Some(ConfidenceAdjustment {
                original: fraction(adj.original.unwrap_or(adjusted)),
                adjusted: fraction(adjusted),
                reason: adj.reason.filter(|r| !r.trim().is_empty()),
            })
        }),
    }
}

fn normalize_severity(raw: Option<RawSeverity>) -> Severity {
    match raw {
        Some(RawSeverity::Level(level)) => Severity {
            level: SeverityLevel::parse(&level),
            urgency: Urgency::Unknown,
            explanation: String::new(),
        },
        Some(RawSeverity::Detailed {
            level,
            urgency,
            explanation,
        }) => Severity {
            level: level.as_deref().map(SeverityLevel::parse).unwrap_or(SeverityLevel::Unknown),
            urgency: urgency.as_deref().map(Urgency::parse).unwrap_or(Urgency::Unknown),
            explanation: explanation.unwrap_or_default(),
        },
        None => Severity {
            level: SeverityLevel::Unknown,
            urgency: Urgency::Unknown,
            explanation: String::new(),
        },
    }
}

fn normalize_recommendations(raw: Option<RawRecommendations>) -> Recommendations {
    match raw {
        Some(RawRecommendations::List(items)) => Recommendations {
            immediate_care: items,
            ..Recommendations::default()
        },
        Some(RawRecommendations::Structured(fields)) => Recommendations {
            general_advice: fields.general_advice.unwrap_or_default(),
            immediate_care: fields.immediate_care,
            home_remedies: fields.home_remedies,
            precautions: fields.precautions,
            lifestyle_tips: fields.lifestyle_tips,
            when_to_see_doctor: fields.when_to_see_doctor.unwrap_or_default(),
        },
        None => Recommendations::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: Value) -> Result<NormalizedResult, NormalizeError> {
        normalize_json(value.to_string().as_bytes())
    }

    #[test]
    fn test_minimal_flat_response_gets_defaults() {
        let result = run(json!({"disease": "Eczema", "confidence": 0.87, "severity": {"level": "moderate"}})).unwrap();
        assert_eq!(result.prediction.disease, "Eczema");
        assert_eq!(result.prediction.confidence_level, ConfidenceLevel::High);
        assert_eq!(result.severity.level, SeverityLevel::Moderate);
        assert_eq!(result.severity.urgency, Urgency::Unknown);
        assert!(result.recommendations.immediate_care.is_empty());
        assert!(result.symptom_analysis.is_none());
        assert_eq!(result.disclaimer, DEFAULT_DISCLAIMER);
    }

    #[test]
    fn test_percentage_confidence_is_scaled() {
        let result = run(json!({"disease": "Eczema", "confidence": 87})).unwrap();
        assert!((result.prediction.confidence - 0.87).abs() < 1e-9);
        assert_eq!(result.prediction.formatted_confidence(), "87%");
    }

    #[test]
    fn test_server_confidence_level_is_recomputed() {
        let result = run(json!({
            "prediction": {"disease": "Acne", "confidence": 0.3, "confidence_level": "high"}
        }))
        .unwrap();
        assert_eq!(result.prediction.confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_alternatives_exclude_primary() {
        let result = run(json!({
            "prediction": {
                "disease": "Eczema",
                "confidence": 0.7,
                "top_predictions": [
                    {"disease": "Eczema", "confidence": 0.7},
                    {"disease": "Psoriasis", "confidence": 0.2},
                    {"disease": "Tinea", "confidence": 10}
                ]
            }
        }))
        .unwrap();
        let names: Vec<_> = result.prediction.alternatives.iter().map(|a| a.disease.as_str()).collect();
        assert_eq!(names, vec!["Psoriasis", "Tinea"]);
        assert!((result.prediction.alternatives[1].confidence - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_array_recommendations_map_to_immediate_care() {
        let result = run(json!({
            "disease": "Acne",
            "recommendations": ["Wash twice daily", "Avoid picking"]
        }))
        .unwrap();
        assert_eq!(result.recommendations.immediate_care.len(), 2);
        assert!(result.recommendations.general_advice.is_empty());
    }

    #[test]
    fn test_bare_severity_string() {
        let result = run(json!({"disease": "Acne", "severity": "Severe"})).unwrap();
        assert_eq!(result.severity.level, SeverityLevel::Severe);
    }

    #[test]
    fn test_unknown_alignment_defaults() {
        let result = run(json!({
            "disease": "Acne",
            "symptomAnalysis": {"matchPercentage": 140, "alignment": "perfect"}
        }))
        .unwrap();
        let analysis = result.symptom_analysis.unwrap();
        assert_eq!(analysis.alignment, Alignment::Unknown);
        assert_eq!(analysis.match_percentage, 100);
        assert!(analysis.matched_symptoms.is_empty());
    }

    #[test]
    fn test_error_field_rejects() {
        assert_eq!(
            run(json!({"error": "Invalid or corrupted image"})).unwrap_err(),
            NormalizeError::Rejected("Invalid or corrupted image".to_string())
        );
        assert_eq!(
            run(json!({"error": {"message": "nope"}, "disease": "Acne"})).unwrap_err(),
            NormalizeError::Rejected("nope".to_string())
        );
    }

    #[test]
    fn test_success_false_rejects_even_with_prediction() {
        let err = run(json!({"success": false, "message": "Model busy", "disease": "Acne"})).unwrap_err();
        assert_eq!(err, NormalizeError::Rejected("Model busy".to_string()));
    }

    #[test]
    fn test_null_error_is_ignored() {
        assert!(run(json!({"error": null, "disease": "Acne"})).is_ok());
    }

    #[test]
    fn test_missing_prediction() {
        assert_eq!(run(json!({"success": true})).unwrap_err(), NormalizeError::MissingPrediction);
        assert_eq!(run(json!({"disease": "   "})).unwrap_err(), NormalizeError::MissingPrediction);
    }

    #[test]
    fn test_prediction_as_plain_name() {
        let result = run(json!({"prediction": "Rosacea", "confidence": 0.5})).unwrap();
        assert_eq!(result.prediction.disease, "Rosacea");
        assert!((result.prediction.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(normalize_json(b"<html>"), Err(NormalizeError::Decode(_))));
    }

    #[test]
    fn test_is_success() {
        let raw = RawServerResponse::from_value(json!({"predicted_disease": "Acne"})).unwrap();
        assert!(raw.is_success());
        let raw = RawServerResponse::from_value(json!({"success": true})).unwrap();
        assert!(!raw.is_success());
    }

    #[test]
    fn test_null_lists_fall_back_to_empty() {
        let result = run(json!({
            "disease": "Eczema",
            "confidence": 0.87,
            "symptom_analysis": {
                "match_percentage": 60,
                "alignment": "moderate",
                "matched_symptoms": null,
                "message": null
            },
            "recommendations": {
                "general_advice": "Keep skin moisturized",
                "immediate_care": null,
                "home_remedies": ["Oatmeal bath"],
                "precautions": null,
                "lifestyle_tips": null,
                "when_to_see_doctor": null
            },
            "disclaimer": null
        }))
        .unwrap();
        let analysis = result.symptom_analysis.unwrap();
        assert!(analysis.matched_symptoms.is_empty());
        assert!(analysis.message.is_empty());
        assert_eq!(result.recommendations.general_advice, "Keep skin moisturized");
        assert!(result.recommendations.immediate_care.is_empty());
        assert_eq!(result.recommendations.home_remedies, vec!["Oatmeal bath"]);
        assert!(result.recommendations.when_to_see_doctor.is_empty());
        assert_eq!(result.disclaimer, DEFAULT_DISCLAIMER);
    }

    #[test]
    fn test_null_candidate_fields() {
        let result = run(json!({
            "disease": "Eczema",
            "top_predictions": [
                {"disease": "Psoriasis", "confidence": null},
                {"disease": null, "confidence": 0.1}
            ]
        }))
        .unwrap();
        assert_eq!(result.prediction.alternatives.len(), 1);
        assert_eq!(result.prediction.alternatives[0].disease, "Psoriasis");
        assert_eq!(result.prediction.alternatives[0].confidence, 0.0);
    }

    #[test]
    fn test_null_lists_decode_without_key_rewrite() {
        let fields: RawRecommendationFields =
            serde_json::from_value(json!({"immediate_care": null, "precautions": ["Avoid sun"]}))
                .unwrap();
        assert!(fields.immediate_care.is_empty());
        assert_eq!(fields.precautions, vec!["Avoid sun"]);
    }

    #[test]
    fn test_duplicate_spellings_are_merged() {
        let result = run(json!({
            "disease": "Eczema",
            "predicted_disease": "Eczema",
            "predictedDisease": "Eczema",
            "confidence": 0.87,
            "top_predictions": [{"disease": "Psoriasis", "confidence": 0.1}],
            "topPredictions": [{"name": "Tinea", "probability": 0.05}],
            "needs_review": false,
            "needsReview": false
        }))
        .unwrap();
        assert_eq!(result.prediction.disease, "Eczema");
        assert_eq!(result.prediction.confidence_level, ConfidenceLevel::High);
        let names: Vec<_> = result.prediction.alternatives.iter().map(|a| a.disease.as_str()).collect();
        assert_eq!(names, vec!["Psoriasis"]);
    }

    #[test]
    fn test_canonical_name_beats_alias_and_null() {
        let result = run(json!({
            "predicted_disease": "Psoriasis",
            "disease": "Eczema",
            "symptomAnalysis": {"alignment": "weak"},
            "symptom_analysis": null
        }))
        .unwrap();
        assert_eq!(result.prediction.disease, "Eczema");
        assert_eq!(result.symptom_analysis.unwrap().alignment, Alignment::Weak);
    }

    #[test]
    fn test_confidence_adjustment_is_carried() {
        let result = run(json!({
            "disease": "Eczema",
            "confidence": 0.87,
            "symptomAnalysis": {
                "matchPercentage": 51,
                "alignment": "moderate",
                "confidenceAdjustment": {"original": 0.87, "adjusted": 0.8895, "reason": "Confidence slightly increased"}
            }
        }))
        .unwrap();
        let adjustment = result.symptom_analysis.unwrap().confidence_adjustment.unwrap();
        assert!((adjustment.adjusted - 0.8895).abs() < 1e-9);
        assert!((adjustment.original - 0.87).abs() < 1e-9);
        assert!(adjustment.reason.is_some());
    }

    #[test]
    fn test_key_canonicalization() {
        assert_eq!(canonical_key("disease"), ("disease".to_string(), 0));
        assert_eq!(canonical_key("matchPercentage"), ("match_percentage".to_string(), 1));
        assert_eq!(canonical_key("predicted_disease"), ("disease".to_string(), 2));
        assert_eq!(canonical_key("predictedDisease"), ("disease".to_string(), 3));
        assert_eq!(canonical_key("topPredictions"), ("top_predictions".to_string(), 1));
    }
}
