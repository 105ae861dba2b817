// Core data models for the skin analysis client

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::symptoms::SymptomSet;

/// Image ID (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub uuid::Uuid);

impl ImageId {
    /// Generate a new random image ID
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a selected image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageOrigin {
    FilePicker,
    CameraCapture,
}

/// The single image currently chosen for analysis.
///
/// The payload is shared (`Arc`) so handing the image to an in-flight
/// request does not copy the bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub id: ImageId,
    pub file_name: String,
    pub mime_type: String,
    pub data: Arc<Vec<u8>>,
    pub origin: ImageOrigin,
    /// Selection timestamp (Unix timestamp)
    pub selected_at: i64,
}

impl SelectedImage {
    pub fn new(file_name: String, mime_type: String, data: Vec<u8>, origin: ImageOrigin) -> Self {
        Self {
            id: ImageId::new(),
            file_name,
            mime_type,
            data: Arc::new(data),
            origin,
            selected_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Payload size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Monotonic sequence number of an analysis submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Image plus symptoms, frozen at submit time
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub image: SelectedImage,
    pub symptoms: SymptomSet,
}

/// Categorical confidence of the top prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Classify a confidence given on the 0-100 scale
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            ConfidenceLevel::High
        } else if percent >= 60.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    /// Classify a confidence that may be a fraction (<= 1) or a percentage
    pub fn classify(confidence: f64) -> Self {
        Self::from_percent(confidence_to_percent(confidence))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

/// Scale a fraction (<= 1) to a percentage; values above 1 are already percentages.
pub fn confidence_to_percent(confidence: f64) -> f64 {
    if confidence <= 1.0 {
        confidence * 100.0
    } else {
        confidence
    }
}

/// Format a confidence for display, e.g. `0.87` and `87` both give `"87%"`
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", confidence_to_percent(confidence).clamp(0.0, 100.0))
}

/// Secondary candidate from the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub disease: String,
    /// Fraction in [0, 1]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub disease: String,
    /// Fraction in [0, 1]
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub alternatives: Vec<Alternative>,
    pub needs_review: bool,
    pub review_reason: Option<String>,
}

impl Prediction {
    pub fn formatted_confidence(&self) -> String {
        format_confidence(self.confidence)
    }
}

/// How well reported symptoms fit the predicted disease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Strong,
    Moderate,
    Weak,
    None,
    Contradictory,
    #[serde(other)]
    Unknown,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Strong => "strong",
            Alignment::Moderate => "moderate",
            Alignment::Weak => "weak",
            Alignment::None => "none",
            Alignment::Contradictory => "contradictory",
            Alignment::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAnalysis {
    pub match_percentage: u8,
    pub alignment: Alignment,
    pub matched_symptoms: Vec<String>,
    pub message: String,
    pub confidence_adjustment: Option<ConfidenceAdjustment>,
}

/// Model confidence re-weighted by how well the symptoms fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAdjustment {
    pub original: f64,
    pub adjusted: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Mild,
    Moderate,
    Severe,
    Critical,
    #[serde(other)]
    Unknown,
}

impl SeverityLevel {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mild" => SeverityLevel::Mild,
            "moderate" => SeverityLevel::Moderate,
            "severe" => SeverityLevel::Severe,
            "critical" => SeverityLevel::Critical,
            _ => SeverityLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Mild => "mild",
            SeverityLevel::Moderate => "moderate",
            SeverityLevel::Severe => "severe",
            SeverityLevel::Critical => "critical",
            SeverityLevel::Unknown => "unknown",
        }
    }
}

/// Recommended care timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Routine,
    ConsultDoctor,
    SeekAttention,
    Immediate,
    #[serde(other)]
    Unknown,
}

impl Urgency {
    /// Accepts both the short glossary names and the server's long names
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "routine" => Urgency::Routine,
            "consult" | "consult_doctor" => Urgency::ConsultDoctor,
            "soon" | "seek_attention" => Urgency::SeekAttention,
            "immediate" | "urgent" => Urgency::Immediate,
            _ => Urgency::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Routine => "routine",
            Urgency::ConsultDoctor => "consult_doctor",
            Urgency::SeekAttention => "seek_attention",
            Urgency::Immediate => "immediate",
            Urgency::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Severity {
    pub level: SeverityLevel,
    pub urgency: Urgency,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub general_advice: String,
    pub immediate_care: Vec<String>,
    pub home_remedies: Vec<String>,
    pub precautions: Vec<String>,
    pub lifestyle_tips: Vec<String>,
    pub when_to_see_doctor: String,
}

/// Canonical analysis result consumed by result presentation.
///
/// Every field is filled, so views never need to check for absent data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub prediction: Prediction,
    pub symptom_analysis: Option<SymptomAnalysis>,
    pub severity: Severity,
    pub recommendations: Recommendations,
    pub disclaimer: String,
}

// ==================== Server wire types ====================

/// Candidate as emitted by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPrediction {
    pub disease: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub disease: String,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub top_predictions: Vec<TopPrediction>,
    pub needs_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomAnalysisPayload {
    pub match_percentage: u8,
    pub alignment: Alignment,
    pub matched_symptoms: Vec<String>,
    pub message: String,
    pub has_contradictions: bool,
    pub contradictory_symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_adjustment: Option<ConfidenceAdjustment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityPayload {
    pub level: SeverityLevel,
    pub urgency: Urgency,
    pub explanation: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// API Response: POST /api/predict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: PredictionPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptom_analysis: Option<SymptomAnalysisPayload>,
    pub severity: SeverityPayload,
    pub recommendations: Recommendations,
    pub disclaimer: String,
}

/// API Response: GET /api/health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default)]
    pub num_classes: usize,
    #[serde(default)]
    pub version: String,
}

/// API Response item: GET /api/diseases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub name: String,
    pub description: String,
    pub baseline_severity: SeverityLevel,
}

/// Symptom category for the checklist surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomCategory {
    pub name: String,
    pub symptoms: Vec<String>,
}

/// API Response: GET /api/symptoms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomCatalogResponse {
    pub categories: Vec<SymptomCategory>,
    pub all: Vec<String>,
}

/// API Error Response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Optional error details (for debugging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_fraction_and_percent_classify_the_same() {
        assert_eq!(ConfidenceLevel::classify(0.87), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::classify(87.0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::classify(0.65), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::classify(59.9), ConfidenceLevel::Low);
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.87), "87%");
        assert_eq!(format_confidence(87.0), "87%");
        assert_eq!(format_confidence(0.0), "0%");
    }

    #[test]
    fn test_urgency_aliases() {
        assert_eq!(Urgency::parse("soon"), Urgency::SeekAttention);
        assert_eq!(Urgency::parse("consult"), Urgency::ConsultDoctor);
        assert_eq!(Urgency::parse("URGENT"), Urgency::Immediate);
        assert_eq!(Urgency::parse("whenever"), Urgency::Unknown);
    }

    #[test]
    fn test_selected_image_size() {
        let image = SelectedImage::new(
            "photo.jpg".to_string(),
            "image/jpeg".to_string(),
            vec![0u8; 1024],
            ImageOrigin::FilePicker,
        );
        assert_eq!(image.size_bytes(), 1024);
        assert!(image.selected_at > 0);
    }
}
