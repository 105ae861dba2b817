// Classifier output -> prediction payload

use skinscan_core::{ConfidenceLevel, PredictionPayload, TopPrediction};
use skinscan_model_client::Classification;

pub const TOP_K: usize = 3;
pub const LOW_CONFIDENCE: f64 = 0.60;
const AMBIGUOUS_SECOND: f64 = 0.30;
const AMBIGUOUS_GAP: f64 = 0.20;

/// Rank the classifier scores and flag predictions that need review.
///
/// Returns `None` when the classifier produced no scores.
pub fn build_prediction(classification: &Classification) -> Option<PredictionPayload> {
    let top: Vec<TopPrediction> = classification
        .top(TOP_K)
        .into_iter()
        .map(|s| TopPrediction {
            disease: s.label,
            confidence: s.probability.clamp(0.0, 1.0),
        })
        .collect();

    let best = top.first()?.clone();
    let second = top.get(1).map(|p| p.confidence);
    let review_reason = review_reason(best.confidence, second);

    Some(PredictionPayload {
        disease: best.disease,
        confidence: best.confidence,
        confidence_level: ConfidenceLevel::classify(best.confidence),
        top_predictions: top,
        needs_review: review_reason.is_some(),
        review_reason: review_reason.map(str::to_string),
    })
}

fn review_reason(top: f64, second: Option<f64>) -> Option<&'static str> {
    if top < LOW_CONFIDENCE {
        return Some("Low confidence prediction");
    }
    match second {
        Some(second) if second > AMBIGUOUS_SECOND && (top - second) < AMBIGUOUS_GAP => {
            Some("Multiple possible conditions detected")
        }
        _ => None,
    }
}
