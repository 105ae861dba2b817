// Display text and CSS classes for levels, severities and errors

use skinscan_core::{
    Affordance, Alignment, ConfidenceLevel, ErrorKind, SeverityLevel, Urgency,
};

/// Message level for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Warning,
    Error,
}

impl From<ErrorKind> for MessageLevel {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => MessageLevel::Warning,
            _ => MessageLevel::Error,
        }
    }
}

/// Get CSS class for message level
pub fn get_message_class(level: MessageLevel) -> &'static str {
    match level {
        MessageLevel::Warning => "message-text warning",
        MessageLevel::Error => "message-text error",
    }
}

pub fn error_title(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "Please check your input",
        ErrorKind::Network => "Connection problem",
        ErrorKind::Timeout => "Request timed out",
        ErrorKind::InvalidImage => "Image could not be analyzed",
        ErrorKind::Server => "Server error",
        ErrorKind::RateLimited => "Too many requests",
        ErrorKind::Unknown => "Something went wrong",
        ErrorKind::Critical => "Service unavailable",
    }
}

/// Label of the action button next to an error, if any
pub fn affordance_label(affordance: Affordance) -> Option<&'static str> {
    match affordance {
        Affordance::Retry => Some("Try again"),
        Affordance::UploadAnother => Some("Upload another image"),
        Affordance::Reset => Some("Start over"),
        Affordance::None => None,
    }
}

pub fn confidence_class(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "confidence high",
        ConfidenceLevel::Medium => "confidence medium",
        ConfidenceLevel::Low => "confidence low",
    }
}

pub fn confidence_label(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "High confidence",
        ConfidenceLevel::Medium => "Medium confidence",
        ConfidenceLevel::Low => "Low confidence",
    }
}

pub fn severity_label(level: SeverityLevel) -> &'static str {
    match level {
        SeverityLevel::Mild => "Mild",
        SeverityLevel::Moderate => "Moderate",
        SeverityLevel::Severe => "Severe",
        SeverityLevel::Critical => "Critical",
        SeverityLevel::Unknown => "Not assessed",
    }
}

pub fn severity_class(level: SeverityLevel) -> String {
    format!("severity-badge {}", level.as_str())
}

pub fn urgency_label(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Routine => "Routine care",
        Urgency::ConsultDoctor => "Consult a doctor",
        Urgency::SeekAttention => "Seek medical attention soon",
        Urgency::Immediate => "Seek immediate care",
        Urgency::Unknown => "See a doctor if concerned",
    }
}

pub fn alignment_label(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Strong => "Strong match",
        Alignment::Moderate => "Moderate match",
        Alignment::Weak => "Weak match",
        Alignment::None => "No match",
        Alignment::Contradictory => "Contradictory symptoms",
        Alignment::Unknown => "Not evaluated",
    }
}

/// Underscored symptom token as readable text, e.g. `dry_skin` -> `Dry skin`
pub fn symptom_display(token: &str) -> String {
    let text = token.replace(['_', '-'], " ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_a_warning() {
        assert_eq!(MessageLevel::from(ErrorKind::Validation), MessageLevel::Warning);
        assert_eq!(MessageLevel::from(ErrorKind::Network), MessageLevel::Error);
        assert_eq!(get_message_class(MessageLevel::Warning), "message-text warning");
    }

    #[test]
    fn test_affordance_labels() {
        assert_eq!(affordance_label(Affordance::Retry), Some("Try again"));
        assert_eq!(affordance_label(Affordance::None), None);
    }

    #[test]
    fn test_symptom_display() {
        assert_eq!(symptom_display("dry_skin"), "Dry skin");
        assert_eq!(symptom_display("ring-shaped_rash"), "Ring shaped rash");
        assert_eq!(symptom_display(""), "");
    }

    #[test]
    fn test_severity_class() {
        assert_eq!(severity_class(SeverityLevel::Severe), "severity-badge severe");
    }
}
