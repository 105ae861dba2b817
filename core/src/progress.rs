// Upload progress and the coarse stage labels layered on top of it

use serde::{Deserialize, Serialize};

/// Percent boundaries between stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageThresholds {
    pub processing_from: u8,
    pub finalizing_from: u8,
}

impl Default for StageThresholds {
    fn default() -> Self {
        Self {
            processing_from: 50,
            finalizing_from: 80,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Uploading,
    Processing,
    Finalizing,
}

const UPLOADING_MESSAGES: &[&str] = &["Uploading image...", "Sending your photo securely..."];

const PROCESSING_MESSAGES: &[&str] = &[
    "Analyzing image...",
    "Detecting skin patterns...",
    "Comparing with known conditions...",
];

const FINALIZING_MESSAGES: &[&str] = &[
    "Evaluating symptoms...",
    "Assessing severity...",
    "Preparing recommendations...",
];

impl Stage {
    pub fn from_percent(percent: u8, thresholds: StageThresholds) -> Self {
        if percent < thresholds.processing_from {
            Stage::Uploading
        } else if percent < thresholds.finalizing_from {
            Stage::Processing
        } else {
            Stage::Finalizing
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Uploading => "Uploading",
            Stage::Processing => "Processing",
            Stage::Finalizing => "Finalizing",
        }
    }

    pub fn messages(&self) -> &'static [&'static str] {
        match self {
            Stage::Uploading => UPLOADING_MESSAGES,
            Stage::Processing => PROCESSING_MESSAGES,
            Stage::Finalizing => FINALIZING_MESSAGES,
        }
    }

    /// Message for the given rotation tick, cycling through the stage's list
    pub fn message(&self, tick: usize) -> &'static str {
        let messages = self.messages();
        messages[tick % messages.len()]
    }
}

/// Monotonic progress percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressTracker {
    percent: u8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Record a new value. Values above 100 are clamped and lower values
    /// are ignored. Returns `true` when the percentage moved.
    pub fn advance(&mut self, percent: u8) -> bool {
        let percent = percent.min(100);
        if percent > self.percent {
            self.percent = percent;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.percent = 0;
    }

    pub fn is_complete(&self) -> bool {
        self.percent == 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_boundaries() {
        let t = StageThresholds::default();
        assert_eq!(Stage::from_percent(0, t), Stage::Uploading);
        assert_eq!(Stage::from_percent(49, t), Stage::Uploading);
        assert_eq!(Stage::from_percent(50, t), Stage::Processing);
        assert_eq!(Stage::from_percent(79, t), Stage::Processing);
        assert_eq!(Stage::from_percent(80, t), Stage::Finalizing);
        assert_eq!(Stage::from_percent(100, t), Stage::Finalizing);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = StageThresholds {
            processing_from: 30,
            finalizing_from: 90,
        };
        assert_eq!(Stage::from_percent(30, t), Stage::Processing);
        assert_eq!(Stage::from_percent(85, t), Stage::Processing);
    }

    #[test]
    fn test_tracker_is_monotonic_and_clamped() {
        let mut p = ProgressTracker::new();
        assert!(p.advance(50));
        assert!(!p.advance(10));
        assert_eq!(p.percent(), 50);
        assert!(p.advance(250));
        assert_eq!(p.percent(), 100);
        assert!(p.is_complete());
        p.reset();
        assert_eq!(p.percent(), 0);
    }

    #[test]
    fn test_messages_rotate() {
        let stage = Stage::Processing;
        assert_eq!(stage.message(0), stage.message(stage.messages().len()));
        assert_ne!(stage.message(0), stage.message(1));
    }
}
