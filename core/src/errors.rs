// Classified failures and how the UI surfaces them

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::validation::ValidationError;

/// How long a toast stays up before expiring on its own
pub const TOAST_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Network,
    Timeout,
    InvalidImage,
    Server,
    RateLimited,
    Unknown,
    Critical,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::InvalidImage => "invalid_image",
            ErrorKind::Server => "server",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Unknown => "unknown",
            ErrorKind::Critical => "critical",
        }
    }

    /// Transient classes that may succeed when tried again
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Server | ErrorKind::RateLimited
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Retry,
    Upload,
    None,
}

/// A classified failure as seen by the flow controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
    pub suggested_action: SuggestedAction,
}

impl ErrorDescriptor {
    pub fn new(kind: ErrorKind, message: impl Into<String>, suggested_action: SuggestedAction) -> Self {
        Self {
            kind,
            message: message.into(),
            suggested_action,
        }
    }

    pub fn validation(err: &ValidationError) -> Self {
        Self::new(ErrorKind::Validation, err.to_string(), SuggestedAction::None)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Critical, message, SuggestedAction::None)
    }

    /// Where and how this error is shown
    pub fn presentation(&self) -> ErrorPresentation {
        match self.kind {
            kind if kind.is_transient() => ErrorPresentation {
                inline: true,
                toast: Some(TOAST_DURATION),
                modal: false,
                affordance: Affordance::Retry,
            },
            ErrorKind::InvalidImage => ErrorPresentation {
                inline: true,
                toast: None,
                modal: false,
                affordance: Affordance::UploadAnother,
            },
            ErrorKind::Critical => ErrorPresentation {
                inline: false,
                toast: None,
                modal: true,
                affordance: Affordance::Reset,
            },
            _ => ErrorPresentation {
                inline: true,
                toast: None,
                modal: false,
                affordance: Affordance::None,
            },
        }
    }
}

impl std::fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

/// Action button offered next to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Retry,
    UploadAnother,
    Reset,
    None,
}

/// Routing of an error to the UI channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPresentation {
    pub inline: bool,
    /// Auto-expiring toast, with its lifetime
    pub toast: Option<Duration>,
    /// Blocking modal requiring explicit dismissal or reset
    pub modal: bool,
    pub affordance: Affordance,
}
