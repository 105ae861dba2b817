// API client errors

use serde::Deserialize;
use skinscan_core::{ErrorDescriptor, ErrorKind, NormalizeError, SuggestedAction};

/// API client error types
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No response reached the client
    Network(String),
    /// Response window exceeded
    Timeout,
    /// 400, with the server's message when present
    InvalidRequest(String),
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 413
    PayloadTooLarge,
    /// 429
    RateLimited,
    /// 5xx
    Server { status: u16, message: String },
    /// 2xx whose body declares the analysis failed
    Rejected(String),
    /// 2xx whose body could not be understood
    InvalidResponse(String),
    Unknown(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn body_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .filter(|m| !m.trim().is_empty())
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = body_message(body);
        match status {
            400 => ApiError::InvalidRequest(
                message.unwrap_or_else(|| "The server could not process this image".to_string()),
            ),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            413 => ApiError::PayloadTooLarge,
            429 => ApiError::RateLimited,
            500..=599 => ApiError::Server {
                status,
                message: message.unwrap_or_else(|| format!("HTTP {}", status)),
            },
            _ => ApiError::Unknown(
                message.unwrap_or_else(|| format!("Unexpected HTTP status {}", status)),
            ),
        }
    }

    /// Classify a transport failure
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_request() || err.is_body() || is_connect(err) {
            ApiError::Network(err.to_string())
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Unknown(err.to_string())
        }
    }

    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::Timeout | ApiError::RateLimited | ApiError::Server { .. }
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Timeout => ErrorKind::Timeout,
            ApiError::InvalidRequest(_) | ApiError::PayloadTooLarge | ApiError::Rejected(_) => {
                ErrorKind::InvalidImage
            }
            ApiError::Unauthorized | ApiError::Forbidden | ApiError::NotFound => ErrorKind::Critical,
            ApiError::RateLimited => ErrorKind::RateLimited,
            ApiError::Server { .. } | ApiError::InvalidResponse(_) => ErrorKind::Server,
            ApiError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Descriptor handed to the flow controller
    pub fn to_descriptor(&self) -> ErrorDescriptor {
        let kind = self.kind();
        let action = match kind {
            ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Server | ErrorKind::RateLimited => {
                SuggestedAction::Retry
            }
            ErrorKind::InvalidImage => SuggestedAction::Upload,
            _ => SuggestedAction::None,
        };
        ErrorDescriptor::new(kind, self.to_string(), action)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn is_connect(err: &reqwest::Error) -> bool {
    err.is_connect()
}

#[cfg(target_arch = "wasm32")]
fn is_connect(_err: &reqwest::Error) -> bool {
    false
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Rejected(message) => ApiError::Rejected(message),
            NormalizeError::MissingPrediction | NormalizeError::Decode(_) => {
                ApiError::InvalidResponse(err.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(_) => write!(
                f,
                "Unable to reach the analysis server. Please check your connection and try again"
            ),
            ApiError::Timeout => write!(f, "The analysis took too long. Please try again"),
            ApiError::InvalidRequest(msg) => write!(f, "{}", msg),
            ApiError::Unauthorized => write!(f, "You are not authorized to use this service"),
            ApiError::Forbidden => write!(f, "Access to this service is forbidden"),
            ApiError::NotFound => write!(f, "The analysis service could not be found"),
            ApiError::PayloadTooLarge => {
                write!(f, "The image is too large. Please choose a smaller file")
            }
            ApiError::RateLimited => {
                write!(f, "Too many requests. Please wait a moment and try again")
            }
            ApiError::Server { status, .. } => {
                write!(f, "The server encountered an error ({}). Please try again", status)
            }
            ApiError::Rejected(msg) => write!(f, "{}", msg),
            ApiError::InvalidResponse(_) => {
                write!(f, "The server returned an unexpected response. Please try again")
            }
            ApiError::Unknown(msg) => write!(f, "Unexpected error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
