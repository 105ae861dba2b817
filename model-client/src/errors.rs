// Client errors

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout: the inference service did not respond")]
    Timeout,

    #[error("Inference service error: {0}")]
    ServerError(String),

    #[error("Invalid response from inference service: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Split timeouts out of generic transport failures
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Network(err)
        }
    }
}
