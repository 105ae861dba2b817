// API error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use skinscan_core::ErrorResponse;
use skinscan_model_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// 400 with a user-facing message
    #[error("{0}")]
    BadRequest(String),

    /// 413
    #[error("File too large")]
    PayloadTooLarge,

    /// 404
    #[error("Not Found")]
    NotFound,

    /// 503, inference service unreachable
    #[error("Model service unavailable")]
    ModelUnavailable(#[source] ClientError),

    /// 502, inference service answered with garbage or an error
    #[error("Model service error")]
    ModelFailed(#[source] ClientError),

    /// 500
    #[error("Internal Server Error")]
    Internal(String),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(_) | ClientError::Timeout => AppError::ModelUnavailable(err),
            ClientError::ServerError(_) | ClientError::InvalidResponse(_) => {
                AppError::ModelFailed(err)
            }
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ModelFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::ModelUnavailable(source) | AppError::ModelFailed(source) => {
                tracing::error!(status = status.as_u16(), error = %source, "Inference request failed");
                ErrorResponse::new(self.to_string()).with_details(source.to_string())
            }
            AppError::Internal(details) => {
                tracing::error!(details = %details, "Internal error");
                ErrorResponse::new(self.to_string())
            }
            _ => {
                tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
                ErrorResponse::new(self.to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}
