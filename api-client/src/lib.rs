// API client library for the skin analysis service
//
// This crate submits analysis requests to the backend, retries transient
// failures and turns every failure into a classified `ApiError`.

pub mod errors;
pub mod http_client;
pub mod retry;
pub mod runtime;

// Re-export commonly used items
pub use errors::ApiError;
pub use http_client::{predict_with_retry, submit_analysis, ApiClient};
pub use retry::RetryPolicy;
