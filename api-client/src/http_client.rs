// HTTP client for the skin analysis API

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use skinscan_core::{
    normalize_json, AnalysisRequest, ClientConfig, DiseaseInfo, HealthStatus, NormalizedResult,
    ProgressTracker, SymptomCatalogResponse,
};

use crate::errors::ApiError;
use crate::retry::RetryPolicy;
use crate::runtime;

/// Client bound to one configuration
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout);
        let http = builder
            .build()
            .map_err(|e| ApiError::Unknown(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Client configured from `API_BASE_URL` and friends
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit an analysis request once
    ///
    /// # Arguments
    /// * `request` - Image and symptoms frozen at submit time
    /// * `on_progress` - Receives a non-decreasing percentage in 0..=100
    ///
    /// # Returns
    /// The normalized result, or a classified error
    pub async fn submit_analysis<P>(
        &self,
        request: &AnalysisRequest,
        mut on_progress: P,
    ) -> Result<NormalizedResult, ApiError>
    where
        P: FnMut(u8),
    {
        let mut tracker = ProgressTracker::new();
        let mut report = |percent: u8| {
            if tracker.advance(percent) {
                on_progress(tracker.percent());
            }
        };
        self.attempt(request, &mut report).await
    }

    /// Submit with retries on transient failures (network, timeout, 429, 5xx)
    pub async fn predict_with_retry<P>(
        &self,
        request: &AnalysisRequest,
        mut on_progress: P,
    ) -> Result<NormalizedResult, ApiError>
    where
        P: FnMut(u8),
    {
        let policy = RetryPolicy::from_config(&self.config);
        let mut tracker = ProgressTracker::new();
        let mut report = |percent: u8| {
            if tracker.advance(percent) {
                on_progress(tracker.percent());
            }
        };

        let mut attempt = 0u32;
        loop {
            if attempt > 0 {
                tracing::debug!(request = request.id.0, attempt, "Retrying analysis request");
            }

            match self.attempt(request, &mut report).await {
                Ok(result) => {
                    if attempt > 0 {
                        tracing::info!(
                            request = request.id.0,
                            attempt,
                            "Analysis request succeeded after retry"
                        );
                    }
                    return Ok(result);
                }
                Err(err) if policy.should_retry(&err, attempt) => {
                    let delay = policy.delay_for(attempt);
                    tracing::warn!(
                        request = request.id.0,
                        attempt,
                        backoff_ms = delay.as_millis() as u64,
                        error = %err,
                        "Analysis request failed, will retry after backoff"
                    );
                    runtime::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(
                        request = request.id.0,
                        attempt,
                        kind = err.kind().as_str(),
                        error = %err,
                        "Analysis request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/health").await
    }

    /// GET /diseases
    pub async fn diseases(&self) -> Result<Vec<DiseaseInfo>, ApiError> {
        self.get_json("/diseases").await
    }

    /// GET /symptoms
    pub async fn symptoms(&self) -> Result<SymptomCatalogResponse, ApiError> {
        self.get_json("/symptoms").await
    }

    async fn attempt(
        &self,
        request: &AnalysisRequest,
        report: &mut dyn FnMut(u8),
    ) -> Result<NormalizedResult, ApiError> {
        report(0);
        let form = build_form(request)?;
        report(10);

        let url = self.config.endpoint("/predict");
        let exchange = async {
            let response = self
                .http
                .post(&url)
                .multipart(form)
                .send()
                .await
                .map_err(|e| ApiError::from_transport(&e))?;
            // Headers are back, so the upload finished
            report(50);
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| ApiError::from_transport(&e))?;
            report(80);
            Ok::<_, ApiError>((status, body))
        };

        let (status, body) = runtime::with_timeout(self.config.request_timeout, exchange)
            .await
            .ok_or(ApiError::Timeout)??;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        let result = normalize_json(&body)?;
        report(100);
        Ok(result)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        let exchange = async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| ApiError::from_transport(&e))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| ApiError::from_transport(&e))?;
            Ok::<_, ApiError>((status, body))
        };

        let (status, body) = runtime::with_timeout(self.config.request_timeout, exchange)
            .await
            .ok_or(ApiError::Timeout)??;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

/// Multipart body: `image` part plus `symptoms` only when any were given
fn build_form(request: &AnalysisRequest) -> Result<Form, ApiError> {
    let image = &request.image;
    let part = Part::bytes(image.data.to_vec())
        .file_name(image.file_name.clone())
        .mime_str(&image.mime_type)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid image type: {}", e)))?;

    let mut form = Form::new().part("image", part);
    if let Some(symptoms) = request.symptoms.to_form_value() {
        form = form.text("symptoms", symptoms);
    }
    Ok(form)
}

/// Submit an analysis using the environment configuration
pub async fn submit_analysis<P>(
    request: &AnalysisRequest,
    on_progress: P,
) -> Result<NormalizedResult, ApiError>
where
    P: FnMut(u8),
{
    ApiClient::from_env()?
        .submit_analysis(request, on_progress)
        .await
}

/// Submit with retries using the environment configuration
pub async fn predict_with_retry<P>(
    request: &AnalysisRequest,
    on_progress: P,
) -> Result<NormalizedResult, ApiError>
where
    P: FnMut(u8),
{
    ApiClient::from_env()?
        .predict_with_retry(request, on_progress)
        .await
}
