// Inference service HTTP client

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ClientError;

/// One class probability returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub label: String,
    pub probability: f64,
}

/// Classifier output over all classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub predictions: Vec<ClassScore>,
}

impl Classification {
    /// Scores sorted by descending probability
    pub fn ranked(&self) -> Vec<ClassScore> {
        let mut scores = self.predictions.clone();
        scores.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        scores
    }

    /// The `k` most probable classes
    pub fn top(&self, k: usize) -> Vec<ClassScore> {
        let mut ranked = self.ranked();
        ranked.truncate(k);
        ranked
    }
}

/// Metadata about the deployed model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub loaded: bool,
    #[serde(default)]
    pub num_classes: usize,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Client for the image classification service
pub struct ModelClient {
    client: reqwest::Client,
    base_url: String,
}

impl ModelClient {
    /// Create a new model client
    ///
    /// # Arguments
    /// * `base_url` - Inference service URL (e.g., "http://localhost:8501")
    /// * `timeout` - Ceiling for a single request
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy() // Disable proxy for localhost connections
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Classify an image
    ///
    /// # Arguments
    /// * `image` - Encoded image bytes (JPEG or PNG)
    /// * `mime_type` - Content type of `image`
    ///
    /// # Returns
    /// Probabilities for every class known to the model
    pub async fn classify(&self, image: &[u8], mime_type: &str) -> Result<Classification, ClientError> {
        let url = format!("{}/v1/classify", self.base_url);
        tracing::debug!(url = %url, bytes = image.len(), "Sending image to inference service");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(image.to_vec())
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %text, "Inference service returned an error");
            return Err(ClientError::ServerError(format!("{}: {}", status, text.trim())));
        }

        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        let classification: Classification = serde_json::from_slice(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if classification.predictions.is_empty() {
            return Err(ClientError::InvalidResponse("no predictions returned".to_string()));
        }
        if classification
            .predictions
            .iter()
            .any(|p| !p.probability.is_finite() || p.probability < 0.0)
        {
            return Err(ClientError::InvalidResponse("invalid probability".to_string()));
        }

        Ok(classification)
    }

    /// Fetch model metadata
    pub async fn model_info(&self) -> Result<ModelInfo, ClientError> {
        let url = format!("{}/v1/model", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ServerError(status.to_string()));
        }

        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}
