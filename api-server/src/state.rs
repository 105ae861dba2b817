// Shared application state

use futures::future::BoxFuture;
use skinscan_model_client::{Classification, ClientError, ModelClient, ModelInfo};
use std::sync::Arc;

use crate::config::ServerConfig;

/// Image classifier backing `/predict` and `/health`
pub trait Classifier: Send + Sync {
    fn classify<'a>(
        &'a self,
        image: &'a [u8],
        mime_type: &'a str,
    ) -> BoxFuture<'a, Result<Classification, ClientError>>;

    fn model_info(&self) -> BoxFuture<'_, Result<ModelInfo, ClientError>>;
}

impl Classifier for ModelClient {
    fn classify<'a>(
        &'a self,
        image: &'a [u8],
        mime_type: &'a str,
    ) -> BoxFuture<'a, Result<Classification, ClientError>> {
        Box::pin(ModelClient::classify(self, image, mime_type))
    }

    fn model_info(&self) -> BoxFuture<'_, Result<ModelInfo, ClientError>> {
        Box::pin(ModelClient::model_info(self))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>, config: ServerConfig) -> Self {
        Self {
            classifier,
            config: Arc::new(config),
        }
    }

    /// State backed by the HTTP inference service named in `config`
    pub fn with_model_service(config: ServerConfig) -> Result<Self, ClientError> {
        let client = ModelClient::new(config.model_service_url.clone(), config.model_timeout)?;
        Ok(Self::new(Arc::new(client), config))
    }
}
