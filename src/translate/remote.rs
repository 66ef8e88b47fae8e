use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::inference_service::InferenceServiceClient;
use super::error::TranslateError;
use super::interface::TranslationModel;

/// Marian checkpoint served by a model server and reached over HTTP
pub struct RemoteMarianModel {
    model_id: String,
    service: Arc<InferenceServiceClient>,
}

impl RemoteMarianModel {
    pub fn new(model_id: String, service: Arc<InferenceServiceClient>) -> Self {
        Self { model_id, service }
    }
}

#[async_trait]
impl TranslationModel for RemoteMarianModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, text: &str) -> Result<Vec<String>, TranslateError> {
        debug!(
            "Generating with {} via {} ({} chars)",
            self.model_id,
            self.service.base_url(),
            text.chars().count()
        );
        self.service.translate(&self.model_id, text).await
    }

    async fn ready(&self) -> Result<bool, TranslateError> {
        self.service.health_check(&self.model_id).await
    }
}
