use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use tracing::info;

use crate::config_manager::TranslationConfig;
use crate::inference_service::InferenceServiceClient;
use super::direction::Direction;
use super::interface::TranslationModel;
use super::remote::RemoteMarianModel;

/// Factory for the per-direction translation models
pub struct ModelFactory;

impl ModelFactory {
    /// Create one model per enabled direction.
    ///
    /// Directions pointing at the same model server share one HTTP client.
    pub fn create_models(
        config: &TranslationConfig,
    ) -> Result<Vec<(Direction, Arc<dyn TranslationModel>)>> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let mut clients: HashMap<String, Arc<InferenceServiceClient>> = HashMap::new();
        let mut models: Vec<(Direction, Arc<dyn TranslationModel>)> = Vec::new();

        for direction in config.models.enabled_directions() {
            let model_config = config.models.get(direction);
            let base_url = config.base_url_for(direction).to_string();

            let client = match clients.get(&base_url) {
                Some(client) => client.clone(),
                None => {
                    let client = Arc::new(InferenceServiceClient::new(
                        &base_url,
                        config.api_key.clone(),
                        config.protocol,
                        timeout,
                    )?);
                    clients.insert(base_url.clone(), client.clone());
                    client
                }
            };

            info!(
                "Initializing {} model {} ({:?} at {})",
                direction, model_config.model_id, config.protocol, base_url
            );
            models.push((
                direction,
                Arc::new(RemoteMarianModel::new(model_config.model_id.clone(), client)),
            ));
        }

        Ok(models)
    }
}
