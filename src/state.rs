use std::sync::Arc;
use chrono::{DateTime, Utc};

use crate::config_manager::Config;
use crate::translate::{Direction, TranslationEngine};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<TranslationEngine>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Load the models named in `config`; returns only once every model is ready
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let engine = TranslationEngine::load(&config.translation_config).await?;
        Ok(Self::with_engine(config, engine))
    }

    pub fn with_engine(config: Config, engine: TranslationEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            started_at: Utc::now(),
        }
    }

    /// Direction used when a request does not say `sourceIsEnglish`
    pub fn default_direction(&self) -> Direction {
        self.config.translation_config.default_direction
    }
}
