use serde::{Deserialize, Serialize};

use crate::translate::Direction;

/// Wire protocol spoken by the model server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceProtocol {
    /// `POST {base_url}/models/{model_id}` with `{"inputs": ...}`
    #[default]
    HuggingFace,
    /// `POST {base_url}/translate` with `{"text": ...}`
    MarianServer,
}

/// Configuration for the translation engine and its model server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default)]
    pub protocol: InferenceProtocol,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent to the model server, if any
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_direction")]
    pub default_direction: Direction,

    #[serde(default = "default_max_concurrent_generations")]
    pub max_concurrent_generations: usize,

    #[serde(default = "default_empty_input_message")]
    pub empty_input_message: String,

    #[serde(default = "default_warmup_on_start")]
    pub warmup_on_start: bool,

    #[serde(default = "default_warmup_text")]
    pub warmup_text: String,

    #[serde(default)]
    pub models: ModelsConfig,
}

/// One model per translation direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_en_zh_model")]
    pub en_zh: ModelConfig,

    #[serde(default = "default_zh_en_model")]
    pub zh_en: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_id: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Overrides `translation_config.base_url` for this model only
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_direction() -> Direction {
    Direction::EnToZh
}

fn default_max_concurrent_generations() -> usize {
    1
}

fn default_empty_input_message() -> String {
    "No text provided for translation.".to_string()
}

fn default_warmup_on_start() -> bool {
    true
}

fn default_warmup_text() -> String {
    "Hello".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_en_zh_model() -> ModelConfig {
    ModelConfig::for_direction(Direction::EnToZh)
}

fn default_zh_en_model() -> ModelConfig {
    ModelConfig::for_direction(Direction::ZhToEn)
}

impl ModelConfig {
    pub fn for_direction(direction: Direction) -> Self {
        Self {
            model_id: direction.default_model_id().to_string(),
            enabled: true,
            base_url: None,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            en_zh: default_en_zh_model(),
            zh_en: default_zh_en_model(),
        }
    }
}

impl ModelsConfig {
    pub fn get(&self, direction: Direction) -> &ModelConfig {
        match direction {
            Direction::EnToZh => &self.en_zh,
            Direction::ZhToEn => &self.zh_en,
        }
    }

    /// Directions whose model is enabled, in a stable order
    pub fn enabled_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.get(*d).enabled)
            .collect()
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            protocol: InferenceProtocol::default(),
            base_url: default_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            default_direction: default_direction(),
            max_concurrent_generations: default_max_concurrent_generations(),
            empty_input_message: default_empty_input_message(),
            warmup_on_start: default_warmup_on_start(),
            warmup_text: default_warmup_text(),
            models: ModelsConfig::default(),
        }
    }
}

impl TranslationConfig {
    /// Base URL of the model server hosting `direction`'s model
    pub fn base_url_for(&self, direction: Direction) -> &str {
        self.models
            .get(direction)
            .base_url
            .as_deref()
            .unwrap_or(&self.base_url)
    }

    pub fn validate(&self) -> Result<(), String> {
        let enabled = self.models.enabled_directions();
        if enabled.is_empty() {
            return Err("At least one translation direction must be enabled".to_string());
        }
        if !enabled.contains(&self.default_direction) {
            return Err(format!(
                "Default direction {} is not enabled",
                self.default_direction
            ));
        }
        if self.max_concurrent_generations == 0 {
            return Err("max_concurrent_generations must be at least 1".to_string());
        }
        if self.warmup_on_start && self.warmup_text.trim().is_empty() {
            return Err("warmup_text must not be blank when warmup_on_start is set".to_string());
        }
        for direction in enabled {
            if self.base_url_for(direction).trim().is_empty() {
                return Err(format!("No model server base_url for {}", direction));
            }
            if self.models.get(direction).model_id.trim().is_empty() {
                return Err(format!("No model_id for {}", direction));
            }
        }
        Ok(())
    }
}
