use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use anyhow::Context;
use regex::Regex;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config_manager::TranslationConfig;
use super::direction::Direction;
use super::error::TranslateError;
use super::factory::ModelFactory;
use super::interface::TranslationModel;

/// Model instance for one direction plus the permits that gate generation on it
struct LoadedModel {
    model: Arc<dyn TranslationModel>,
    permits: Semaphore,
}

/// Translates text through one immutable model per enabled direction
pub struct TranslationEngine {
    models: BTreeMap<Direction, LoadedModel>,
    empty_input_message: String,
}

impl TranslationEngine {
    pub fn new(
        models: Vec<(Direction, Arc<dyn TranslationModel>)>,
        max_concurrent_generations: usize,
        empty_input_message: String,
    ) -> Self {
        let permits = max_concurrent_generations.max(1);
        let models = models
            .into_iter()
            .map(|(direction, model)| {
                (
                    direction,
                    LoadedModel {
                        model,
                        permits: Semaphore::new(permits),
                    },
                )
            })
            .collect();

        Self {
            models,
            empty_input_message,
        }
    }

    /// Build every enabled model and warm it up. Fails if any model is unusable.
    pub async fn load(config: &TranslationConfig) -> anyhow::Result<Self> {
        let models = ModelFactory::create_models(config)?;
        let engine = Self::new(
            models,
            config.max_concurrent_generations,
            config.empty_input_message.clone(),
        );

        if config.warmup_on_start {
            engine.warm_up(&config.warmup_text).await?;
        } else {
            warn!("Model warm-up disabled; the first request pays the cold start");
            engine.check_ready().await?;
        }
        Ok(engine)
    }

    /// Probe every model without generating
    pub async fn check_ready(&self) -> anyhow::Result<()> {
        for (direction, loaded) in &self.models {
            let id = loaded.model.model_id();
            let ready = loaded
                .model
                .ready()
                .await
                .with_context(|| format!("Model {} for {} is unreachable", id, direction))?;
            if !ready {
                anyhow::bail!("Model {} for {} reported not ready", id, direction);
            }
        }
        Ok(())
    }

    /// Run one probe translation per direction so cold-start cost is paid before serving
    pub async fn warm_up(&self, probe: &str) -> anyhow::Result<()> {
        let probes = self.models.iter().map(|(direction, loaded)| async move {
            info!("Loading model {} for {}", loaded.model.model_id(), direction);
            let started = std::time::Instant::now();
            // Straight to the model: a blank probe must still reach the upstream
            self.generate_on(loaded, probe)
                .await
                .with_context(|| {
                    format!(
                        "Failed to load model {} for {}",
                        loaded.model.model_id(),
                        direction
                    )
                })?;
            info!(
                "Model {} ready in {:.2?}",
                loaded.model.model_id(),
                started.elapsed()
            );
            Ok::<_, anyhow::Error>(())
        });
        futures::future::try_join_all(probes).await?;
        Ok(())
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.models.keys().copied().collect()
    }

    pub fn model_id(&self, direction: Direction) -> Option<&str> {
        self.models.get(&direction).map(|m| m.model.model_id())
    }

    /// Translate `text` through `direction`'s model.
    ///
    /// Blank input returns the empty-input message without touching the model.
    /// Only the best candidate is kept; no candidates yields an empty string.
    pub async fn translate(&self, direction: Direction, text: &str) -> Result<String, TranslateError> {
        let loaded = self
            .models
            .get(&direction)
            .ok_or(TranslateError::DirectionUnavailable(direction))?;

        if is_blank(text) {
            debug!("Blank input for {}, skipping model", direction);
            return Ok(self.empty_input_message.clone());
        }

        self.generate_on(loaded, text).await
    }

    async fn generate_on(&self, loaded: &LoadedModel, text: &str) -> Result<String, TranslateError> {
        let _permit = loaded
            .permits
            .acquire()
            .await
            .map_err(|_| TranslateError::Unexpected("model permits closed".to_string()))?;

        let candidates = loaded.model.generate(text).await?;
        let best = candidates.into_iter().next().unwrap_or_default();
        Ok(strip_special_tokens(&best))
    }
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Remove Marian control tokens left in decoded output.
///
/// Spacing is collapsed within each line; the model's own line breaks are kept.
pub fn strip_special_tokens(decoded: &str) -> String {
    static SPECIAL: OnceLock<Regex> = OnceLock::new();
    let special = SPECIAL.get_or_init(|| {
        Regex::new(r"</?s>|<pad>|<unk>|▁").expect("valid special token pattern")
    });
    special
        .replace_all(decoded, " ")
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
