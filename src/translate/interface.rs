use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::TranslateError;

/// Body of `POST /translate`
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    /// Missing and `null` both read as empty text
    #[serde(default)]
    pub text: Option<String>,

    /// Falls back to the instance's default direction when absent
    #[serde(default)]
    pub source_is_english: Option<bool>,
}

/// Successful `POST /translate` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
}

/// A loaded translation model bound to one language pair
///
/// Implementations hold no per-request state; the engine may call
/// `generate` from many tasks and limits concurrency itself.
#[async_trait]
pub trait TranslationModel: Send + Sync {
    /// Identifier of the pretrained checkpoint, e.g. `Helsinki-NLP/opus-mt-en-zh`
    fn model_id(&self) -> &str;

    /// Run sequence generation on one input and return the decoded candidates,
    /// best first.
    async fn generate(&self, text: &str) -> Result<Vec<String>, TranslateError>;

    /// Cheap readiness probe used when warm-up is disabled
    async fn ready(&self) -> Result<bool, TranslateError> {
        Ok(true)
    }
}
