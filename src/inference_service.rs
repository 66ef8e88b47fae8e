use std::time::Duration;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config_manager::InferenceProtocol;
use crate::translate::TranslateError;

/// HTTP client for the model server that hosts the Marian checkpoints
#[derive(Debug, Clone)]
pub struct InferenceServiceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    protocol: InferenceProtocol,
}

#[derive(Debug, Serialize)]
pub struct HuggingFaceRequest<'a> {
    pub inputs: &'a str,
    pub options: HuggingFaceOptions,
}

#[derive(Debug, Serialize)]
pub struct HuggingFaceOptions {
    /// Block until a cold model is loaded instead of answering 503
    pub wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
pub struct HuggingFaceCandidate {
    pub translation_text: String,
}

#[derive(Debug, Serialize)]
pub struct MarianServerRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct MarianServerResponse {
    pub translation: String,
}

impl InferenceServiceClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        protocol: InferenceProtocol,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("voice-translate-backend/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            // An empty token (e.g. from an unset `${VAR}`) means no auth at all
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            protocol,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Translate one input with `model_id`, returning every candidate the server produced
    pub async fn translate(&self, model_id: &str, text: &str) -> Result<Vec<String>, TranslateError> {
        let request = match self.protocol {
            InferenceProtocol::HuggingFace => {
                let url = format!("{}/models/{}", self.base_url, model_id);
                self.client.post(&url).json(&HuggingFaceRequest {
                    inputs: text,
                    options: HuggingFaceOptions { wait_for_model: true },
                })
            }
            InferenceProtocol::MarianServer => {
                let url = format!("{}/translate", self.base_url);
                self.client.post(&url).json(&MarianServerRequest { text })
            }
        };
        let response = self.authorized(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("Model server answered {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(TranslateError::upstream_http(
                status.as_u16(),
                &String::from_utf8_lossy(&body),
            ));
        }

        parse_candidates(self.protocol, &body)
    }

    /// Check that the server is up and can serve `model_id`.
    ///
    /// `marian_server` hosts a single model and answers `/health`; the Hugging Face
    /// API reports per-model status at `GET /models/{model_id}`.
    pub async fn health_check(&self, model_id: &str) -> Result<bool, TranslateError> {
        match self.protocol {
            InferenceProtocol::MarianServer => {
                let url = format!("{}/health", self.base_url);
                let response = self.client.get(&url).send().await?;
                Ok(response.status().is_success())
            }
            InferenceProtocol::HuggingFace => {
                let url = format!("{}/models/{}", self.base_url, model_id);
                let response = self.authorized(self.client.get(&url)).send().await?;
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(TranslateError::upstream_http(status.as_u16(), &body));
                }
                Ok(true)
            }
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

/// Decode a successful model server body into translation candidates
pub fn parse_candidates(protocol: InferenceProtocol, body: &[u8]) -> Result<Vec<String>, TranslateError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| TranslateError::MalformedResponse(format!("body is not JSON: {}", e)))?;

    match protocol {
        InferenceProtocol::HuggingFace => {
            let candidates: Vec<HuggingFaceCandidate> = serde_json::from_value(value).map_err(|e| {
                TranslateError::MalformedResponse(format!(
                    "expected a list of {{\"translation_text\"}} objects: {}",
                    e
                ))
            })?;
            Ok(candidates.into_iter().map(|c| c.translation_text).collect())
        }
        InferenceProtocol::MarianServer => {
            let response: MarianServerResponse = serde_json::from_value(value).map_err(|e| {
                TranslateError::MalformedResponse(format!("expected {{\"translation\"}}: {}", e))
            })?;
            Ok(vec![response.translation])
        }
    }
}
