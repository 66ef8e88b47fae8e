use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::AppState;
use crate::translate::{Direction, TranslateError, TranslateRequest, TranslateResponse};

/// `POST /translate`
pub async fn translate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TranslateResponse>, TranslateError> {
    let request_id = Uuid::new_v4();
    let request = parse_translate_request(&body).map_err(|e| {
        warn!("[{}] Rejected translate request: {}", request_id, e);
        e
    })?;

    let direction = request
        .source_is_english
        .map(Direction::from_source_is_english)
        .unwrap_or_else(|| state.default_direction());
    let text = request.text.unwrap_or_default();
    debug!(
        "[{}] Translating {} chars via {}",
        request_id,
        text.chars().count(),
        direction
    );

    match state.engine.translate(direction, &text).await {
        Ok(translation) => {
            info!("[{}] Translated {} request", request_id, direction);
            Ok(Json(TranslateResponse { translation }))
        }
        Err(e) => {
            warn!("[{}] Translation via {} failed ({}): {}", request_id, direction, e.kind(), e);
            Err(e)
        }
    }
}

/// An empty body reads as `{}`; anything else must be a JSON object
fn parse_translate_request(body: &[u8]) -> Result<TranslateRequest, TranslateError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TranslateRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| TranslateError::InvalidRequest(e.to_string()))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "message": "health ok" }))
}

/// `GET /api/status`
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    let models: Map<String, Value> = state
        .engine
        .directions()
        .into_iter()
        .filter_map(|d| {
            state.engine.model_id(d).map(|id| {
                let entry = json!({
                    "model_id": id,
                    "source": d.source_lang(),
                    "target": d.target_lang(),
                });
                (d.to_string(), entry)
            })
        })
        .collect();
    let uptime = chrono::Utc::now() - state.started_at;

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": uptime.num_seconds(),
        "default_direction": state.default_direction(),
        "protocol": state.config.translation_config.protocol,
        "models": models,
    }))
}
