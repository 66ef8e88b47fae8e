//! Shared fixtures for unit tests.

use async_trait::async_trait;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::translate::{Direction, TranslateError, TranslationEngine, TranslationModel};

pub const EMPTY_INPUT_MESSAGE: &str = "No text provided for translation.";

enum Behavior {
    Echo,
    Fixed(Vec<String>),
    Failing(fn() -> TranslateError),
    Panicking,
}

/// In-memory `TranslationModel` that records how it was called
pub struct FakeModel {
    model_id: String,
    behavior: Behavior,
    delay: Option<Duration>,
    ready: bool,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeModel {
    fn new(model_id: &str, behavior: Behavior) -> Self {
        Self {
            model_id: model_id.to_string(),
            behavior,
            delay: None,
            ready: true,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Answers `[<pair>] <input>`, where the pair is taken from the `opus-mt-` model id
    pub fn echo(model_id: &str) -> Self {
        Self::new(model_id, Behavior::Echo)
    }

    pub fn fixed(model_id: &str, candidates: Vec<&str>) -> Self {
        let candidates = candidates.into_iter().map(String::from).collect();
        Self::new(model_id, Behavior::Fixed(candidates))
    }

    pub fn failing(model_id: &str, error: fn() -> TranslateError) -> Self {
        Self::new(model_id, Behavior::Failing(error))
    }

    pub fn panicking(model_id: &str) -> Self {
        Self::new(model_id, Behavior::Panicking)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer the readiness probe with `false`
    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn pair(&self) -> &str {
        self.model_id.rsplit("opus-mt-").next().unwrap_or(&self.model_id)
    }
}

#[async_trait]
impl TranslationModel for FakeModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, text: &str) -> Result<Vec<String>, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.behavior {
            Behavior::Echo => Ok(vec![format!("[{}] {}", self.pair(), text)]),
            Behavior::Fixed(candidates) => Ok(candidates.clone()),
            Behavior::Failing(error) => Err(error()),
            Behavior::Panicking => panic!("model state corrupted"),
        }
    }

    async fn ready(&self) -> Result<bool, TranslateError> {
        Ok(self.ready)
    }
}

pub fn engine_with(models: Vec<(Direction, Arc<FakeModel>)>, permits: usize) -> TranslationEngine {
    let models = models
        .into_iter()
        .map(|(direction, model)| (direction, model as Arc<dyn TranslationModel>))
        .collect();
    TranslationEngine::new(models, permits, EMPTY_INPUT_MESSAGE.to_string())
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a local port nothing is listening on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
