use std::any::Any;
use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;
use crate::translate::TranslateError;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/translate", post(handlers::translate))
        .route("/health", get(handlers::health))
        .route("/api/status", get(handlers::status))
}

/// Full application: routes, panic boundary, request tracing and CORS
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    TranslateError::Unexpected(format!("handler panicked: {}", detail)).into_response()
}
