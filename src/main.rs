mod config_manager;
mod handlers;
mod inference_service;
mod routes;
mod state;
mod translate;

#[cfg(test)]
mod test_utils;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config_manager::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("voice_translate_backend=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::discover()?;

    // Models load before the listener exists, so no request reaches a half-initialized service
    info!(
        "Initializing: loading {} model(s) from {}",
        config.translation_config.models.enabled_directions().len(),
        config.translation_config.base_url
    );
    let app_state = AppState::new(config.clone()).await?;
    info!(
        "Models ready: {}",
        app_state
            .engine
            .directions()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let app = routes::build_app(app_state);

    let addr = config.system_config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
