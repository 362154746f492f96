use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use geochat_core::config::{Credentials, LayeredConfig};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geochat_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geochat_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();

    let mut config = LayeredConfig::with_defaults();
    if let Some(path) = &api_config.config_file {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
    }
    let config = config.load_from_env();
    let credentials = Credentials::from_env();

    tracing::info!(
        port = api_config.port,
        llm = %config.llm.value,
        data_dir = %config.data_dir.value.display(),
        "Starting GeoChat API server"
    );

    let state = AppState::from_config(&config, &credentials)
        .await
        .context("Failed to initialize application state")?;
    let datasets = state.catalog.list_datasets().await?.len();
    tracing::info!(datasets, "Catalog loaded");

    let origin = api_config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin {}", api_config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(Arc::new(state)).layer(cors);

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
