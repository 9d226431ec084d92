mod config;
mod error;
mod form;
mod metrics;
mod routes;
mod upload;

use std::sync::Arc;

use anyhow::{Context, Result};
use extract::{ExtractionEngine, Extractor};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};
use crate::metrics::Metrics;
use crate::routes::{AppState, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    init_tracing(config.server.log_format);

    let engine = config.build_engine()?;
    tracing::info!(engine = engine.name(), "Extraction engine configured");

    let state = Arc::new(AppState {
        extractor: Extractor::new(engine),
        metrics: Metrics::new(),
    });

    let app = build_router(state, &config.server)?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;

    tracing::info!(
        addr = %config.server.bind_addr,
        max_upload_mb = config.server.max_upload_mb,
        "Server listening"
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
