//! Application setup and initialization

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use voidview_core::Config;
use voidview_nasa::NasaClient;

use crate::state::AppState;

/// Build state and router from a validated configuration. Does not touch
/// global tracing state, so tests can call it freely.
pub fn build_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let nasa = NasaClient::new(config.upstream(), config.max_source_bytes())
        .context("Failed to build NASA client")?;
    let state = AppState::new(config.clone(), nasa);
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}

/// Initialize the entire application
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    voidview_infra::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        site_url = %config.site_url(),
        images_api = %config.upstream().images_api_url,
        "Configuration loaded and validated successfully"
    );

    build_app(config)
}
