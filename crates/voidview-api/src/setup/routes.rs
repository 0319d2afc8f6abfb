//! Route configuration and setup

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;
use voidview_core::{AppError, Config};
use voidview_infra::{request_id_middleware, security_headers_middleware, SecurityHeaders};

use crate::api_doc::openapi_json;
use crate::constants::API_PREFIX;
use crate::error::HttpAppError;
use crate::handlers::{
    apod, asset, featured, feed, health, image, presets, print, print_meta, site, wallpaper,
};
use crate::state::AppState;

/// Render request bodies are a handful of small fields.
const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024;

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/feed", get(feed::get_feed))
        .route("/featured", get(featured::get_featured))
        .route("/image/{nasa_id}", get(image::get_image))
        .route("/asset/{nasa_id}", get(asset::get_asset))
        .route("/apod", get(apod::get_apod))
        .route(
            "/wallpaper",
            get(wallpaper::get_wallpaper).post(wallpaper::post_wallpaper),
        )
        .route("/print", get(print::get_print).post(print::post_print))
        .route("/print-meta", get(print_meta::get_print_meta))
        .route("/print-plan", get(presets::get_print_plan))
        .route("/presets", get(presets::get_presets))
        .route("/openapi.json", get(openapi_json))
}

fn site_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(site::home))
        .route("/c/{cat}", get(site::category_index))
        .route("/c/{cat}/{page}", get(site::category_listing))
        .route("/sitemap.xml", get(site::sitemap))
        .route("/robots.txt", get(site::robots))
        .route("/health", get(health::liveness_check))
}

async fn not_found() -> HttpAppError {
    AppError::NotFound("Not found".to_string()).into()
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(
        http_concurrency_limit,
        request_timeout_secs = config.request_timeout_secs(),
        "HTTP limits configured"
    );

    let app = Router::new()
        .nest(API_PREFIX, api_routes())
        .merge(site_routes())
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .fallback(not_found)
        // Router::layer wraps every route separately; the global variant
        // shares one semaphore so the limit holds across the whole server.
        .layer(GlobalConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs(),
        )))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            SecurityHeaders::for_environment(config.is_production()).with_docs_path("/docs"),
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration. Only GET and POST are served.
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
