//! Shared test setup: a router wired to a wiremock stand-in for NASA.
#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use voidview_core::config::{AppConfig, BaseConfig, ImagingConfig, UpstreamConfig};
use voidview_core::Config;
use wiremock::MockServer;

pub const SITE_URL: &str = "https://voidview.test";

/// Returns the API path for a route, e.g. `api_path("/feed")` -> `/api/feed`.
pub fn api_path(path: &str) -> String {
    format!("{}{}", voidview_api::constants::API_PREFIX, path)
}

pub fn test_config(upstream: &MockServer) -> AppConfig {
    AppConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            site_url: SITE_URL.to_string(),
            log_format: "pretty".to_string(),
            request_timeout_secs: 30,
            http_concurrency_limit: 64,
            sitemap_pages_per_category: 5,
        },
        upstream: UpstreamConfig {
            nasa_api_key: "TEST_KEY".to_string(),
            images_api_url: upstream.uri(),
            apod_url: format!("{}/planetary/apod", upstream.uri()),
            timeout_secs: 2,
            max_retries: 1,
            backoff_ms: 1,
            download_timeout_secs: 5,
        },
        imaging: ImagingConfig {
            max_source_bytes: 8 * 1024 * 1024,
            max_input_pixels: 50_000_000,
        },
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub nasa: MockServer,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Base URL of the mocked NASA host, for building asset URLs.
    pub fn nasa_uri(&self) -> String {
        self.nasa.uri()
    }
}

/// Setup a test application against a fresh mock NASA server
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

pub async fn setup_test_app_with(customize: impl FnOnce(&mut AppConfig)) -> TestApp {
    let nasa = MockServer::start().await;
    let mut config = test_config(&nasa);
    customize(&mut config);

    let (_state, router) =
        voidview_api::setup::build_app(Config(Box::new(config))).expect("Failed to build app");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, nasa }
}
