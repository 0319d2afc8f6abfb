//! Configuration module
//!
//! This module provides configuration structures for the HTTP server, the NASA
//! upstream APIs and the image pipeline. Everything is read from the environment
//! (optionally seeded from a `.env` file) and validated once at startup.

use std::env;
use std::str::FromStr;

// Common constants
const SERVER_PORT: u16 = 3000;
const UPSTREAM_TIMEOUT_SECS: u64 = 8;
const UPSTREAM_MAX_RETRIES: u32 = 2;
const UPSTREAM_BACKOFF_MS: u64 = 400;
const UPSTREAM_DOWNLOAD_TIMEOUT_SECS: u64 = 45;
const MAX_SOURCE_IMAGE_MB: usize = 100;
const MAX_INPUT_PIXELS: u64 = 268_402_689; // ~16384*16384
const REQUEST_TIMEOUT_SECS: u64 = 60;
const HTTP_CONCURRENCY_LIMIT: usize = 1000;
const SITEMAP_PAGES_PER_CATEGORY: u32 = 5;

pub const DEFAULT_IMAGES_API_URL: &str = "https://images-api.nasa.gov";
pub const DEFAULT_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";
pub const DEFAULT_NASA_API_KEY: &str = "DEMO_KEY";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Public origin used for canonical links, the sitemap and robots.txt
    pub site_url: String,
    pub log_format: String,
    pub request_timeout_secs: u64,
    pub http_concurrency_limit: usize,
    pub sitemap_pages_per_category: u32,
}

/// NASA API endpoints, credentials and retry policy
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub nasa_api_key: String,
    pub images_api_url: String,
    pub apod_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
    /// Bound on a single source image download, which can be far larger
    /// than any JSON response.
    pub download_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            nasa_api_key: DEFAULT_NASA_API_KEY.to_string(),
            images_api_url: DEFAULT_IMAGES_API_URL.to_string(),
            apod_url: DEFAULT_APOD_URL.to_string(),
            timeout_secs: UPSTREAM_TIMEOUT_SECS,
            max_retries: UPSTREAM_MAX_RETRIES,
            backoff_ms: UPSTREAM_BACKOFF_MS,
            download_timeout_secs: UPSTREAM_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

/// Limits applied to source images before and during decoding
#[derive(Clone, Debug)]
pub struct ImagingConfig {
    pub max_source_bytes: usize,
    pub max_input_pixels: u64,
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            max_source_bytes: MAX_SOURCE_IMAGE_MB * 1024 * 1024,
            max_input_pixels: MAX_INPUT_PIXELS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base: BaseConfig,
    pub upstream: UpstreamConfig,
    pub imaging: ImagingConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<AppConfig>);

impl Config {
    fn inner(&self) -> &AppConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = AppConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn site_url(&self) -> &str {
        &self.inner().base.site_url
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().base.request_timeout_secs
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn sitemap_pages_per_category(&self) -> u32 {
        self.inner().base.sitemap_pages_per_category
    }

    pub fn upstream(&self) -> &UpstreamConfig {
        &self.inner().upstream
    }

    pub fn imaging(&self) -> &ImagingConfig {
        &self.inner().imaging
    }

    pub fn max_source_bytes(&self) -> usize {
        self.inner().imaging.max_source_bytes
    }

    pub fn max_input_pixels(&self) -> u64 {
        self.inner().imaging.max_input_pixels
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Parse an env var, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the public site origin: explicit `SITE_URL`, then a Vercel-style
/// deployment host, then localhost on the serving port.
pub fn resolve_site_url(site_url: Option<&str>, vercel_url: Option<&str>, port: u16) -> String {
    let url = match (site_url, vercel_url) {
        (Some(url), _) => url.to_string(),
        (None, Some(host)) => format!("https://{}", host),
        (None, None) => format!("http://localhost:{}", port),
    };
    url.trim_end_matches('/').to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let site_url = resolve_site_url(
            non_empty_var("SITE_URL").as_deref(),
            non_empty_var("VERCEL_URL").as_deref(),
            server_port,
        );

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
            site_url,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase(),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS).max(1),
            http_concurrency_limit: env_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)
                .max(1),
            sitemap_pages_per_category: env_or(
                "SITEMAP_PAGES_PER_CATEGORY",
                SITEMAP_PAGES_PER_CATEGORY,
            ),
        };

        let upstream = UpstreamConfig {
            nasa_api_key: non_empty_var("NASA_API_KEY")
                .unwrap_or_else(|| DEFAULT_NASA_API_KEY.to_string()),
            images_api_url: non_empty_var("NASA_IMAGES_API_URL")
                .unwrap_or_else(|| DEFAULT_IMAGES_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            apod_url: non_empty_var("NASA_APOD_URL")
                .unwrap_or_else(|| DEFAULT_APOD_URL.to_string()),
            timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", UPSTREAM_TIMEOUT_SECS),
            max_retries: env_or("UPSTREAM_MAX_RETRIES", UPSTREAM_MAX_RETRIES),
            backoff_ms: env_or("UPSTREAM_BACKOFF_MS", UPSTREAM_BACKOFF_MS),
            download_timeout_secs: env_or(
                "UPSTREAM_DOWNLOAD_TIMEOUT_SECS",
                UPSTREAM_DOWNLOAD_TIMEOUT_SECS,
            ),
        };

        let imaging = ImagingConfig {
            max_source_bytes: env_or("MAX_SOURCE_IMAGE_MB", MAX_SOURCE_IMAGE_MB) * 1024 * 1024,
            max_input_pixels: env_or("MAX_INPUT_PIXELS", MAX_INPUT_PIXELS),
        };

        Ok(AppConfig {
            base,
            upstream,
            imaging,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !is_http_url(&self.base.site_url) {
            return Err(anyhow::anyhow!(
                "SITE_URL must start with http:// or https://"
            ));
        }

        if !is_http_url(&self.upstream.images_api_url) {
            return Err(anyhow::anyhow!(
                "NASA_IMAGES_API_URL must start with http:// or https://"
            ));
        }

        if !is_http_url(&self.upstream.apod_url) {
            return Err(anyhow::anyhow!(
                "NASA_APOD_URL must start with http:// or https://"
            ));
        }

        if self.upstream.timeout_secs == 0 {
            return Err(anyhow::anyhow!("UPSTREAM_TIMEOUT_SECS must be greater than 0"));
        }

        if self.upstream.download_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "UPSTREAM_DOWNLOAD_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if self.imaging.max_source_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_SOURCE_IMAGE_MB must be greater than 0"));
        }

        if self.imaging.max_input_pixels == 0 {
            return Err(anyhow::anyhow!("MAX_INPUT_PIXELS must be greater than 0"));
        }

        if self.base.sitemap_pages_per_category == 0 {
            return Err(anyhow::anyhow!(
                "SITEMAP_PAGES_PER_CATEGORY must be at least 1"
            ));
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
