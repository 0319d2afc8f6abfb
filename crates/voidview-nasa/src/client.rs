use std::time::Duration;

use bytes::{Bytes, BytesMut};
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use voidview_core::config::UpstreamConfig;
use voidview_core::models::{ApodResponse, AssetKind};

use crate::assets::{pick_best, print_candidates, AssetPick};
use crate::error::NasaError;
use crate::models::{AssetEnvelope, SearchCollection, SearchEnvelope};
use crate::retry::RetryPolicy;

/// HTTP client for the NASA Images and APOD APIs.
///
/// JSON calls go through the retry policy with a per-attempt timeout. Image
/// downloads are single attempts with their own, longer timeout and a byte cap.
#[derive(Clone, Debug)]
pub struct NasaClient {
    http: Client,
    images_api_url: String,
    apod_url: String,
    api_key: String,
    retry: RetryPolicy,
    request_timeout: Duration,
    download_timeout: Duration,
    max_download_bytes: usize,
}

impl NasaClient {
    pub fn new(config: &UpstreamConfig, max_download_bytes: usize) -> Result<Self, NasaError> {
        let http = Client::builder()
            .user_agent(concat!("voidview/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NasaError::Config(e.to_string()))?;

        Ok(Self {
            http,
            images_api_url: config.images_api_url.trim_end_matches('/').to_string(),
            apod_url: config.apod_url.clone(),
            api_key: config.nasa_api_key.clone(),
            retry: RetryPolicy::new(
                config.max_retries,
                Duration::from_millis(config.backoff_ms),
            ),
            request_timeout: Duration::from_secs(config.timeout_secs),
            download_timeout: Duration::from_secs(config.download_timeout_secs),
            max_download_bytes,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn max_download_bytes(&self) -> usize {
        self.max_download_bytes
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, NasaError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NasaError::http(status.as_u16(), &body));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// GET a JSON document, retrying timeouts, transport errors and
    /// retryable statuses with linear backoff.
    pub async fn fetch_json_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, NasaError> {
        self.retry
            .execute(url, move || self.get_json_once(url, query))
            .await
    }

    /// One page of image search results for a free-text query.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchCollection, NasaError> {
        let url = format!("{}/search", self.images_api_url);
        let params = [
            ("q", query.to_string()),
            ("media_type", "image".to_string()),
            ("page", page.to_string()),
        ];
        let envelope: SearchEnvelope = self.fetch_json_with_retry(&url, &params).await?;
        Ok(envelope.collection)
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_by_nasa_id(&self, nasa_id: &str) -> Result<SearchCollection, NasaError> {
        let url = format!("{}/search", self.images_api_url);
        let params = [
            ("nasa_id", nasa_id.to_string()),
            ("media_type", "image".to_string()),
        ];
        let envelope: SearchEnvelope = self.fetch_json_with_retry(&url, &params).await?;
        Ok(envelope.collection)
    }

    /// Every file URL NASA lists for an id, in listing order.
    #[tracing::instrument(skip(self))]
    pub async fn asset_manifest(&self, nasa_id: &str) -> Result<Vec<String>, NasaError> {
        let url = format!(
            "{}/asset/{}",
            self.images_api_url,
            urlencoding::encode(nasa_id)
        );
        let envelope: AssetEnvelope = self.fetch_json_with_retry(&url, &[]).await?;
        Ok(envelope.collection.urls())
    }

    /// Astronomy Picture of the Day for `date` (today when `None`).
    #[tracing::instrument(skip(self))]
    pub async fn apod(&self, date: Option<&str>, hd: bool) -> Result<ApodResponse, NasaError> {
        let mut params = vec![("api_key", self.api_key.clone())];
        if let Some(date) = date {
            params.push(("date", date.to_string()));
        }
        params.push(("hd", hd.to_string()));
        self.fetch_json_with_retry(&self.apod_url, &params).await
    }

    /// Thumbnail of the first search hit for an id. Failures count as "none".
    pub async fn fallback_thumb(&self, nasa_id: &str) -> Option<String> {
        match self.search_by_nasa_id(nasa_id).await {
            Ok(collection) => collection
                .items
                .first()
                .and_then(|item| item.thumb())
                .map(str::to_string),
            Err(error) => {
                tracing::warn!(nasa_id = nasa_id, error = %error, "Thumbnail fallback search failed");
                None
            }
        }
    }

    /// Best source image for rendering: the preferred manifest variant, else
    /// the search thumbnail. A failed manifest lookup falls through to the
    /// thumbnail rather than failing the request.
    pub async fn resolve_best_asset(&self, nasa_id: &str) -> Option<AssetPick> {
        match self.asset_manifest(nasa_id).await {
            Ok(urls) => {
                if let (Some(url), kind) = pick_best(&urls) {
                    return Some(AssetPick { url, kind });
                }
            }
            Err(error) => {
                tracing::warn!(nasa_id = nasa_id, error = %error, "Asset manifest lookup failed");
            }
        }

        self.fallback_thumb(nasa_id).await.map(|url| AssetPick {
            url,
            kind: AssetKind::ThumbFallback,
        })
    }

    /// Source URLs worth probing for print metadata, best first. Falls back
    /// to the search thumbnail when the manifest lists no images.
    pub async fn print_source_candidates(&self, nasa_id: &str) -> Vec<String> {
        match self.asset_manifest(nasa_id).await {
            Ok(urls) => {
                let picked = print_candidates(&urls);
                if !picked.is_empty() {
                    return picked;
                }
            }
            Err(error) => {
                tracing::warn!(nasa_id = nasa_id, error = %error, "Asset manifest lookup failed");
            }
        }

        self.fallback_thumb(nasa_id).await.into_iter().collect()
    }

    async fn start_download(&self, url: &str) -> Result<reqwest::Response, NasaError> {
        let response = self
            .http
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NasaError::Http {
                status: status.as_u16(),
                body: "Failed to download source image".to_string(),
            });
        }
        Ok(response)
    }

    /// Download a whole source image, refusing anything over the byte cap.
    #[tracing::instrument(skip(self))]
    pub async fn download(&self, url: &str) -> Result<Bytes, NasaError> {
        let limit = self.max_download_bytes;
        let mut response = self.start_download(url).await?;

        if let Some(len) = response.content_length() {
            if len > limit as u64 {
                return Err(NasaError::TooLarge { limit });
            }
        }

        let mut buf = BytesMut::with_capacity(
            response.content_length().map(|l| l as usize).unwrap_or(0),
        );
        while let Some(chunk) = response.chunk().await? {
            if buf.len() + chunk.len() > limit {
                return Err(NasaError::TooLarge { limit });
            }
            buf.extend_from_slice(&chunk);
        }

        tracing::debug!(url = url, bytes = buf.len(), "Downloaded source image");
        Ok(buf.freeze())
    }

    /// Stream a source image only until `probe` can answer from the bytes
    /// received so far. Returns `Ok(None)` if the body ends (or reaches the
    /// byte cap) without an answer.
    pub async fn read_header<T, F>(&self, url: &str, mut probe: F) -> Result<Option<T>, NasaError>
    where
        F: FnMut(&[u8]) -> Option<T>,
    {
        let limit = self.max_download_bytes;
        let mut response = self.start_download(url).await?;
        let mut buf = BytesMut::new();

        while let Some(chunk) = response.chunk().await? {
            buf.extend_from_slice(&chunk);
            if let Some(found) = probe(&buf) {
                tracing::debug!(url = url, bytes_read = buf.len(), "Header probe satisfied");
                return Ok(Some(found));
            }
            if buf.len() >= limit {
                break;
            }
        }
        Ok(None)
    }
}

/// Pick a random topic and a random page in `1..=max_page`.
pub fn random_search(queries: &[&'static str], max_page: u32) -> (&'static str, u32) {
    let mut rng = rand::rng();
    let query = queries.choose(&mut rng).copied().unwrap_or("space");
    let page = rng.random_range(1..=max_page.max(1));
    (query, page)
}
