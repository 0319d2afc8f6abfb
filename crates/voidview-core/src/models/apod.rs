use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Explanation used when a fallback image has no description.
pub const FALLBACK_EXPLANATION: &str = "From NASA Image Library.";

/// Topics the Images API fallback picks from when APOD is unavailable.
pub const APOD_FALLBACK_QUERIES: [&str; 8] = [
    "nebula",
    "galaxy",
    "hubble",
    "jwst",
    "saturn",
    "jupiter",
    "mars",
    "earth from space",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ApodSource {
    Apod,
    ImagesApi,
}

/// Astronomy Picture of the Day, either passed through from the APOD API or
/// synthesized from an Images API search hit.
///
/// Only `date` is guaranteed. APOD omits `url` for some non-image entries and
/// those are passed through as they are.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApodResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nasa_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ApodSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Any other APOD fields (e.g. `thumbnail_url`) are passed through untouched.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl ApodResponse {
    /// Build the APOD-shaped response for an Images API fallback pick.
    pub fn from_images_api(
        date: String,
        nasa_id: String,
        title: String,
        description: Option<String>,
        preview_url: String,
        hdurl: Option<String>,
        query: &str,
    ) -> Self {
        Self {
            copyright: None,
            date,
            explanation: Some(description.unwrap_or_else(|| FALLBACK_EXPLANATION.to_string())),
            hdurl,
            media_type: Some("image".to_string()),
            service_version: None,
            title: Some(title),
            url: Some(preview_url),
            nasa_id: Some(nasa_id),
            source: Some(ApodSource::ImagesApi),
            query: Some(query.to_string()),
            extra: Map::new(),
        }
    }
}
