//! Astronomy Picture of the Day with fallbacks.
//!
//! APOD is tried in HD and then non-HD. When both fail, an image from the
//! Images API is dressed up in the APOD shape so callers always have a
//! picture to show.

use serde_json::{json, Value};
use voidview_core::models::{ApodResponse, APOD_FALLBACK_QUERIES, RANDOM_PAGE_MAX};

use crate::assets::largest_raster;
use crate::client::{random_search, NasaClient};
use crate::error::NasaError;

#[derive(Debug, Clone)]
pub struct ApodOutcome {
    pub apod: ApodResponse,
    /// True when the picture came from the Images API instead of APOD.
    pub fallback: bool,
}

/// Why every step of the chain failed.
#[derive(Debug, Clone)]
pub struct ApodFailure {
    pub hd: String,
    pub non_hd: String,
    pub fallback: String,
}

impl ApodFailure {
    pub fn details(&self) -> Value {
        json!({
            "hd": self.hd,
            "nonHd": self.non_hd,
            "fallback": self.fallback,
        })
    }
}

impl NasaClient {
    pub async fn apod_with_fallback(&self, date: Option<&str>) -> Result<ApodOutcome, ApodFailure> {
        let hd_error = match self.apod(date, true).await {
            Ok(apod) => return Ok(ApodOutcome { apod, fallback: false }),
            Err(error) => error,
        };
        tracing::warn!(error = %hd_error, "APOD (hd) failed, retrying without hd");

        let non_hd_error = match self.apod(date, false).await {
            Ok(apod) => return Ok(ApodOutcome { apod, fallback: false }),
            Err(error) => error,
        };
        tracing::warn!(error = %non_hd_error, "APOD failed, falling back to Images API");

        match self.apod_from_images_api().await {
            Ok(apod) => Ok(ApodOutcome {
                apod,
                fallback: true,
            }),
            Err(fallback_error) => Err(ApodFailure {
                hd: hd_error.to_string(),
                non_hd: non_hd_error.to_string(),
                fallback: fallback_error.to_string(),
            }),
        }
    }

    async fn apod_from_images_api(&self) -> Result<ApodResponse, NasaError> {
        let (query, page) = random_search(&APOD_FALLBACK_QUERIES, RANDOM_PAGE_MAX);
        let collection = self.search(query, page).await?;

        let first = collection
            .first_usable()
            .ok_or_else(|| NasaError::Empty("Images API returned no usable items".to_string()))?;
        let (Some(nasa_id), Some(preview_url)) = (first.nasa_id(), first.thumb()) else {
            return Err(NasaError::Empty(
                "Images API returned no usable items".to_string(),
            ));
        };

        let hdurl = match self.asset_manifest(nasa_id).await {
            Ok(urls) => largest_raster(&urls),
            Err(error) => {
                tracing::debug!(nasa_id = nasa_id, error = %error, "Ignoring asset lookup failure for APOD fallback");
                None
            }
        };

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        Ok(ApodResponse::from_images_api(
            today,
            nasa_id.to_string(),
            first.title().to_string(),
            first.description().map(str::to_string),
            preview_url.to_string(),
            hdurl,
            query,
        ))
    }
}
