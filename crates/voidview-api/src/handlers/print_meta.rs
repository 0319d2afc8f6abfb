use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;
use voidview_core::models::SourceMetadata;
use voidview_core::AppError;
use voidview_nasa::NasaClient;
use voidview_processing::metadata::probe_dimensions;

use crate::constants::CACHE_SOURCE_METADATA;
use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::AppState;

/// Candidates probed before giving up.
const MAX_PROBED_CANDIDATES: usize = 4;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PrintMetaQuery {
    pub nasa_id: Option<String>,
}

pub fn required_nasa_id(raw: Option<&str>) -> Result<&str, AppError> {
    raw.map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing nasa_id".to_string()))
}

/// Dimensions of the best source image, read from as few bytes as possible.
pub async fn read_source_metadata(
    nasa: &NasaClient,
    nasa_id: &str,
) -> Result<SourceMetadata, AppError> {
    let candidates = nasa.print_source_candidates(nasa_id).await;
    if candidates.is_empty() {
        return Err(AppError::NotFound("No candidate assets found".to_string()));
    }

    let mut last_error = None;
    for url in candidates.iter().take(MAX_PROBED_CANDIDATES) {
        match nasa.read_header(url, probe_dimensions).await {
            Ok(Some(probed)) => {
                tracing::debug!(nasa_id, url = %url, width = probed.width, height = probed.height, "Read source dimensions");
                return Ok(SourceMetadata {
                    nasa_id: nasa_id.to_string(),
                    width: probed.width,
                    height: probed.height,
                    format: probed.format,
                    source_url: url.clone(),
                });
            }
            Ok(None) => last_error = Some("No width/height in metadata".to_string()),
            Err(error) => {
                tracing::warn!(nasa_id, url = %url, error = %error, "Source header probe failed");
                last_error = Some(error.to_string());
            }
        }
    }

    Err(AppError::Upstream {
        message: "Failed to read image metadata".to_string(),
        status: None,
        details: last_error.map(Value::String),
    })
}

#[utoipa::path(
    get,
    path = "/api/print-meta",
    tag = "print",
    params(PrintMetaQuery),
    responses(
        (status = 200, description = "Source image dimensions", body = SourceMetadata),
        (status = 400, description = "Missing nasa_id", body = ErrorResponse),
        (status = 404, description = "No candidate assets found", body = ErrorResponse),
        (status = 502, description = "No candidate could be read", body = ErrorResponse)
    )
)]
pub async fn get_print_meta(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<PrintMetaQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let nasa_id = required_nasa_id(query.nasa_id.as_deref())?;
    let metadata = read_source_metadata(&state.nasa, nasa_id).await?;

    Ok(([(header::CACHE_CONTROL, CACHE_SOURCE_METADATA)], Json(metadata)))
}
