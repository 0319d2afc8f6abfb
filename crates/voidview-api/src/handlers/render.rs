//! Shared plumbing for the wallpaper and print endpoints: resolve and fetch
//! the source image, render off the async runtime, and wrap the JPEG.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use bytes::Bytes;
use voidview_core::AppError;
use voidview_processing::compression::JPEG_MIME_TYPE;
use voidview_processing::{ProcessingError, RenderedImage};

use crate::state::AppState;

/// Resolve the best source for `nasa_id` and download it.
///
/// No usable asset is a 404. Once a source URL is known, any failure is
/// reported as `failure` with the URL attached.
pub async fn fetch_source(
    state: &AppState,
    nasa_id: &str,
    failure: &'static str,
) -> Result<(String, Bytes), AppError> {
    let pick = state
        .nasa
        .resolve_best_asset(nasa_id)
        .await
        .ok_or_else(|| AppError::NotFound("No usable asset found".to_string()))?;

    tracing::debug!(nasa_id, url = %pick.url, kind = ?pick.kind, "Resolved source image");

    let bytes = state.nasa.download(&pick.url).await.map_err(|e| {
        AppError::image_processing(failure, e.to_string(), Some(pick.url.clone()))
    })?;
    Ok((pick.url, bytes))
}

/// Run a CPU-bound render on the blocking pool.
pub async fn render_blocking<F>(
    failure: &'static str,
    source_url: &str,
    job: F,
) -> Result<RenderedImage, AppError>
where
    F: FnOnce() -> Result<RenderedImage, ProcessingError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(job).await.map_err(|e| {
        AppError::image_processing(failure, e.to_string(), Some(source_url.to_string()))
    })?;
    result.map_err(|e| {
        AppError::image_processing(failure, e.to_string(), Some(source_url.to_string()))
    })
}

/// Response headers for a rendered JPEG.
pub struct JpegHeaders {
    pub cache_control: &'static str,
    pub disposition: Option<String>,
    pub nosniff: bool,
}

pub fn jpeg_response(image: RenderedImage, headers: JpegHeaders) -> Result<Response, AppError> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, JPEG_MIME_TYPE)
        .header(header::CONTENT_LENGTH, image.bytes.len())
        .header(header::CACHE_CONTROL, headers.cache_control);
    if let Some(disposition) = headers.disposition {
        builder = builder.header(header::CONTENT_DISPOSITION, disposition);
    }
    if headers.nosniff {
        builder = builder.header(header::X_CONTENT_TYPE_OPTIONS, "nosniff");
    }
    builder.body(Body::from(image.bytes)).map_err(|e| {
        tracing::error!(error = %e, "Failed to build image response");
        AppError::Internal(e.to_string())
    })
}
