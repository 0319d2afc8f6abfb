use std::sync::Arc;

use axum::{extract::State, response::Response};
use voidview_core::models::{
    filename_token, PrintMode, RenderRequest, RenderTarget, PRINT_MAX_DIM, PRINT_MIN_DIM,
};
use voidview_core::AppError;
use voidview_processing::{render_print, RenderedImage};

use super::render::{fetch_source, jpeg_response, render_blocking, JpegHeaders};
use crate::constants::{CACHE_RENDER, NO_STORE};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

const DOWNLOAD_FAILURE: &str = "Print generation failed";
const PREVIEW_FAILURE: &str = "Print preview failed";

async fn render(
    state: &AppState,
    target: &RenderTarget<PrintMode>,
    failure: &'static str,
) -> Result<RenderedImage, AppError> {
    let (source_url, bytes) = fetch_source(state, &target.nasa_id, failure).await?;

    let (width, height, mode) = (target.width, target.height, target.mode);
    let max_pixels = state.max_input_pixels();
    let image = render_blocking(failure, &source_url, move || {
        render_print(&bytes, width, height, mode, max_pixels)
    })
    .await?;

    tracing::info!(
        nasa_id = %target.nasa_id,
        label = %target.label,
        width,
        height,
        mode = %mode,
        bytes = image.bytes.len(),
        "Print rendered"
    );
    Ok(image)
}

fn filename(target: &RenderTarget<PrintMode>) -> String {
    format!(
        "{}_{}_{}x{}_{}.jpg",
        filename_token(&target.nasa_id),
        target.label,
        target.width,
        target.height,
        target.mode
    )
}

/// Print-ready JPEG as a file download.
#[utoipa::path(
    get,
    path = "/api/print",
    tag = "render",
    params(
        ("nasa_id" = String, Query, description = "NASA image id"),
        ("w" = f64, Query, description = "Width in pixels, clamped into 600..=12000"),
        ("h" = f64, Query, description = "Height in pixels, clamped into 600..=12000"),
        ("mode" = Option<PrintMode>, Query, description = "cover (default) or contain"),
        ("label" = Option<String>, Query, description = "Filename label, default `print`")
    ),
    responses(
        (status = 200, description = "JPEG print file", content_type = "image/jpeg"),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
        (status = 404, description = "No usable asset found", body = ErrorResponse),
        (status = 500, description = "Print generation failed", body = ErrorResponse)
    )
)]
pub async fn get_print(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(request): ValidatedQuery<RenderRequest>,
) -> Result<Response, HttpAppError> {
    let target = request.resolve::<PrintMode>(PRINT_MIN_DIM, PRINT_MAX_DIM)?;
    let image = render(&state, &target, DOWNLOAD_FAILURE).await?;

    Ok(jpeg_response(
        image,
        JpegHeaders {
            cache_control: CACHE_RENDER,
            disposition: Some(format!("attachment; filename=\"{}\"", filename(&target))),
            nosniff: true,
        },
    )?)
}

/// Print preview from a JSON body. Never cached.
#[utoipa::path(
    post,
    path = "/api/print",
    tag = "render",
    request_body = RenderRequest,
    responses(
        (status = 200, description = "JPEG print preview", content_type = "image/jpeg"),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
        (status = 404, description = "No usable asset found", body = ErrorResponse),
        (status = 500, description = "Print preview failed", body = ErrorResponse)
    )
)]
pub async fn post_print(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RenderRequest>,
) -> Result<Response, HttpAppError> {
    let target = request.resolve::<PrintMode>(PRINT_MIN_DIM, PRINT_MAX_DIM)?;
    let image = render(&state, &target, PREVIEW_FAILURE).await?;

    Ok(jpeg_response(
        image,
        JpegHeaders {
            cache_control: NO_STORE,
            disposition: None,
            nosniff: true,
        },
    )?)
}
