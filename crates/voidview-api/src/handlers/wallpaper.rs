use std::sync::Arc;

use axum::{extract::State, response::Response};
use voidview_core::models::{
    filename_token, FitMode, RenderRequest, RenderTarget, WALLPAPER_MAX_DIM, WALLPAPER_MIN_DIM,
};
use voidview_core::AppError;
use voidview_processing::{render_wallpaper, RenderedImage};

use super::render::{fetch_source, jpeg_response, render_blocking, JpegHeaders};
use crate::constants::{CACHE_RENDER, NO_STORE};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

const FAILURE: &str = "Wallpaper generation failed";

async fn render(state: &AppState, target: &RenderTarget<FitMode>) -> Result<RenderedImage, AppError> {
    let (source_url, bytes) = fetch_source(state, &target.nasa_id, FAILURE).await?;

    let (width, height, mode) = (target.width, target.height, target.mode);
    let max_pixels = state.max_input_pixels();
    let image = render_blocking(FAILURE, &source_url, move || {
        render_wallpaper(&bytes, width, height, mode, max_pixels)
    })
    .await?;

    tracing::info!(
        nasa_id = %target.nasa_id,
        width,
        height,
        mode = %mode,
        bytes = image.bytes.len(),
        "Wallpaper rendered"
    );
    Ok(image)
}

fn filename(target: &RenderTarget<FitMode>) -> String {
    format!(
        "{}_{}x{}_{}.jpg",
        filename_token(&target.nasa_id),
        target.width,
        target.height,
        target.mode
    )
}

/// Wallpaper by URL, for download links.
#[utoipa::path(
    get,
    path = "/api/wallpaper",
    tag = "render",
    params(
        ("nasa_id" = String, Query, description = "NASA image id"),
        ("w" = f64, Query, description = "Width in pixels, clamped into 320..=4000"),
        ("h" = f64, Query, description = "Height in pixels, clamped into 320..=4000"),
        ("mode" = Option<FitMode>, Query, description = "cover, contain or blur (default)")
    ),
    responses(
        (status = 200, description = "JPEG wallpaper", content_type = "image/jpeg"),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
        (status = 404, description = "No usable asset found", body = ErrorResponse),
        (status = 500, description = "Wallpaper generation failed", body = ErrorResponse)
    )
)]
pub async fn get_wallpaper(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(request): ValidatedQuery<RenderRequest>,
) -> Result<Response, HttpAppError> {
    let target = request.resolve::<FitMode>(WALLPAPER_MIN_DIM, WALLPAPER_MAX_DIM)?;
    let image = render(&state, &target).await?;

    Ok(jpeg_response(
        image,
        JpegHeaders {
            cache_control: CACHE_RENDER,
            disposition: Some(format!("inline; filename=\"{}\"", filename(&target))),
            nosniff: false,
        },
    )?)
}

/// Wallpaper preview from a JSON body. Never cached.
#[utoipa::path(
    post,
    path = "/api/wallpaper",
    tag = "render",
    request_body = RenderRequest,
    responses(
        (status = 200, description = "JPEG wallpaper", content_type = "image/jpeg"),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
        (status = 404, description = "No usable asset found", body = ErrorResponse),
        (status = 500, description = "Wallpaper generation failed", body = ErrorResponse)
    )
)]
pub async fn post_wallpaper(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RenderRequest>,
) -> Result<Response, HttpAppError> {
    let target = request.resolve::<FitMode>(WALLPAPER_MIN_DIM, WALLPAPER_MAX_DIM)?;
    let image = render(&state, &target).await?;

    Ok(jpeg_response(
        image,
        JpegHeaders {
            cache_control: NO_STORE,
            disposition: None,
            nosniff: false,
        },
    )?)
}
