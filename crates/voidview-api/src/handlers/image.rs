use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use voidview_core::models::ImageDetail;
use voidview_core::AppError;

use crate::constants::CACHE_IMAGE;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/image/{nasa_id}",
    tag = "gallery",
    params(("nasa_id" = String, Path, description = "NASA image id")),
    responses(
        (status = 200, description = "Image detail", body = ImageDetail),
        (status = 404, description = "No such image", body = ErrorResponse),
        (status = 502, description = "NASA search failed", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(nasa_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let collection = state
        .nasa
        .search_by_nasa_id(&nasa_id)
        .await
        .map_err(|e| e.into_upstream("Failed to fetch image"))?;

    let detail = collection
        .items
        .first()
        .and_then(|item| item.to_image_detail())
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    Ok(([(header::CACHE_CONTROL, CACHE_IMAGE)], Json(detail)))
}
