use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde_json::Value;
use voidview_core::models::{FeaturedResponse, FEATURED_LIMIT, FEATURED_QUERIES, RANDOM_PAGE_MAX};
use voidview_core::AppError;
use voidview_nasa::client::random_search;

use crate::constants::CACHE_LISTING;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/featured",
    tag = "gallery",
    responses(
        (status = 200, description = "Random curated selection", body = FeaturedResponse),
        (status = 502, description = "NASA search failed", body = ErrorResponse)
    )
)]
pub async fn get_featured(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (query, page) = random_search(&FEATURED_QUERIES, RANDOM_PAGE_MAX);

    let collection = state.nasa.search(query, page).await.map_err(|e| AppError::Upstream {
        message: "Failed to fetch featured images".to_string(),
        status: e.status(),
        details: Some(Value::String(e.to_string())),
    })?;

    let mut items = collection.gallery_items();
    items.truncate(FEATURED_LIMIT);
    tracing::debug!(query, page, returned = items.len(), "Featured selection loaded");

    Ok((
        [(header::CACHE_CONTROL, CACHE_LISTING)],
        Json(FeaturedResponse {
            query: query.to_string(),
            page,
            items,
        }),
    ))
}
