use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::IntoParams;
use voidview_core::models::{category_by_slug, clamp_page, Category, FeedPage, FEATURED_SLUG};
use voidview_core::AppError;
use voidview_nasa::NasaClient;

use crate::constants::CACHE_LISTING;
use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FeedQuery {
    /// Category slug; unknown slugs fall back to `featured`
    pub cat: Option<String>,
    /// Page number, clamped into 1..=100
    pub page: Option<String>,
}

/// One page of a category's search results.
pub async fn load_feed(
    nasa: &NasaClient,
    category: &Category,
    page: u32,
) -> Result<FeedPage, AppError> {
    let collection = nasa
        .search(category.query, page)
        .await
        .map_err(|e| e.into_upstream("Failed to fetch NASA feed"))?;

    let feed = FeedPage::new(
        category,
        page,
        collection.gallery_items(),
        collection.total_hits(),
    );
    tracing::debug!(
        cat = category.slug,
        page,
        returned = feed.returned,
        "Feed page loaded"
    );
    Ok(feed)
}

#[utoipa::path(
    get,
    path = "/api/feed",
    tag = "gallery",
    params(FeedQuery),
    responses(
        (status = 200, description = "Feed page", body = FeedPage),
        (status = 502, description = "NASA search failed", body = ErrorResponse)
    )
)]
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<FeedQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let category = category_by_slug(query.cat.as_deref().unwrap_or(FEATURED_SLUG));
    let page = clamp_page(query.page.as_deref());

    let feed = load_feed(&state.nasa, &category, page).await?;
    Ok(([(header::CACHE_CONTROL, CACHE_LISTING)], Json(feed)))
}
