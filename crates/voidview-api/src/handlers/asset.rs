use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use voidview_core::models::{AssetKind, AssetSelection, DEBUG_ITEMS_LIMIT};
use voidview_nasa::assets::pick_best;

use crate::constants::CACHE_IMAGE;
use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AssetQuery {
    /// `1` to include the first 50 manifest URLs
    pub debug: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/asset/{nasa_id}",
    tag = "gallery",
    params(
        ("nasa_id" = String, Path, description = "NASA image id"),
        AssetQuery
    ),
    responses(
        (status = 200, description = "Best source variant", body = AssetSelection),
        (status = 502, description = "Asset manifest unavailable", body = ErrorResponse)
    )
)]
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(nasa_id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<AssetQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let urls = state
        .nasa
        .asset_manifest(&nasa_id)
        .await
        .map_err(|e| e.into_upstream("Failed to fetch asset list"))?;

    let (mut best, mut kind) = pick_best(&urls);
    if best.is_none() {
        if let Some(thumb) = state.nasa.fallback_thumb(&nasa_id).await {
            best = Some(thumb);
            kind = AssetKind::ThumbFallback;
        }
    }

    let debug = query.debug.as_deref() == Some("1");
    let selection = AssetSelection {
        items_count: urls.len(),
        items: debug.then(|| urls.iter().take(DEBUG_ITEMS_LIMIT).cloned().collect()),
        nasa_id,
        best,
        kind,
    };

    Ok(([(header::CACHE_CONTROL, CACHE_IMAGE)], Json(selection)))
}
