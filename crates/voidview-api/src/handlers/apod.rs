use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use voidview_core::models::ApodResponse;
use voidview_core::AppError;

use crate::constants::{APOD_FALLBACK_HEADER, CACHE_LISTING};
use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ApodQuery {
    /// `YYYY-MM-DD`; today when absent
    pub date: Option<String>,
}

fn parse_date(raw: Option<&str>) -> Result<Option<String>, AppError> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(None),
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| Some(d.format("%Y-%m-%d").to_string()))
            .map_err(|_| AppError::InvalidInput("Invalid date, expected YYYY-MM-DD".to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/api/apod",
    tag = "apod",
    params(ApodQuery),
    responses(
        (status = 200, description = "Picture of the day; `X-APOD-Fallback: 1` when served from the image library", body = ApodResponse),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 502, description = "APOD and the fallback both failed", body = ErrorResponse)
    )
)]
pub async fn get_apod(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ApodQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let date = parse_date(query.date.as_deref())?;

    let outcome = state
        .nasa
        .apod_with_fallback(date.as_deref())
        .await
        .map_err(|failure| {
            AppError::upstream_with_details(
                "Failed to fetch APOD (and fallback failed)",
                failure.details(),
            )
        })?;

    let mut response = (
        [(header::CACHE_CONTROL, CACHE_LISTING)],
        Json(outcome.apod),
    )
        .into_response();
    if outcome.fallback {
        response
            .headers_mut()
            .insert(APOD_FALLBACK_HEADER, HeaderValue::from_static("1"));
        tracing::info!("Served APOD from Images API fallback");
    }
    Ok(response)
}
