//! Wallpaper presets and print planning.

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use voidview_core::models::{
    assess_quality, print_size_by_key, FitMode, Orientation, PrintMode, PrintPlan, PrintSize,
    QualityAssessment, RenderMode, SourceMetadata, WallpaperPreset, DEFAULT_PRINT_DPI,
    DEFAULT_PRINT_SIZE, PRINT_DPIS, PRINT_SIZES, WALLPAPER_PRESETS,
};
use voidview_core::AppError;

use super::print_meta::{read_source_metadata, required_nasa_id};
use crate::constants::{API_PREFIX, CACHE_STATIC};
use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintSizeOption {
    pub key: String,
    pub label: &'static str,
    pub width_in: u32,
    pub height_in: u32,
}

impl From<&PrintSize> for PrintSizeOption {
    fn from(size: &PrintSize) -> Self {
        Self {
            key: size.key(),
            label: size.label,
            width_in: size.w_in,
            height_in: size.h_in,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresetsResponse {
    #[schema(value_type = Vec<Object>)]
    pub wallpaper_presets: Vec<WallpaperPreset>,
    pub fit_modes: Vec<FitMode>,
    pub default_fit_mode: FitMode,
    pub print_sizes: Vec<PrintSizeOption>,
    pub default_print_size: String,
    pub print_dpis: Vec<u32>,
    pub default_print_dpi: u32,
    pub print_modes: Vec<PrintMode>,
    pub default_print_mode: PrintMode,
}

impl PresetsResponse {
    fn build() -> Self {
        Self {
            wallpaper_presets: WALLPAPER_PRESETS.to_vec(),
            fit_modes: FitMode::ALL.to_vec(),
            default_fit_mode: FitMode::DEFAULT,
            print_sizes: PRINT_SIZES.iter().map(PrintSizeOption::from).collect(),
            default_print_size: DEFAULT_PRINT_SIZE.key(),
            print_dpis: PRINT_DPIS.to_vec(),
            default_print_dpi: DEFAULT_PRINT_DPI,
            print_modes: PrintMode::ALL.to_vec(),
            default_print_mode: PrintMode::DEFAULT,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/presets",
    tag = "print",
    responses((status = 200, description = "Wallpaper presets, fit modes and print options", body = PresetsResponse))
)]
pub async fn get_presets() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, CACHE_STATIC)],
        Json(PresetsResponse::build()),
    )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PrintPlanQuery {
    pub nasa_id: Option<String>,
    /// Size key such as `12x18`, or its index in the size list
    pub size: Option<String>,
    /// 200 or 300
    pub dpi: Option<String>,
    /// portrait (default) or landscape
    pub orientation: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintPlanResponse {
    pub nasa_id: String,
    pub plan: PrintPlan,
    /// Print endpoint URL that renders this plan
    pub download_url: String,
    /// Preview render at `plan.preview` size
    pub preview_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityAssessment>,
}

fn parse_plan(query: &PrintPlanQuery) -> Result<PrintPlan, AppError> {
    let size = match query.size.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => DEFAULT_PRINT_SIZE,
        Some(key) => print_size_by_key(key)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown print size '{}'", key)))?,
    };

    let dpi = match query.dpi.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => DEFAULT_PRINT_DPI,
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|dpi| PRINT_DPIS.contains(dpi))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Unsupported dpi '{}', expected 200 or 300", raw))
            })?,
    };

    let orientation = match query.orientation.as_deref().filter(|s| !s.trim().is_empty()) {
        None => Orientation::default(),
        Some(raw) => raw.parse::<Orientation>()?,
    };

    Ok(PrintPlan::new(&size, dpi, orientation))
}

#[utoipa::path(
    get,
    path = "/api/print-plan",
    tag = "print",
    params(PrintPlanQuery),
    responses(
        (status = 200, description = "Pixel targets, download link and quality estimate", body = PrintPlanResponse),
        (status = 400, description = "Missing nasa_id or invalid option", body = ErrorResponse)
    )
)]
pub async fn get_print_plan(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<PrintPlanQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let nasa_id = required_nasa_id(query.nasa_id.as_deref())?.to_string();
    let plan = parse_plan(&query)?;

    // Quality is best effort; the plan is still useful without it.
    let source = match read_source_metadata(&state.nasa, &nasa_id).await {
        Ok(source) => Some(source),
        Err(error) => {
            tracing::warn!(nasa_id = %nasa_id, error = %error, "Source metadata unavailable for print plan");
            None
        }
    };
    let quality = source
        .as_ref()
        .map(|s| assess_quality(&plan, s.width, s.height));

    let download_url = format!("{}/print?{}", API_PREFIX, plan.download_query(&nasa_id));
    let preview_url = format!(
        "{}/print?nasa_id={}&w={}&h={}&mode={}",
        API_PREFIX,
        urlencoding::encode(&nasa_id),
        plan.preview.w,
        plan.preview.h,
        plan.mode
    );

    Ok(Json(PrintPlanResponse {
        nasa_id,
        plan,
        download_url,
        preview_url,
        source,
        quality,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(size: Option<&str>, dpi: Option<&str>, orientation: Option<&str>) -> PrintPlanQuery {
        PrintPlanQuery {
            nasa_id: Some("PIA1".to_string()),
            size: size.map(String::from),
            dpi: dpi.map(String::from),
            orientation: orientation.map(String::from),
        }
    }

    #[test]
    fn test_parse_plan_defaults() {
        let plan = parse_plan(&query(None, None, None)).unwrap();
        assert_eq!(plan.dpi, 300);
        assert_eq!((plan.width_px, plan.height_px), (3600, 5400));
        assert_eq!(plan.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_parse_plan_landscape_200dpi() {
        let plan = parse_plan(&query(Some("8x10"), Some("200"), Some("landscape"))).unwrap();
        assert_eq!((plan.width_px, plan.height_px), (2000, 1600));
    }

    #[test]
    fn test_parse_plan_rejects_unknown_options() {
        assert!(parse_plan(&query(Some("7x7"), None, None)).is_err());
        assert!(parse_plan(&query(None, Some("150"), None)).is_err());
        assert!(parse_plan(&query(None, None, Some("diagonal"))).is_err());
    }

    #[test]
    fn test_presets_cover_every_option() {
        let presets = PresetsResponse::build();
        assert_eq!(presets.wallpaper_presets.len(), 5);
        assert_eq!(presets.print_sizes.len(), 6);
        assert_eq!(presets.default_print_size, "12x18");
        assert_eq!(presets.default_fit_mode, FitMode::Blur);
        assert_eq!(presets.default_print_mode, PrintMode::Cover);
    }
}
