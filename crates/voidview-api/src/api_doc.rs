//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use axum::Json;
use utoipa::OpenApi;
use voidview_core::models;

use crate::error::ErrorResponse;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VoidView API",
        version = "0.1.0",
        description = "Browse NASA's image library by category, fetch the Astronomy Picture of the Day, and render device-fit wallpapers and print-ready JPEGs from NASA source images."
    ),
    paths(
        // Gallery
        handlers::feed::get_feed,
        handlers::featured::get_featured,
        handlers::image::get_image,
        handlers::asset::get_asset,
        // APOD
        handlers::apod::get_apod,
        // Rendering
        handlers::wallpaper::get_wallpaper,
        handlers::wallpaper::post_wallpaper,
        handlers::print::get_print,
        handlers::print::post_print,
        // Print planning
        handlers::print_meta::get_print_meta,
        handlers::presets::get_presets,
        handlers::presets::get_print_plan,
        // Site
        handlers::site::home,
        handlers::site::category_index,
        handlers::site::category_listing,
        handlers::site::sitemap,
        handlers::site::robots,
        // Health
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            models::GalleryItem,
            models::FeedPage,
            models::FeaturedResponse,
            models::ImageDetail,
            models::AssetKind,
            models::AssetSelection,
            models::ApodResponse,
            models::ApodSource,
            models::FitMode,
            models::PrintMode,
            models::RenderRequest,
            models::SourceMetadata,
            models::Orientation,
            models::Dimensions,
            models::PrintPlan,
            models::QualityGrade,
            models::QualityAssessment,
            models::PageMeta,
            handlers::presets::PresetsResponse,
            handlers::presets::PrintSizeOption,
            handlers::presets::PrintPlanResponse,
            handlers::site::CategoryPageResponse,
            handlers::health::HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "gallery", description = "Category feeds, featured picks and image lookups"),
        (name = "apod", description = "Astronomy Picture of the Day with library fallback"),
        (name = "render", description = "Wallpaper and print JPEG rendering"),
        (name = "print", description = "Print sizes, plans and source metadata"),
        (name = "site", description = "Listing pages, sitemap and robots.txt"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
