use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::category::Category;

/// Items per feed page.
pub const PER_PAGE: usize = 25;
/// Items returned by the featured endpoint.
pub const FEATURED_LIMIT: usize = 30;
/// Curated topics the featured endpoint rotates through.
pub const FEATURED_QUERIES: [&str; 9] = [
    "nebula",
    "galaxy",
    "hubble",
    "jwst",
    "saturn",
    "jupiter",
    "mars",
    "earth from space",
    "astronaut",
];
/// Featured and APOD fallback searches pick a random page in `1..=RANDOM_PAGE_MAX`.
pub const RANDOM_PAGE_MAX: u32 = 10;
/// Asset URLs echoed back in asset debug responses.
pub const DEBUG_ITEMS_LIMIT: usize = 50;

/// One browsable image, built from a NASA search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GalleryItem {
    pub nasa_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub thumb: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub cat: String,
    pub label: String,
    pub query: String,
    pub page: u32,
    pub per_page: usize,
    pub total_hits: Option<u64>,
    pub total_pages: Option<u64>,
    /// Number of items in this page after filtering.
    pub returned: usize,
    pub items: Vec<GalleryItem>,
}

impl FeedPage {
    /// Assemble a page from already-filtered items. Items beyond `PER_PAGE`
    /// are dropped.
    pub fn new(
        category: &Category,
        page: u32,
        mut items: Vec<GalleryItem>,
        total_hits: Option<u64>,
    ) -> Self {
        items.truncate(PER_PAGE);
        Self {
            cat: category.slug.to_string(),
            label: category.label.to_string(),
            query: category.query.to_string(),
            page,
            per_page: PER_PAGE,
            total_hits,
            total_pages: total_hits.filter(|hits| *hits > 0).map(total_pages),
            returned: items.len(),
            items,
        }
    }
}

/// `ceil(total_hits / PER_PAGE)`
pub fn total_pages(total_hits: u64) -> u64 {
    total_hits.div_ceil(PER_PAGE as u64)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeaturedResponse {
    pub query: String,
    pub page: u32,
    pub items: Vec<GalleryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageDetail {
    pub nasa_id: String,
    pub title: String,
    pub description: String,
    pub thumb: String,
}

/// How the asset endpoint arrived at its pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    Jpg,
    Tiff,
    None,
    ThumbFallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetSelection {
    pub nasa_id: String,
    pub best: Option<String>,
    pub kind: AssetKind,
    #[serde(rename = "itemsCount")]
    pub items_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

/// Pixel dimensions of a source image read from its header.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SourceMetadata {
    pub nasa_id: String,
    pub width: u32,
    pub height: u32,
    /// `null` when the header was readable but the codec is unrecognised.
    pub format: Option<String>,
    #[serde(rename = "sourceUrl")]
    pub source_url: String,
}
