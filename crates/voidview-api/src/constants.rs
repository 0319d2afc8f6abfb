//! Route prefix and `Cache-Control` values shared by handlers.

pub const API_PREFIX: &str = "/api";

/// Search-backed listings: feed, featured, APOD.
pub const CACHE_LISTING: &str = "public, s-maxage=3600, stale-while-revalidate=86400";
/// Per-image lookups: detail and asset selection.
pub const CACHE_IMAGE: &str = "public, s-maxage=86400";
/// Rendered wallpapers and prints fetched by URL.
pub const CACHE_RENDER: &str = "public, s-maxage=86400, stale-while-revalidate=604800";
/// Source image metadata; NASA assets do not change once published.
pub const CACHE_SOURCE_METADATA: &str = "public, s-maxage=604800, stale-while-revalidate=2592000";
pub const CACHE_STATIC: &str = "public, max-age=3600";
pub const NO_STORE: &str = "no-store";

pub const APOD_FALLBACK_HEADER: &str = "X-APOD-Fallback";
