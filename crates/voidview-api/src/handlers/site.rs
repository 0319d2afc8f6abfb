//! Site-level routes: category listing pages, sitemap and robots.
//!
//! Listing pages return the data a page renderer needs (head metadata plus
//! the feed) and own the canonical-URL redirects.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use voidview_core::models::{
    category_by_slug, canonical_path, is_valid_category_slug, parse_page_segment, Category,
    FeedPage, PageMeta, CATEGORIES, MAX_PAGE,
};
use voidview_core::AppError;

use super::feed::load_feed;
use crate::constants::{CACHE_LISTING, CACHE_STATIC};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const STATIC_PAGES: [(&str, &str, f32); 5] = [
    ("/", "daily", 1.0),
    ("/about", "monthly", 0.4),
    ("/privacy", "yearly", 0.2),
    ("/terms", "yearly", 0.2),
    ("/contact", "yearly", 0.2),
];

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryPageResponse {
    pub meta: PageMeta,
    pub feed: FeedPage,
}

async fn category_page(
    state: &AppState,
    category: &Category,
    page: u32,
) -> Result<Response, AppError> {
    let mut meta = PageMeta::for_category(category, page);
    meta.canonical = format!("{}{}", state.config.site_url(), meta.canonical);
    let feed = load_feed(&state.nasa, category, page.min(MAX_PAGE)).await?;

    Ok((
        [(header::CACHE_CONTROL, CACHE_LISTING)],
        Json(CategoryPageResponse { meta, feed }),
    )
        .into_response())
}

fn unknown_category(slug: &str) -> AppError {
    AppError::NotFound(format!("Unknown category '{}'", slug))
}

/// Home page: featured, page 1.
#[utoipa::path(
    get,
    path = "/",
    tag = "site",
    responses(
        (status = 200, description = "Featured listing", body = CategoryPageResponse),
        (status = 502, description = "NASA search failed", body = ErrorResponse)
    )
)]
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Response, HttpAppError> {
    Ok(category_page(&state, &category_by_slug("featured"), 1).await?)
}

#[utoipa::path(
    get,
    path = "/c/{cat}",
    tag = "site",
    params(("cat" = String, Path, description = "Category slug")),
    responses(
        (status = 307, description = "Redirect to the category's first page"),
        (status = 404, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn category_index(Path(cat): Path<String>) -> Result<Response, HttpAppError> {
    if !is_valid_category_slug(&cat) {
        return Err(unknown_category(&cat).into());
    }
    let category = category_by_slug(&cat);
    Ok(Redirect::temporary(&canonical_path(&category, 1)).into_response())
}

#[utoipa::path(
    get,
    path = "/c/{cat}/{page}",
    tag = "site",
    params(
        ("cat" = String, Path, description = "Category slug"),
        ("page" = String, Path, description = "Page number")
    ),
    responses(
        (status = 200, description = "Category listing", body = CategoryPageResponse),
        (status = 307, description = "Redirect to the canonical URL"),
        (status = 404, description = "Unknown category", body = ErrorResponse),
        (status = 502, description = "NASA search failed", body = ErrorResponse)
    )
)]
pub async fn category_listing(
    State(state): State<Arc<AppState>>,
    Path((cat, page)): Path<(String, String)>,
) -> Result<Response, HttpAppError> {
    if !is_valid_category_slug(&cat) {
        return Err(unknown_category(&cat).into());
    }
    let category = category_by_slug(&cat);

    let Some(page) = parse_page_segment(&page) else {
        return Ok(Redirect::temporary(&canonical_path(&category, 1)).into_response());
    };
    if category.is_featured() && page == 1 {
        return Ok(Redirect::temporary("/").into_response());
    }

    Ok(category_page(&state, &category, page).await?)
}

/// Sitemap document for `base_url` with `pages` listing pages per category.
pub fn sitemap_xml(base_url: &str, pages: u32, lastmod: &str) -> String {
    let mut entries: Vec<(String, &str, f32)> = STATIC_PAGES
        .iter()
        .map(|(path, freq, priority)| (format!("{}{}", base_url, path), *freq, *priority))
        .collect();

    for category in CATEGORIES.iter() {
        let first = if category.is_featured() { 2 } else { 1 };
        for page in first..=pages {
            let priority = if page == 1 { 0.8 } else { 0.6 };
            entries.push((
                format!("{}/c/{}/{}", base_url, urlencoding::encode(category.slug), page),
                "daily",
                priority,
            ));
        }
    }

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for (loc, freq, priority) in entries {
        // Writing to a String cannot fail.
        let _ = write!(
            xml,
            "<url>\n<loc>{}</loc>\n<lastmod>{}</lastmod>\n<changefreq>{}</changefreq>\n<priority>{}</priority>\n</url>\n",
            loc, lastmod, freq, priority
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

#[utoipa::path(
    get,
    path = "/sitemap.xml",
    tag = "site",
    responses((status = 200, description = "Sitemap", content_type = "application/xml"))
)]
pub async fn sitemap(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let lastmod = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let xml = sitemap_xml(
        state.config.site_url(),
        state.config.sitemap_pages_per_category(),
        &lastmod,
    );
    (
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, CACHE_STATIC),
        ],
        xml,
    )
}

pub fn robots_txt(base_url: &str) -> String {
    format!(
        "User-Agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base_url
    )
}

#[utoipa::path(
    get,
    path = "/robots.txt",
    tag = "site",
    responses((status = 200, description = "Crawler rules", content_type = "text/plain"))
)]
pub async fn robots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, CACHE_STATIC),
        ],
        robots_txt(state.config.site_url()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_entries() {
        let xml = sitemap_xml("https://voidview.example", 5, "2025-01-01T00:00:00.000Z");
        assert_eq!(xml.matches("<url>").count(), 5 + 4 + 9 * 5);
        assert!(xml.contains("<loc>https://voidview.example/</loc>"));
        assert!(xml.contains("<loc>https://voidview.example/c/featured/2</loc>"));
        assert!(!xml.contains("/c/featured/1<"));
        assert!(xml.contains("<loc>https://voidview.example/c/nebulae/1</loc>\n<lastmod>2025-01-01T00:00:00.000Z</lastmod>\n<changefreq>daily</changefreq>\n<priority>0.8</priority>"));
        assert!(xml.contains("<loc>https://voidview.example/about</loc>"));
    }

    #[test]
    fn test_sitemap_single_page() {
        let xml = sitemap_xml("http://localhost:3000", 1, "now");
        assert!(!xml.contains("/c/featured/"));
        assert!(xml.contains("http://localhost:3000/c/telescopes/1"));
    }

    #[test]
    fn test_robots_points_at_sitemap() {
        assert_eq!(
            robots_txt("https://voidview.example"),
            "User-Agent: *\nAllow: /\n\nSitemap: https://voidview.example/sitemap.xml\n"
        );
    }
}
