//! Asset variant selection.
//!
//! NASA publishes each image in several variants whose filenames carry a
//! `~thumb`, `~small`, `~medium`, `~large` or `~orig` token. Delivery prefers
//! `~large` (fast and big enough for screens); print prefers `~orig`.

use voidview_core::models::AssetKind;

/// Preference order for on-screen delivery.
pub const DELIVERY_ORDER: [&str; 5] = ["~large", "~orig", "~medium", "~small", "~thumb"];

/// Preference order for print metadata probing.
pub const PRINT_ORDER: [&str; 5] = ["~orig", "~large", "~medium", "~small", "~thumb"];

/// A chosen source URL and how it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPick {
    pub url: String,
    pub kind: AssetKind,
}

fn has_suffix_ci(url: &str, suffixes: &[&str]) -> bool {
    let lower = url.to_ascii_lowercase();
    suffixes.iter().any(|s| lower.ends_with(s))
}

/// JPEG or PNG.
pub fn is_raster(url: &str) -> bool {
    has_suffix_ci(url, &[".jpg", ".jpeg", ".png"])
}

pub fn is_tiff(url: &str) -> bool {
    has_suffix_ci(url, &[".tif", ".tiff"])
}

/// First candidate containing each token in `order`, else the first candidate.
pub fn pick_from<'a, S: AsRef<str>>(candidates: &'a [S], order: &[&str]) -> Option<&'a str> {
    order
        .iter()
        .find_map(|token| {
            candidates
                .iter()
                .map(|c| c.as_ref())
                .find(|u| u.contains(token))
        })
        .or_else(|| candidates.first().map(|c| c.as_ref()))
}

/// Best delivery variant: rasters first, then TIFFs.
pub fn pick_best(urls: &[String]) -> (Option<String>, AssetKind) {
    let rasters: Vec<&str> = urls.iter().map(String::as_str).filter(|u| is_raster(u)).collect();
    if let Some(best) = pick_from(&rasters, &DELIVERY_ORDER) {
        return (Some(best.to_string()), AssetKind::Jpg);
    }

    let tiffs: Vec<&str> = urls.iter().map(String::as_str).filter(|u| is_tiff(u)).collect();
    if let Some(best) = pick_from(&tiffs, &DELIVERY_ORDER) {
        return (Some(best.to_string()), AssetKind::Tiff);
    }

    (None, AssetKind::None)
}

/// Image candidates for print metadata: one hit per `PRINT_ORDER` token, then
/// every remaining raster or TIFF in listing order. No duplicates.
pub fn print_candidates(urls: &[String]) -> Vec<String> {
    let images: Vec<&str> = urls
        .iter()
        .map(String::as_str)
        .filter(|u| is_raster(u) || is_tiff(u))
        .collect();

    let mut out: Vec<String> = Vec::with_capacity(images.len());
    for token in PRINT_ORDER {
        if let Some(hit) = images.iter().find(|u| u.contains(token)) {
            if !out.iter().any(|u| u == *hit) {
                out.push(hit.to_string());
            }
        }
    }
    for url in images {
        if !out.iter().any(|u| u == url) {
            out.push(url.to_string());
        }
    }
    out
}

/// Largest raster variant: `~orig`, then anything mentioning "orig", then
/// `~large`, then the first raster.
pub fn largest_raster(urls: &[String]) -> Option<String> {
    let rasters: Vec<&str> = urls.iter().map(String::as_str).filter(|u| is_raster(u)).collect();
    rasters
        .iter()
        .find(|u| u.contains("~orig"))
        .or_else(|| {
            rasters
                .iter()
                .find(|u| u.to_ascii_lowercase().contains("orig"))
        })
        .or_else(|| rasters.iter().find(|u| u.contains("~large")))
        .or_else(|| rasters.first())
        .map(|u| u.to_string())
}
