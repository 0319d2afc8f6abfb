use serde::Serialize;
use utoipa::ToSchema;

/// Highest page number a category listing will request from NASA.
pub const MAX_PAGE: u32 = 100;

/// A curated browse category backed by a fixed NASA search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub slug: &'static str,
    pub label: &'static str,
    pub query: &'static str,
}

pub const FEATURED_SLUG: &str = "featured";

pub const CATEGORIES: [Category; 10] = [
    Category {
        slug: FEATURED_SLUG,
        label: "Featured",
        query: "space",
    },
    Category {
        slug: "nebulae",
        label: "Nebulae",
        query: "nebula",
    },
    Category {
        slug: "galaxies",
        label: "Galaxies",
        query: "galaxy",
    },
    Category {
        slug: "planets",
        label: "Planets",
        query: "planet",
    },
    Category {
        slug: "moon",
        label: "Moon",
        query: "moon",
    },
    Category {
        slug: "mars",
        label: "Mars",
        query: "mars",
    },
    Category {
        slug: "earth",
        label: "Earth",
        query: "earth from space",
    },
    Category {
        slug: "iss",
        label: "ISS",
        query: "international space station",
    },
    Category {
        slug: "astronauts",
        label: "Astronauts",
        query: "astronaut",
    },
    Category {
        slug: "telescopes",
        label: "Telescopes",
        query: "hubble",
    },
];

impl Category {
    pub fn is_featured(&self) -> bool {
        self.slug == FEATURED_SLUG
    }
}

/// Look up a category by slug, falling back to `featured` for anything unknown.
pub fn category_by_slug(slug: &str) -> Category {
    CATEGORIES
        .iter()
        .copied()
        .find(|c| c.slug == slug)
        .unwrap_or(CATEGORIES[0])
}

pub fn is_valid_category_slug(slug: &str) -> bool {
    CATEGORIES.iter().any(|c| c.slug == slug)
}

/// Clamp a raw page parameter into `1..=MAX_PAGE`.
///
/// Missing, non-numeric, non-finite or sub-1 values become 1; fractional pages
/// are floored.
pub fn clamp_page(raw: Option<&str>) -> u32 {
    let n = match raw.map(str::trim) {
        None | Some("") => return 1,
        Some(s) => match s.parse::<f64>() {
            Ok(n) if n.is_finite() => n,
            _ => return 1,
        },
    };
    if n < 1.0 {
        1
    } else if n > MAX_PAGE as f64 {
        MAX_PAGE
    } else {
        n.floor() as u32
    }
}

/// Parse a `/c/{cat}/{page}` path segment. Only plain positive integers count.
pub fn parse_page_segment(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<u32>().ok().filter(|p| *p >= 1)
}

/// Canonical site path for a category listing page.
pub fn canonical_path(category: &Category, page: u32) -> String {
    if category.is_featured() {
        if page <= 1 {
            "/".to_string()
        } else {
            format!("/c/{}/{}", FEATURED_SLUG, page)
        }
    } else {
        format!("/c/{}/{}", category.slug, page.max(1))
    }
}

/// Head metadata for a category listing page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
}

impl PageMeta {
    pub fn for_category(category: &Category, page: u32) -> Self {
        Self {
            title: format!("{} — Page {} | VoidView", category.label, page),
            description: format!(
                "Browse {} space images on VoidView. Page {}.",
                category.label.to_lowercase(),
                page
            ),
            canonical: canonical_path(category, page),
        }
    }
}
