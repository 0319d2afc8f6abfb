//! Raw response shapes of the NASA Images API.
//!
//! Every field is optional or defaulted: the API is loose about what it
//! returns and a single odd item must not sink a whole page.

use serde::Deserialize;
use voidview_core::models::{GalleryItem, ImageDetail};

const UNTITLED: &str = "Untitled";

#[derive(Debug, Default, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    pub collection: SearchCollection,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchCollection {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    #[serde(default)]
    pub metadata: Option<CollectionMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionMetadata {
    #[serde(default)]
    pub total_hits: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub data: Vec<ItemData>,
    #[serde(default)]
    pub links: Vec<ItemLink>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemData {
    #[serde(default)]
    pub nasa_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemLink {
    #[serde(default)]
    pub href: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl SearchItem {
    pub fn nasa_id(&self) -> Option<&str> {
        non_empty(self.data.first().and_then(|d| d.nasa_id.as_ref()))
    }

    /// `links[0].href`, typically the thumbnail.
    pub fn thumb(&self) -> Option<&str> {
        non_empty(self.links.first().and_then(|l| l.href.as_ref()))
    }

    pub fn title(&self) -> &str {
        self.data
            .first()
            .and_then(|d| d.title.as_deref())
            .unwrap_or(UNTITLED)
    }

    pub fn description(&self) -> Option<&str> {
        self.data.first().and_then(|d| d.description.as_deref())
    }

    /// Build a gallery entry; items without an id or a thumbnail are unusable.
    pub fn to_gallery_item(&self) -> Option<GalleryItem> {
        Some(GalleryItem {
            nasa_id: self.nasa_id()?.to_string(),
            title: self.title().to_string(),
            description: self.description().map(str::to_string),
            thumb: self.thumb()?.to_string(),
        })
    }

    pub fn to_image_detail(&self) -> Option<ImageDetail> {
        Some(ImageDetail {
            nasa_id: self.nasa_id()?.to_string(),
            title: self.title().to_string(),
            description: self.description().unwrap_or_default().to_string(),
            thumb: self.thumb()?.to_string(),
        })
    }
}

impl SearchCollection {
    pub fn total_hits(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.total_hits)
    }

    /// Usable items in listing order.
    pub fn gallery_items(&self) -> Vec<GalleryItem> {
        self.items
            .iter()
            .filter_map(SearchItem::to_gallery_item)
            .collect()
    }

    pub fn first_usable(&self) -> Option<&SearchItem> {
        self.items
            .iter()
            .find(|it| it.nasa_id().is_some() && it.thumb().is_some())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetEnvelope {
    #[serde(default)]
    pub collection: AssetCollection,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetCollection {
    #[serde(default)]
    pub items: Vec<AssetEntry>,
}

/// An asset manifest entry: either a bare URL or an object with `href`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AssetEntry {
    Url(String),
    Link {
        #[serde(default)]
        href: Option<String>,
    },
    Other(serde_json::Value),
}

impl AssetEntry {
    pub fn url(&self) -> Option<&str> {
        match self {
            AssetEntry::Url(url) => Some(url.as_str()),
            AssetEntry::Link { href } => href.as_deref(),
            AssetEntry::Other(_) => None,
        }
        .filter(|u| !u.is_empty())
    }
}

impl AssetCollection {
    /// Manifest URLs in listing order with blanks dropped.
    pub fn urls(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(AssetEntry::url)
            .map(str::to_string)
            .collect()
    }
}
