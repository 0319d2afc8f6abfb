//! Device presets and print planning.
//!
//! Wallpaper presets and print sizes are fixed tables. A `PrintPlan` turns a
//! physical size, a DPI and an orientation into the pixel target sent to the
//! print renderer, and `assess_quality` grades a source image against it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

use super::render::PrintMode;

/// Long edge of a print preview, in pixels.
pub const PREVIEW_MAX_EDGE: u32 = 1600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WallpaperPreset {
    pub label: &'static str,
    pub w: u32,
    pub h: u32,
}

pub const WALLPAPER_PRESETS: [WallpaperPreset; 5] = [
    WallpaperPreset {
        label: "Phone",
        w: 1080,
        h: 1920,
    },
    WallpaperPreset {
        label: "iPhone",
        w: 1170,
        h: 2532,
    },
    WallpaperPreset {
        label: "Desktop",
        w: 1920,
        h: 1080,
    },
    WallpaperPreset {
        label: "Desktop",
        w: 2560,
        h: 1440,
    },
    WallpaperPreset {
        label: "Ultrawide",
        w: 3440,
        h: 1440,
    },
];

/// A physical print size, portrait-oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrintSize {
    pub label: &'static str,
    pub w_in: u32,
    pub h_in: u32,
}

impl PrintSize {
    /// Short lookup key such as `12x18`.
    pub fn key(&self) -> String {
        format!("{}x{}", self.w_in, self.h_in)
    }
}

pub const PRINT_SIZES: [PrintSize; 6] = [
    PrintSize {
        label: "8×10 in",
        w_in: 8,
        h_in: 10,
    },
    PrintSize {
        label: "11×14 in",
        w_in: 11,
        h_in: 14,
    },
    PrintSize {
        label: "12×18 in (Poster)",
        w_in: 12,
        h_in: 18,
    },
    PrintSize {
        label: "16×20 in",
        w_in: 16,
        h_in: 20,
    },
    PrintSize {
        label: "18×24 in",
        w_in: 18,
        h_in: 24,
    },
    PrintSize {
        label: "24×36 in (Large Poster)",
        w_in: 24,
        h_in: 36,
    },
];

pub const DEFAULT_PRINT_SIZE: PrintSize = PRINT_SIZES[2];

pub const PRINT_DPIS: [u32; 2] = [200, 300];

pub const DEFAULT_PRINT_DPI: u32 = 300;

/// Find a print size by key (`12x18`, `12×18`) or by table index.
pub fn print_size_by_key(key: &str) -> Option<PrintSize> {
    let key = key.trim().to_lowercase().replace('×', "x");
    if let Ok(index) = key.parse::<usize>() {
        return PRINT_SIZES.get(index).copied();
    }
    PRINT_SIZES.iter().copied().find(|s| s.key() == key)
}

/// Reduce a display label to characters safe inside a download filename:
/// whitespace is removed and anything outside `[A-Za-z0-9_×x-]` is dropped.
pub fn filename_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '×' | '-'))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid orientation '{}', expected portrait or landscape",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Dimensions {
    pub w: u32,
    pub h: u32,
}

/// Pixel targets for one print size, DPI and orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintPlan {
    pub size_label: String,
    pub dpi: u32,
    pub orientation: Orientation,
    pub width_in: u32,
    pub height_in: u32,
    pub width_px: u32,
    pub height_px: u32,
    pub preview: Dimensions,
    /// Filename label passed to the print endpoint.
    pub label: String,
    /// Plans always letterbox so nothing is cropped from the print.
    pub mode: PrintMode,
}

fn inches_to_px(inches: u32, dpi: u32) -> u32 {
    (inches as f64 * dpi as f64).round() as u32
}

impl PrintPlan {
    pub fn new(size: &PrintSize, dpi: u32, orientation: Orientation) -> Self {
        let (width_in, height_in) = match orientation {
            Orientation::Portrait => (size.w_in, size.h_in),
            Orientation::Landscape => (size.h_in, size.w_in),
        };
        let width_px = inches_to_px(width_in, dpi);
        let height_px = inches_to_px(height_in, dpi);

        let label: String = size
            .label
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let label = format!(
            "{}_{}dpi_{}_nocrop",
            filename_token(&label),
            dpi,
            orientation
        );

        Self {
            size_label: size.label.to_string(),
            dpi,
            orientation,
            width_in,
            height_in,
            width_px,
            height_px,
            preview: preview_dims(width_px, height_px),
            label,
            mode: PrintMode::Contain,
        }
    }

    /// Query string for downloading this plan from the print endpoint.
    pub fn download_query(&self, nasa_id: &str) -> String {
        format!(
            "nasa_id={}&w={}&h={}&mode={}&label={}",
            urlencoding::encode(nasa_id),
            self.width_px,
            self.height_px,
            self.mode,
            urlencoding::encode(&self.label)
        )
    }
}

/// Same aspect ratio as the target, long edge at most `PREVIEW_MAX_EDGE`.
pub fn preview_dims(w: u32, h: u32) -> Dimensions {
    let long = w.max(h);
    let scale = if long > PREVIEW_MAX_EDGE {
        PREVIEW_MAX_EDGE as f64 / long as f64
    } else {
        1.0
    };
    Dimensions {
        w: (w as f64 * scale).round() as u32,
        h: (h as f64 * scale).round() as u32,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum QualityGrade {
    Excellent,
    Great,
    Good,
    Fair,
    Low,
}

impl QualityGrade {
    pub fn from_effective_dpi(dpi: u32) -> Self {
        match dpi {
            300.. => QualityGrade::Excellent,
            240..=299 => QualityGrade::Great,
            200..=239 => QualityGrade::Good,
            150..=199 => QualityGrade::Fair,
            _ => QualityGrade::Low,
        }
    }
}

/// How well a source image holds up at a plan's size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub source_width: u32,
    pub source_height: u32,
    /// Source megapixels rounded to one decimal.
    pub megapixels: f64,
    /// Scale needed to fit the source inside the target.
    pub needed_scale: f64,
    pub upscale: f64,
    pub effective_dpi: u32,
    pub grade: QualityGrade,
}

pub fn assess_quality(plan: &PrintPlan, source_w: u32, source_h: u32) -> QualityAssessment {
    let sw = source_w.max(1) as f64;
    let sh = source_h.max(1) as f64;
    let needed_scale = (plan.width_px as f64 / sw).min(plan.height_px as f64 / sh);
    let upscale = needed_scale.max(1.0);
    let effective_dpi = (plan.dpi as f64 / upscale).round() as u32;

    QualityAssessment {
        source_width: source_w,
        source_height: source_h,
        megapixels: ((sw * sh) / 1_000_000.0 * 10.0).round() / 10.0,
        needed_scale,
        upscale,
        effective_dpi,
        grade: QualityGrade::from_effective_dpi(effective_dpi),
    }
}
