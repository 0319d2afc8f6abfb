use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

use super::print::filename_token;

pub const WALLPAPER_MIN_DIM: u32 = 320;
pub const WALLPAPER_MAX_DIM: u32 = 4000;
pub const WALLPAPER_JPEG_QUALITY: u8 = 90;

pub const PRINT_MIN_DIM: u32 = 600;
pub const PRINT_MAX_DIM: u32 = 12000;
pub const PRINT_JPEG_QUALITY: u8 = 95;

pub const DEFAULT_PRINT_LABEL: &str = "print";

/// Client-facing message for a render request without a usable id or size.
pub const MISSING_RENDER_PARAMS: &str = "Missing nasa_id, w, h";

/// A fit mode accepted by one of the render endpoints.
pub trait RenderMode: Copy + fmt::Display + FromStr<Err = AppError> {
    /// Mode used when the request does not name one.
    const DEFAULT: Self;

    /// Parse an optional mode, applying the default when absent or blank.
    fn parse_or_default(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::DEFAULT),
            Some(s) => s.parse(),
        }
    }
}

/// Wallpaper fit modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Fill the frame and crop the least interesting edges.
    Cover,
    /// Letterbox the whole image on black.
    Contain,
    /// Letterbox over a blurred, cropped copy of the same image.
    Blur,
}

impl FitMode {
    pub const ALL: [FitMode; 3] = [FitMode::Cover, FitMode::Contain, FitMode::Blur];

    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
            FitMode::Blur => "blur",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cover" => Ok(FitMode::Cover),
            "contain" => Ok(FitMode::Contain),
            "blur" => Ok(FitMode::Blur),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid mode '{}', expected one of: cover, contain, blur",
                s
            ))),
        }
    }
}

impl RenderMode for FitMode {
    const DEFAULT: Self = FitMode::Blur;
}

/// Print fit modes. Prints never use a blurred background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrintMode {
    Cover,
    /// Letterbox on a white matte.
    Contain,
}

impl PrintMode {
    pub const ALL: [PrintMode; 2] = [PrintMode::Cover, PrintMode::Contain];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrintMode::Cover => "cover",
            PrintMode::Contain => "contain",
        }
    }
}

impl fmt::Display for PrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrintMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cover" => Ok(PrintMode::Cover),
            "contain" => Ok(PrintMode::Contain),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid mode '{}', expected one of: cover, contain",
                s
            ))),
        }
    }
}

impl RenderMode for PrintMode {
    const DEFAULT: Self = PrintMode::Cover;
}

/// Render parameters as sent by a client, via query string or JSON body.
///
/// `w` and `h` accept numbers or numeric strings so the same shape serves
/// both transports.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RenderRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub nasa_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[schema(value_type = Option<f64>)]
    pub w: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[schema(value_type = Option<f64>)]
    pub h: Option<f64>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    #[validate(length(max = 120))]
    pub label: Option<String>,
}

/// A validated render request with its output size clamped into range.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget<M> {
    pub nasa_id: String,
    pub width: u32,
    pub height: u32,
    pub mode: M,
    pub label: String,
}

impl RenderRequest {
    /// Validate the request and clamp its size into `[min_dim, max_dim]`.
    pub fn resolve<M: RenderMode>(
        &self,
        min_dim: u32,
        max_dim: u32,
    ) -> Result<RenderTarget<M>, AppError> {
        let nasa_id = self
            .nasa_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let w = self.w.filter(|w| *w > 0.0);
        let h = self.h.filter(|h| *h > 0.0);

        let (Some(nasa_id), Some(w), Some(h)) = (nasa_id, w, h) else {
            return Err(AppError::BadRequest(MISSING_RENDER_PARAMS.to_string()));
        };

        self.validate()?;
        let mode = M::parse_or_default(self.mode.as_deref())?;

        let label = self
            .label
            .as_deref()
            .map(filename_token)
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_PRINT_LABEL.to_string());

        Ok(RenderTarget {
            nasa_id: nasa_id.to_string(),
            width: clamp_dimension(w, min_dim, max_dim),
            height: clamp_dimension(h, min_dim, max_dim),
            mode,
            label,
        })
    }
}

/// Floor a requested dimension and clamp it into `[min, max]`.
pub fn clamp_dimension(value: f64, min: u32, max: u32) -> u32 {
    let floored = value.floor();
    if floored <= min as f64 {
        min
    } else if floored >= max as f64 {
        max
    } else {
        floored as u32
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Text(String),
    }

    let value = Option::<Lenient>::deserialize(deserializer)?;
    let number = match value {
        Some(Lenient::Number(n)) => Some(n),
        Some(Lenient::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}
