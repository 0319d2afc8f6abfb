//! Source image header probing

use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use serde::Serialize;

/// Dimensions and format read from an image header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbedImage {
    pub width: u32,
    pub height: u32,
    /// Short codec name: `jpeg`, `png`, `tiff` and so on.
    pub format: Option<String>,
}

fn format_name(format: ImageFormat) -> Option<String> {
    let name = match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::Tiff => "tiff",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Avif => "avif",
        other => return other.extensions_str().first().map(|ext| ext.to_string()),
    };
    Some(name.to_string())
}

/// Read width/height from the leading bytes of an image.
///
/// Returns `None` while the buffer does not yet hold a complete header, so it
/// can be called repeatedly as more of a download arrives.
pub fn probe_dimensions(bytes: &[u8]) -> Option<ProbedImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    let format = reader.format().and_then(format_name);
    let (width, height) = reader.into_dimensions().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(ProbedImage {
        width,
        height,
        format,
    })
}
