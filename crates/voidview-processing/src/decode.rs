use std::io::Cursor;

use image::{DynamicImage, ImageReader, Limits};

use crate::error::ProcessingError;

/// Bytes per pixel assumed when bounding decoder allocations.
const ALLOC_BYTES_PER_PIXEL: u64 = 8;

/// Decode an image, rejecting anything with more than `max_input_pixels`
/// pixels before the pixel data is touched.
pub fn decode_with_limits(
    bytes: &[u8],
    max_input_pixels: u64,
) -> Result<DynamicImage, ProcessingError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| ProcessingError::Decode(e.to_string()))?;

    let pixels = width as u64 * height as u64;
    if pixels > max_input_pixels {
        return Err(ProcessingError::TooManyPixels {
            pixels,
            limit: max_input_pixels,
        });
    }

    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(ProcessingError::UnknownFormat);
    }

    let mut limits = Limits::default();
    limits.max_alloc = Some(max_input_pixels.saturating_mul(ALLOC_BYTES_PER_PIXEL));
    reader.limits(limits);

    let img = reader
        .decode()
        .map_err(|e| ProcessingError::Decode(e.to_string()))?;

    tracing::debug!(
        width = img.width(),
        height = img.height(),
        "Decoded source image"
    );
    Ok(img)
}
