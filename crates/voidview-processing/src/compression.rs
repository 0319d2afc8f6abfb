use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::error::ProcessingError;

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Encode as baseline JPEG. Alpha is dropped; the encoder keeps full
/// chroma resolution.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, ProcessingError> {
    let rgb = img.to_rgb8();
    let mut jpeg_data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg_data, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|e| ProcessingError::Encode(e.to_string()))?;
    Ok(Bytes::from(jpeg_data))
}
