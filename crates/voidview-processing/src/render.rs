//! Wallpaper and print renderers.
//!
//! Both take the raw source bytes and a target size that has already been
//! clamped into range, and return an encoded JPEG. They are CPU bound; the
//! HTTP layer runs them on the blocking pool.

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, Rgba};
use voidview_core::models::{
    FitMode, PrintMode, PRINT_JPEG_QUALITY, WALLPAPER_JPEG_QUALITY,
};

use crate::compression::encode_jpeg;
use crate::decode::decode_with_limits;
use crate::error::ProcessingError;
use crate::image::{blur_fill, contain, cover};

const LETTERBOX_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const MATTE_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
}

fn check_target(width: u32, height: u32) -> Result<(), ProcessingError> {
    if width == 0 || height == 0 {
        return Err(ProcessingError::InvalidTarget { width, height });
    }
    Ok(())
}

fn finish(img: DynamicImage, quality: u8) -> Result<RenderedImage, ProcessingError> {
    let (width, height) = img.dimensions();
    let bytes = encode_jpeg(&img, quality)?;
    tracing::debug!(width, height, size = bytes.len(), "Rendered JPEG");
    Ok(RenderedImage {
        bytes,
        width,
        height,
    })
}

pub fn render_wallpaper(
    source: &[u8],
    width: u32,
    height: u32,
    mode: FitMode,
    max_input_pixels: u64,
) -> Result<RenderedImage, ProcessingError> {
    check_target(width, height)?;
    let img = decode_with_limits(source, max_input_pixels)?;
    let out = match mode {
        FitMode::Cover => cover(&img, width, height),
        FitMode::Contain => contain(&img, width, height, LETTERBOX_BLACK),
        FitMode::Blur => blur_fill(&img, width, height),
    };
    finish(out, WALLPAPER_JPEG_QUALITY)
}

pub fn render_print(
    source: &[u8],
    width: u32,
    height: u32,
    mode: PrintMode,
    max_input_pixels: u64,
) -> Result<RenderedImage, ProcessingError> {
    check_target(width, height)?;
    let img = decode_with_limits(source, max_input_pixels)?;
    let out = match mode {
        PrintMode::Cover => cover(&img, width, height),
        PrintMode::Contain => contain(&img, width, height, MATTE_WHITE),
    };
    finish(out, PRINT_JPEG_QUALITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    const LIMIT: u64 = 50_000_000;

    fn source(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([200, 30, 30])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn decoded(rendered: &RenderedImage) -> DynamicImage {
        image::load_from_memory_with_format(&rendered.bytes, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn test_wallpaper_every_mode_hits_target() {
        let src = source(300, 200);
        for mode in FitMode::ALL {
            let out = render_wallpaper(&src, 320, 568, mode, LIMIT).unwrap();
            assert_eq!((out.width, out.height), (320, 568), "mode {}", mode);
            assert_eq!(decoded(&out).dimensions(), (320, 568));
        }
    }

    #[test]
    fn test_wallpaper_contain_is_black_letterbox() {
        let out = render_wallpaper(&source(400, 100), 400, 400, FitMode::Contain, LIMIT).unwrap();
        let img = decoded(&out).to_rgb8();
        let corner = img.get_pixel(5, 5);
        assert!(corner[0] < 20 && corner[1] < 20 && corner[2] < 20);
    }

    #[test]
    fn test_print_contain_is_white_matte() {
        let out = render_print(&source(100, 400), 600, 600, PrintMode::Contain, LIMIT).unwrap();
        let img = decoded(&out).to_rgb8();
        let edge = img.get_pixel(5, 300);
        assert!(edge[0] > 235 && edge[1] > 235 && edge[2] > 235);
    }

    #[test]
    fn test_print_cover_size() {
        let out = render_print(&source(300, 200), 600, 900, PrintMode::Cover, LIMIT).unwrap();
        assert_eq!((out.width, out.height), (600, 900));
    }

    #[test]
    fn test_render_rejects_bad_input() {
        assert!(matches!(
            render_wallpaper(b"nope", 320, 320, FitMode::Blur, LIMIT),
            Err(ProcessingError::Decode(_) | ProcessingError::UnknownFormat)
        ));
        assert!(matches!(
            render_print(&source(300, 200), 600, 600, PrintMode::Cover, 100),
            Err(ProcessingError::TooManyPixels { .. })
        ));
        assert!(matches!(
            render_print(&source(10, 10), 0, 600, PrintMode::Cover, LIMIT),
            Err(ProcessingError::InvalidTarget { .. })
        ));
    }
}
