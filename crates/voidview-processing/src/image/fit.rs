use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};

use super::entropy_crop::EntropyCrop;

/// Gaussian sigma of the blur-fill background, in output pixels.
pub const BLUR_SIGMA: f32 = 35.0;

/// The background is blurred at reduced size, then scaled back up.
const BLUR_DOWNSCALE: u32 = 8;

/// Select appropriate filter type based on resize ratio
pub fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> imageops::FilterType {
    let width_ratio = orig_width as f32 / new_width.max(1) as f32;
    let height_ratio = orig_height as f32 / new_height.max(1) as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        imageops::FilterType::Triangle
    } else if max_ratio > 1.5 {
        imageops::FilterType::CatmullRom
    } else {
        imageops::FilterType::Lanczos3
    }
}

fn resize_exact(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();
    if (orig_width, orig_height) == (width, height) {
        return img.clone();
    }
    let filter = select_filter(orig_width, orig_height, width, height);
    img.resize_exact(width, height, filter)
}

/// Size of `img` scaled by `scale`, each side at least `min`.
fn scaled_size(img: &DynamicImage, scale: f32, min: (u32, u32)) -> (u32, u32) {
    let (w, h) = img.dimensions();
    (
        ((w as f32 * scale).round() as u32).max(min.0),
        ((h as f32 * scale).round() as u32).max(min.1),
    )
}

/// Scale to fill the target, then crop the overhang keeping the most detail.
pub fn cover(img: &DynamicImage, target_width: u32, target_height: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    let scale = (target_width as f32 / w as f32).max(target_height as f32 / h as f32);
    let (scaled_w, scaled_h) = scaled_size(img, scale, (target_width, target_height));

    let filled = resize_exact(img, scaled_w, scaled_h);
    if (scaled_w, scaled_h) == (target_width, target_height) {
        return filled;
    }
    EntropyCrop::crop(&filled, target_width, target_height)
}

/// Scale to fit inside the target, centred on a `background` canvas.
pub fn contain(
    img: &DynamicImage,
    target_width: u32,
    target_height: u32,
    background: Rgba<u8>,
) -> DynamicImage {
    let foreground = fit_inside(img, target_width, target_height);
    let mut canvas =
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(target_width, target_height, background));
    overlay_centered(&mut canvas, &foreground);
    canvas
}

fn fit_inside(img: &DynamicImage, target_width: u32, target_height: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    let scale = (target_width as f32 / w as f32).min(target_height as f32 / h as f32);
    let (scaled_w, scaled_h) = scaled_size(img, scale, (1, 1));
    resize_exact(
        img,
        scaled_w.min(target_width),
        scaled_h.min(target_height),
    )
}

fn overlay_centered(canvas: &mut DynamicImage, foreground: &DynamicImage) {
    let (cw, ch) = canvas.dimensions();
    let (fw, fh) = foreground.dimensions();
    let x_offset = cw.saturating_sub(fw) / 2;
    let y_offset = ch.saturating_sub(fh) / 2;
    imageops::overlay(canvas, foreground, x_offset as i64, y_offset as i64);
}

/// Blurred cover-fit background with the whole image contained on top.
pub fn blur_fill(img: &DynamicImage, target_width: u32, target_height: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    let scale = (target_width as f32 / w as f32).max(target_height as f32 / h as f32);
    let (scaled_w, scaled_h) = scaled_size(img, scale, (target_width, target_height));
    let background = resize_exact(img, scaled_w, scaled_h).crop_imm(
        (scaled_w - target_width) / 2,
        (scaled_h - target_height) / 2,
        target_width,
        target_height,
    );

    let small_w = (target_width / BLUR_DOWNSCALE).max(1);
    let small_h = (target_height / BLUR_DOWNSCALE).max(1);
    let mut canvas = background
        .resize_exact(small_w, small_h, imageops::FilterType::Triangle)
        .blur(BLUR_SIGMA / BLUR_DOWNSCALE as f32)
        .resize_exact(target_width, target_height, imageops::FilterType::Triangle);

    let foreground = fit_inside(img, target_width, target_height);
    overlay_centered(&mut canvas, &foreground);
    canvas
}
