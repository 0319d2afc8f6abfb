use image::{imageops, DynamicImage, GenericImageView, GrayImage};

/// Longest edge of the grayscale copy used to score crop windows.
const ANALYSIS_MAX_EDGE: u32 = 256;

/// Picks the crop window that keeps the most detail.
///
/// Detail is scored per pixel as a mix of gradient magnitude and local
/// variance on a downscaled grayscale copy, then summed along each line
/// across the axis being cropped. The window with the highest total wins;
/// ties go to the window closest to the centre, so flat images crop centred.
pub struct EntropyCrop;

impl EntropyCrop {
    fn saliency(gray: &GrayImage) -> Vec<f32> {
        let (w, h) = gray.dimensions();
        let mut out = vec![0.0f32; (w * h) as usize];
        if w < 3 || h < 3 {
            return out;
        }

        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let right = gray.get_pixel(x + 1, y)[0] as i32;
                let left = gray.get_pixel(x - 1, y)[0] as i32;
                let bottom = gray.get_pixel(x, y + 1)[0] as i32;
                let top = gray.get_pixel(x, y - 1)[0] as i32;

                let gx = right - left;
                let gy = bottom - top;
                let edge_strength = ((gx * gx + gy * gy) as f32).sqrt();

                let mut sum = 0i32;
                let mut sum_sq = 0i32;
                for dy in 0..3 {
                    for dx in 0..3 {
                        let px = gray.get_pixel(x + dx - 1, y + dy - 1)[0] as i32;
                        sum += px;
                        sum_sq += px * px;
                    }
                }
                let mean = sum as f32 / 9.0;
                let variance = (sum_sq as f32 / 9.0) - mean * mean;

                out[(y * w + x) as usize] = edge_strength * 0.6 + variance * 0.4;
            }
        }
        out
    }

    /// Best window start along one axis, given per-line scores.
    fn best_window(lines: &[f32], window: usize) -> usize {
        if window >= lines.len() {
            return 0;
        }
        let slack = lines.len() - window;
        let center = slack as f32 / 2.0;

        let mut score: f32 = lines[..window].iter().sum();
        let mut best = (score, 0usize);
        for start in 1..=slack {
            score += lines[start + window - 1] - lines[start - 1];
            let closer = (start as f32 - center).abs() < (best.1 as f32 - center).abs();
            if score > best.0 + f32::EPSILON || ((score - best.0).abs() <= f32::EPSILON && closer)
            {
                best = (score, start);
            }
        }
        best.1
    }

    /// Top-left corner of the best `target_width`×`target_height` window.
    pub fn offset(img: &DynamicImage, target_width: u32, target_height: u32) -> (u32, u32) {
        let (width, height) = img.dimensions();
        let target_width = target_width.min(width);
        let target_height = target_height.min(height);
        if target_width == width && target_height == height {
            return (0, 0);
        }

        let scale = (ANALYSIS_MAX_EDGE as f32 / width.max(height) as f32).min(1.0);
        let small_w = ((width as f32 * scale).round() as u32).max(1);
        let small_h = ((height as f32 * scale).round() as u32).max(1);
        let gray = imageops::resize(
            &img.to_luma8(),
            small_w,
            small_h,
            imageops::FilterType::Triangle,
        );
        let saliency = Self::saliency(&gray);

        let mut columns = vec![0.0f32; small_w as usize];
        let mut rows = vec![0.0f32; small_h as usize];
        for y in 0..small_h as usize {
            for x in 0..small_w as usize {
                let s = saliency[y * small_w as usize + x];
                columns[x] += s;
                rows[y] += s;
            }
        }

        let window_w = ((target_width as f32 * scale).round() as usize).clamp(1, columns.len());
        let window_h = ((target_height as f32 * scale).round() as usize).clamp(1, rows.len());

        let x = (Self::best_window(&columns, window_w) as f32 / scale).round() as u32;
        let y = (Self::best_window(&rows, window_h) as f32 / scale).round() as u32;

        (x.min(width - target_width), y.min(height - target_height))
    }

    /// Crop to the target size around the most detailed region.
    pub fn crop(img: &DynamicImage, target_width: u32, target_height: u32) -> DynamicImage {
        let (x, y) = Self::offset(img, target_width, target_height);
        img.crop_imm(
            x,
            y,
            target_width.min(img.width()),
            target_height.min(img.height()),
        )
    }
}
