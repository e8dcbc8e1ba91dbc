//! Content-type detection for quality selection.
//!
//! A cheap heuristic over the declared format and pixel statistics. Any
//! ambiguity resolves to [`ContentType::Photo`], and classification never
//! fails the pipeline.

use image::{DynamicImage, ImageFormat};
use serde::Serialize;

/// Pixel-intensity standard deviation above which a PNG is assumed to be a
/// screenshot (text and UI chrome produce high contrast), on a 0–255 scale.
const SCREENSHOT_CONTRAST_THRESHOLD: f64 = 50.0;

/// Heuristic classification of what an image depicts, driving the quality
/// table lookup. Recomputed per file, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Photo,
    Screenshot,
    Graphic,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentType::Photo => "photo",
            ContentType::Screenshot => "screenshot",
            ContentType::Graphic => "graphic",
        };
        f.write_str(name)
    }
}

/// Classify a decoded image given its declared format.
///
/// - JPEG → photo (JPEG sources are overwhelmingly camera output)
/// - PNG with actual transparency → graphic
/// - PNG with high contrast → screenshot, otherwise graphic
/// - GIF → graphic
/// - anything else (including an unknown format) → photo
pub fn classify(img: &DynamicImage, format: Option<ImageFormat>) -> ContentType {
    match format {
        Some(ImageFormat::Jpeg) => ContentType::Photo,
        Some(ImageFormat::Png) => {
            if has_transparency(img) {
                return ContentType::Graphic;
            }
            if intensity_std_dev(img) > SCREENSHOT_CONTRAST_THRESHOLD {
                ContentType::Screenshot
            } else {
                ContentType::Graphic
            }
        }
        Some(ImageFormat::Gif) => ContentType::Graphic,
        _ => ContentType::Photo,
    }
}

/// Whether the image has an alpha channel with at least one non-opaque pixel.
fn has_transparency(img: &DynamicImage) -> bool {
    if !img.color().has_alpha() {
        return false;
    }
    img.to_rgba8().pixels().any(|p| p.0[3] < 255)
}

/// Standard deviation of channel intensities across the full image.
fn intensity_std_dev(img: &DynamicImage) -> f64 {
    let rgb = img.to_rgb8();
    let samples = rgb.as_raw();
    if samples.is_empty() {
        return 0.0;
    }

    let n = samples.len() as f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for &v in samples {
        let v = v as f64;
        sum += v;
        sum_sq += v * v;
    }

    let mean = sum / n;
    let variance = (sum_sq / n - mean * mean).max(0.0);
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn flat_rgb(value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([value, value, value])))
    }

    #[test]
    fn jpeg_is_photo() {
        assert_eq!(
            classify(&flat_rgb(128), Some(ImageFormat::Jpeg)),
            ContentType::Photo
        );
    }

    #[test]
    fn png_with_transparency_is_graphic() {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        img.put_pixel(3, 3, Rgba([255, 0, 0, 128]));
        assert_eq!(
            classify(&DynamicImage::ImageRgba8(img), Some(ImageFormat::Png)),
            ContentType::Graphic
        );
    }

    #[test]
    fn opaque_alpha_channel_is_not_transparency() {
        // Fully opaque RGBA falls through to the contrast heuristic.
        let img = RgbaImage::from_pixel(8, 8, Rgba([200, 200, 200, 255]));
        assert_eq!(
            classify(&DynamicImage::ImageRgba8(img), Some(ImageFormat::Png)),
            ContentType::Graphic
        );
    }

    #[test]
    fn high_contrast_png_is_screenshot() {
        // Half black, half white: std dev ≈ 127, well over the threshold.
        let img = RgbImage::from_fn(16, 16, |x, _| {
            if x < 8 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        assert_eq!(
            classify(&DynamicImage::ImageRgb8(img), Some(ImageFormat::Png)),
            ContentType::Screenshot
        );
    }

    #[test]
    fn flat_png_is_graphic() {
        assert_eq!(
            classify(&flat_rgb(128), Some(ImageFormat::Png)),
            ContentType::Graphic
        );
    }

    #[test]
    fn gif_is_graphic() {
        assert_eq!(
            classify(&flat_rgb(0), Some(ImageFormat::Gif)),
            ContentType::Graphic
        );
    }

    #[test]
    fn unknown_formats_default_to_photo() {
        assert_eq!(
            classify(&flat_rgb(0), Some(ImageFormat::Bmp)),
            ContentType::Photo
        );
        assert_eq!(
            classify(&flat_rgb(0), Some(ImageFormat::Tiff)),
            ContentType::Photo
        );
        assert_eq!(classify(&flat_rgb(0), None), ContentType::Photo);
    }

    #[test]
    fn std_dev_of_flat_image_is_zero() {
        assert_eq!(intensity_std_dev(&flat_rgb(77)), 0.0);
    }

    #[test]
    fn std_dev_of_checkerboard_is_half_range() {
        let img = RgbImage::from_fn(16, 16, |x, y| {
            if (x + y) % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let sd = intensity_std_dev(&DynamicImage::ImageRgb8(img));
        assert!((sd - 127.5).abs() < 0.1, "std dev was {sd}");
    }
}
