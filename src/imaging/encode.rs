//! Variant encoding: resize once, write one output format.
//!
//! | Format | Encoder |
//! |---|---|
//! | JPEG | `image::codecs::jpeg::JpegEncoder` (quality from table/override) |
//! | PNG | `image::codecs::png::PngEncoder` (lossless, fixed effort) |
//! | WebP | `webp` crate, lossy, method 6 (maximum compression effort) |
//!
//! Resampling is Lanczos3 via `resize_exact`: the planner has already
//! decided the output dimensions, so the resize must not second-guess them.
//!
//! Output paths follow the `stem_{width}px/stem.{ext}` convention next to the
//! source file. Downstream static-site tooling depends on that exact layout.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, PngEncoder};
use image::imageops::FilterType;
use image::DynamicImage;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Output formats a variant can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// File extension used on disk.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// Lowercase format name for reports.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Deterministic output path for a variant of `source` at `width`.
///
/// `dir/name.ext` at width 800 → `dir/name_800px/name.jpg` (for JPEG).
/// Pure path math; the directory is created by [`encode_variant`].
pub fn variant_path(source: &Path, width: u32, format: OutputFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{stem}_{width}px"))
        .join(format!("{stem}.{}", format.extension()))
}

/// Resize to exact dimensions and write one encoded variant.
///
/// Creates the per-width directory if absent and overwrites any existing
/// file at the output path. No metadata is written, so EXIF from the source
/// never reaches the output.
pub fn encode_variant(
    img: &DynamicImage,
    dimensions: (u32, u32),
    output: &Path,
    format: OutputFormat,
    quality: u8,
) -> Result<(), EncodeError> {
    if let Some(parent) = output.parent() {
        // create_dir_all tolerates the concurrent already-exists race.
        std::fs::create_dir_all(parent)?;
    }

    let (width, height) = dimensions;
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);

    match format {
        OutputFormat::Jpeg => save_jpeg(&resized, output, quality),
        OutputFormat::Png => save_png(&resized, output),
        OutputFormat::Webp => save_webp(&resized, output, quality),
    }
}

fn save_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), EncodeError> {
    // JPEG has no alpha, flatten before encoding.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| EncodeError::Encode(format!("JPEG encode failed: {e}")))
}

fn save_png(img: &DynamicImage, path: &Path) -> Result<(), EncodeError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(
        writer,
        CompressionType::Default,
        image::codecs::png::FilterType::Adaptive,
    );
    img.write_with_encoder(encoder)
        .map_err(|e| EncodeError::Encode(format!("PNG encode failed: {e}")))
}

fn save_webp(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), EncodeError> {
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());

    let mut config =
        webp::WebPConfig::new().map_err(|_| EncodeError::Encode("WebP config init failed".into()))?;
    config.lossless = 0;
    config.quality = quality as f32;
    config.method = 6;

    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| EncodeError::Encode(format!("WebP encode failed: {e:?}")))?;
    std::fs::write(path, &*encoded)?;
    Ok(())
}
