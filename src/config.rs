//! Static configuration: default sizes, the quality table, supported formats.
//!
//! Everything here is compile-time data plus pure lookup helpers. There is no
//! config file; the CLI flags are the whole configuration surface.

use crate::imaging::classify::ContentType;
use crate::imaging::encode::OutputFormat;

/// Default responsive widths (pixels) when the caller supplies none.
pub const DEFAULT_SIZES: &[u32] = &[400, 800, 1200];

/// File extensions accepted as input, lowercase, without the dot.
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff"];

/// Default backup root directory name.
pub const BACKUP_FOLDER: &str = ".image_optimizer_backup";

/// Files above this size count as "large" in folder analysis.
pub const LARGE_FILE_THRESHOLD: u64 = 1024 * 1024;

/// Files between this and [`LARGE_FILE_THRESHOLD`] count as "medium".
pub const MEDIUM_FILE_THRESHOLD: u64 = 500 * 1024;

/// Default number of parallel workers for batch processing.
pub const DEFAULT_WORKERS: usize = 4;

/// Quality table lookup for a (content type, output format) pair.
///
/// The table:
///
/// | content    | jpeg | png | webp |
/// |------------|------|-----|------|
/// | photo      | 85   | -   | 85   |
/// | screenshot | -    | 90  | 90   |
/// | graphic    | -    | 95  | 95   |
///
/// Unlisted combinations fall back to the photo row, and to 85 when the
/// photo row has no entry either.
pub fn quality_for(content: ContentType, format: OutputFormat) -> u8 {
    match (content, format) {
        (ContentType::Photo, OutputFormat::Jpeg) => 85,
        (ContentType::Photo, OutputFormat::Webp) => 85,
        (ContentType::Screenshot, OutputFormat::Png) => 90,
        (ContentType::Screenshot, OutputFormat::Webp) => 90,
        (ContentType::Graphic, OutputFormat::Png) => 95,
        (ContentType::Graphic, OutputFormat::Webp) => 95,
        // Photo-row fallback: jpeg and webp are both 85 there, and the
        // photo row has no png entry, so everything left resolves to 85.
        _ => 85,
    }
}

/// Whether a path's extension is in the supported input set.
pub fn is_supported_input(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| SUPPORTED_INPUT_EXTENSIONS.contains(&e.as_str()))
}
