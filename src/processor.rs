//! Single-file processing pipeline.
//!
//! For one source image: validate → backup → decode → orientation fix →
//! size planning → per-format encoding → stats update. Every stage feeds the
//! next; failure at any stage aborts that file (already-written outputs are
//! not rolled back; this is best-effort, not transactional).
//!
//! The [`ImageProcessor`] owns the running statistics and is shared by
//! reference across batch workers; counter updates are atomic so concurrent
//! completions never lose increments.

use crate::config::{self, BACKUP_FOLDER, DEFAULT_SIZES};
use crate::imaging::{
    classify, encode_variant, plan_output_sizes, read_orientation, variant_path, ContentType,
    EncodeError, OutputFormat,
};
use image::ImageReader;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Per-call options for [`ImageProcessor::process_image`].
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Target widths. Empty means the default list (400, 800, 1200).
    pub sizes: Vec<u32>,
    /// Quality override (0–100). `None` uses the quality table.
    pub quality: Option<u8>,
    /// Generate WebP variants in addition to JPEG.
    pub generate_webp: bool,
    /// Plan and report without writing files or creating backups.
    pub dry_run: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            sizes: Vec::new(),
            quality: None,
            generate_webp: true,
            dry_run: false,
        }
    }
}

/// One encoded (or, in dry-run, planned) output file.
#[derive(Debug, Clone, Serialize)]
pub struct OutputArtifact {
    pub path: PathBuf,
    /// Output dimensions (width, height).
    pub dimensions: (u32, u32),
    pub format: OutputFormat,
    /// Bytes on disk; 0 for dry-run artifacts, which are never written.
    pub file_size: u64,
}

/// Result of processing one source file.
///
/// Owned by exactly one worker until handed back to the batch engine.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub original_path: PathBuf,
    pub original_size: u64,
    pub content_type: ContentType,
    pub outputs: Vec<OutputArtifact>,
    pub backup_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    /// Error record for a file whose pipeline failed: no outputs, the
    /// message preserved. Used by the batch engine to isolate failures.
    pub fn failed(path: &Path, error: &ProcessError) -> Self {
        Self {
            original_path: path.to_path_buf(),
            original_size: 0,
            content_type: ContentType::Photo,
            outputs: Vec::new(),
            backup_created: false,
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Percentage size reduction from `original` to `optimized` bytes.
///
/// Defined as 0 when `original` is 0. Negative when outputs grew.
pub fn size_reduction_percent(original: u64, optimized: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - optimized as f64) / original as f64 * 100.0
}

/// Cumulative counters, updated only after successful non-dry-run runs.
#[derive(Debug, Default)]
struct RunningStats {
    processed: AtomicU64,
    original_bytes: AtomicU64,
    optimized_bytes: AtomicU64,
    files_created: AtomicU64,
}

/// Point-in-time view of the running statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub processed: u64,
    pub original_bytes: u64,
    pub optimized_bytes: u64,
    pub files_created: u64,
    pub reduction_percent: f64,
}

/// The single-file pipeline plus its running statistics.
pub struct ImageProcessor {
    backup: bool,
    backup_folder: PathBuf,
    stats: RunningStats,
}

impl ImageProcessor {
    /// `backup_folder` defaults to [`BACKUP_FOLDER`] when `None`.
    pub fn new(backup: bool, backup_folder: Option<PathBuf>) -> Self {
        Self {
            backup,
            backup_folder: backup_folder.unwrap_or_else(|| PathBuf::from(BACKUP_FOLDER)),
            stats: RunningStats::default(),
        }
    }

    /// Run the full pipeline for one file.
    pub fn process_image(
        &self,
        path: &Path,
        opts: &ProcessOptions,
    ) -> Result<ProcessingResult, ProcessError> {
        if !path.exists() {
            return Err(ProcessError::NotFound(path.to_path_buf()));
        }
        if !config::is_supported_input(path) {
            let ext = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_else(|| "(no extension)".to_string());
            return Err(ProcessError::UnsupportedFormat(ext));
        }
        if let Some(q) = opts.quality {
            if q > 100 {
                return Err(ProcessError::InvalidArgument(format!(
                    "quality must be 0-100, got {q}"
                )));
            }
        }
        if opts.sizes.contains(&0) {
            return Err(ProcessError::InvalidArgument(
                "sizes must be positive".to_string(),
            ));
        }

        let sizes: &[u32] = if opts.sizes.is_empty() {
            DEFAULT_SIZES
        } else {
            &opts.sizes
        };

        let original_size = std::fs::metadata(path)?.len();

        // Decode once; the reader sniffs the actual container format, which
        // also drives content classification.
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let declared_format = reader.format();
        let img = reader.decode().map_err(|e| ProcessError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let content_type = classify(&img, declared_format);

        let backup_created = if self.backup && !opts.dry_run {
            self.create_backup(path)?;
            true
        } else {
            false
        };

        // Orientation correction happens before size planning so the
        // corrected aspect ratio drives output dimensions.
        let img = read_orientation(path).apply(img);
        let planned = plan_output_sizes((img.width(), img.height()), sizes);

        let mut outputs = Vec::new();
        let mut formats = vec![OutputFormat::Jpeg];
        if opts.generate_webp {
            formats.push(OutputFormat::Webp);
        }

        for format in formats {
            let quality = opts
                .quality
                .unwrap_or_else(|| config::quality_for(content_type, format));

            for (&width, &dimensions) in &planned {
                let output_path = variant_path(path, width, format);

                let file_size = if opts.dry_run {
                    0
                } else {
                    encode_variant(&img, dimensions, &output_path, format, quality)?;
                    std::fs::metadata(&output_path)?.len()
                };

                outputs.push(OutputArtifact {
                    path: output_path,
                    dimensions,
                    format,
                    file_size,
                });
            }
        }

        let result = ProcessingResult {
            original_path: path.to_path_buf(),
            original_size,
            content_type,
            outputs,
            backup_created,
            error: None,
        };

        if !opts.dry_run {
            self.record(&result);
        }

        Ok(result)
    }

    /// Copy the original, byte for byte, into the backup root.
    ///
    /// The backup root mirrors the original's absolute path structure, so
    /// `/home/me/blog/hero.jpg` lands at `<backup>/home/me/blog/hero.jpg`.
    fn create_backup(&self, path: &Path) -> Result<PathBuf, ProcessError> {
        let absolute = std::path::absolute(path)?;
        let mirrored: PathBuf = absolute
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        let backup_path = self.backup_folder.join(mirrored);

        if let Some(parent) = backup_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(path, &backup_path)?;
        Ok(backup_path)
    }

    fn record(&self, result: &ProcessingResult) {
        self.stats.processed.fetch_add(1, Ordering::Relaxed);
        self.stats
            .original_bytes
            .fetch_add(result.original_size, Ordering::Relaxed);
        let output_bytes: u64 = result.outputs.iter().map(|o| o.file_size).sum();
        self.stats
            .optimized_bytes
            .fetch_add(output_bytes, Ordering::Relaxed);
        self.stats
            .files_created
            .fetch_add(result.outputs.len() as u64, Ordering::Relaxed);
    }

    /// Snapshot the running statistics.
    pub fn stats(&self) -> StatsSnapshot {
        let original_bytes = self.stats.original_bytes.load(Ordering::Relaxed);
        let optimized_bytes = self.stats.optimized_bytes.load(Ordering::Relaxed);
        StatsSnapshot {
            processed: self.stats.processed.load(Ordering::Relaxed),
            original_bytes,
            optimized_bytes,
            files_created: self.stats.files_created.load(Ordering::Relaxed),
            reduction_percent: size_reduction_percent(original_bytes, optimized_bytes),
        }
    }

    /// Zero all counters. Files already on disk are unaffected.
    pub fn reset_stats(&self) {
        self.stats.processed.store(0, Ordering::Relaxed);
        self.stats.original_bytes.store(0, Ordering::Relaxed);
        self.stats.optimized_bytes.store(0, Ordering::Relaxed);
        self.stats.files_created.store(0, Ordering::Relaxed);
    }

    pub fn backup_folder(&self) -> &Path {
        &self.backup_folder
    }
}
