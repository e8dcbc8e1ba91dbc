//! Batch processing: discovery, the worker pool, and folder analysis.
//!
//! The engine walks a folder for supported images, sorts the list for
//! reproducible dispatch order, and fans the files out across a bounded
//! rayon pool. Each worker runs the full single-file pipeline; a failing
//! file becomes an error-tagged result and never aborts its siblings.
//!
//! Progress is streamed as [`BatchEvent`]s over an `mpsc` channel so the
//! CLI can print one line per completed file while workers keep going.

use crate::config::{LARGE_FILE_THRESHOLD, MEDIUM_FILE_THRESHOLD};
use crate::processor::{ImageProcessor, ProcessOptions, ProcessingResult, StatsSnapshot};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("worker pool setup failed: {0}")]
    Pool(String),
}

/// Emitted once per file as workers complete, in completion order.
#[derive(Debug, Clone)]
pub struct BatchEvent {
    pub path: PathBuf,
    /// Artifacts produced (0 for failed files).
    pub outputs: usize,
    pub error: Option<String>,
}

/// Read-only folder analysis. Never decodes or writes anything.
#[derive(Debug, Clone, Serialize)]
pub struct FolderAnalysis {
    pub total_files: usize,
    pub total_size: u64,
    /// Per-extension count and byte totals, keyed by lowercase extension
    /// with the leading dot (".jpg").
    pub format_breakdown: BTreeMap<String, FormatStats>,
    pub size_breakdown: SizeBuckets,
    /// All discovered files, largest first.
    pub files: Vec<FileInfo>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FormatStats {
    pub count: usize,
    pub size: u64,
}

/// Three-bucket histogram: small < 500KB ≤ medium < 1MB ≤ large.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeBuckets {
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub format: String,
}

/// Summary of the most recent `process_folder` run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub errors: usize,
    pub total_files: usize,
    pub stats: StatsSnapshot,
}

/// Folder-level orchestration over a shared [`ImageProcessor`].
pub struct BatchEngine {
    workers: usize,
    processor: ImageProcessor,
    results: Vec<ProcessingResult>,
}

impl BatchEngine {
    pub fn new(workers: usize, processor: ImageProcessor) -> Self {
        Self {
            workers: workers.max(1),
            processor,
            results: Vec::new(),
        }
    }

    pub fn processor(&self) -> &ImageProcessor {
        &self.processor
    }

    /// Results of the last `process_folder` call.
    pub fn results(&self) -> &[ProcessingResult] {
        &self.results
    }

    /// Process every supported image under `root`.
    ///
    /// Files are discovered in sorted order and dispatched to a pool of
    /// `workers` threads. Per-file failures are captured as error-tagged
    /// results; only a missing root or pool setup failure fails the call.
    /// An empty folder yields an empty result list.
    pub fn process_folder(
        &mut self,
        root: &Path,
        recursive: bool,
        opts: &ProcessOptions,
        progress: Option<Sender<BatchEvent>>,
    ) -> Result<&[ProcessingResult], BatchError> {
        if !root.exists() {
            return Err(BatchError::NotFound(root.to_path_buf()));
        }

        let files = find_image_files(root, recursive)?;
        if files.is_empty() {
            self.results = Vec::new();
            return Ok(&self.results);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| BatchError::Pool(e.to_string()))?;

        let processor = &self.processor;
        let results: Vec<ProcessingResult> = pool.install(|| {
            files
                .par_iter()
                .map_with(progress, |progress, path| {
                    let result = match processor.process_image(path, opts) {
                        Ok(result) => result,
                        Err(error) => ProcessingResult::failed(path, &error),
                    };
                    if let Some(tx) = progress {
                        // A dropped receiver only stops progress reporting.
                        let _ = tx.send(BatchEvent {
                            path: path.clone(),
                            outputs: result.outputs.len(),
                            error: result.error.clone(),
                        });
                    }
                    result
                })
                .collect()
        });

        self.results = results;
        Ok(&self.results)
    }

    /// Analyze a folder without processing anything.
    pub fn analyze_folder(
        &self,
        root: &Path,
        recursive: bool,
    ) -> Result<FolderAnalysis, BatchError> {
        if !root.exists() {
            return Err(BatchError::NotFound(root.to_path_buf()));
        }

        let files = find_image_files(root, recursive)?;

        let mut analysis = FolderAnalysis {
            total_files: files.len(),
            total_size: 0,
            format_breakdown: BTreeMap::new(),
            size_breakdown: SizeBuckets::default(),
            files: Vec::with_capacity(files.len()),
        };

        for path in files {
            let size = std::fs::metadata(&path)?.len();
            let format = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                .unwrap_or_default();

            analysis.total_size += size;
            let entry = analysis.format_breakdown.entry(format.clone()).or_default();
            entry.count += 1;
            entry.size += size;

            if size < MEDIUM_FILE_THRESHOLD {
                analysis.size_breakdown.small += 1;
            } else if size < LARGE_FILE_THRESHOLD {
                analysis.size_breakdown.medium += 1;
            } else {
                analysis.size_breakdown.large += 1;
            }

            analysis.files.push(FileInfo { path, size, format });
        }

        // Largest first; discovery order breaks ties.
        analysis.files.sort_by(|a, b| b.size.cmp(&a.size));

        Ok(analysis)
    }

    /// Summary of the last run plus the processor's cumulative stats.
    pub fn summary(&self) -> BatchSummary {
        let errors = self.results.iter().filter(|r| r.is_error()).count();
        BatchSummary {
            processed: self.results.len() - errors,
            errors,
            total_files: self.results.len(),
            stats: self.processor.stats(),
        }
    }
}

/// Discover supported image files under `root`, lexicographically sorted.
fn find_image_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, BatchError> {
    let walker = if recursive {
        walkdir::WalkDir::new(root)
    } else {
        walkdir::WalkDir::new(root).max_depth(1)
    };

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| BatchError::Io(e.into()))?;
        if entry.file_type().is_file() && crate::config::is_supported_input(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
