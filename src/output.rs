//! CLI output formatting for all commands.
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::{BatchEvent, BatchSummary, FolderAnalysis};
use crate::processor::ProcessingResult;
use std::path::Path;

/// Human-readable byte count: `512 B`, `1.5 KB`, `1.0 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Report for a single `optimize` run.
pub fn format_optimize_result(result: &ProcessingResult, backup_folder: &Path) -> Vec<String> {
    let mut lines = vec![
        format!("Processed: {}", result.original_path.display()),
        format!("Detected as: {}", result.content_type),
        format!("Original size: {}", format_file_size(result.original_size)),
    ];

    if result.backup_created {
        lines.push(format!("Backup created: {}", backup_folder.display()));
    }

    if !result.outputs.is_empty() {
        lines.push(String::new());
        lines.push(format!("Generated {} output files:", result.outputs.len()));
        for output in &result.outputs {
            let (w, h) = output.dimensions;
            lines.push(format!(
                "  {} ({}x{}, {}, {})",
                output.path.display(),
                w,
                h,
                output.format.name().to_uppercase(),
                format_file_size(output.file_size)
            ));
        }
    }

    lines
}

/// One progress line per completed batch file.
pub fn format_batch_event(event: &BatchEvent) -> String {
    match &event.error {
        Some(error) => format!("  {}: Error: {error}", event.path.display()),
        None => format!("  {}: {} files", event.path.display(), event.outputs),
    }
}

/// Post-batch summary block.
pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "=== Processing Summary ===".to_string(),
        format!("Files processed: {}", summary.processed),
        format!("Errors: {}", summary.errors),
        format!("Total files: {}", summary.total_files),
    ];

    if summary.processed > 0 {
        lines.push(String::new());
        lines.push("--- Size Optimization ---".to_string());
        lines.push(format!(
            "Original total size: {}",
            format_file_size(summary.stats.original_bytes)
        ));
        lines.push(format!(
            "Optimized total size: {}",
            format_file_size(summary.stats.optimized_bytes)
        ));
        lines.push(format!(
            "Size reduction: {:.1}%",
            summary.stats.reduction_percent
        ));
        lines.push(format!("Files created: {}", summary.stats.files_created));
    }

    lines
}

/// Folder analysis report: totals, breakdowns, the five largest files.
pub fn format_analysis(analysis: &FolderAnalysis) -> Vec<String> {
    let mut lines = vec![
        "=== Image Analysis ===".to_string(),
        format!("Total files: {}", analysis.total_files),
        format!("Total size: {}", format_file_size(analysis.total_size)),
        String::new(),
        "--- Format Breakdown ---".to_string(),
    ];

    for (format, stats) in &analysis.format_breakdown {
        lines.push(format!(
            "{format}: {} files ({})",
            stats.count,
            format_file_size(stats.size)
        ));
    }

    lines.push(String::new());
    lines.push("--- Size Breakdown ---".to_string());
    lines.push(format!(
        "Small (< 500KB): {} files",
        analysis.size_breakdown.small
    ));
    lines.push(format!(
        "Medium (500KB-1MB): {} files",
        analysis.size_breakdown.medium
    ));
    lines.push(format!(
        "Large (> 1MB): {} files",
        analysis.size_breakdown.large
    ));

    if !analysis.files.is_empty() {
        lines.push(String::new());
        lines.push("--- Largest Files ---".to_string());
        for file in analysis.files.iter().take(5) {
            lines.push(format!(
                "{}: {}",
                file.path.display(),
                format_file_size(file.size)
            ));
        }
    }

    lines
}

/// Recommendation block shown after analysis when large files exist.
pub fn format_recommendations(analysis: &FolderAnalysis, folder: &Path) -> Vec<String> {
    if analysis.size_breakdown.large == 0 {
        return Vec::new();
    }
    vec![
        String::new(),
        "--- Recommendations ---".to_string(),
        format!(
            "Found {} large files (>1MB)",
            analysis.size_breakdown.large
        ),
        "Consider optimizing these files for better web performance".to_string(),
        format!("Run: image-optimizer batch --dry-run {}", folder.display()),
    ]
}

pub fn print_optimize_result(result: &ProcessingResult, backup_folder: &Path) {
    for line in format_optimize_result(result, backup_folder) {
        println!("{line}");
    }
}

pub fn print_summary(summary: &BatchSummary) {
    for line in format_summary(summary) {
        println!("{line}");
    }
}

pub fn print_analysis(analysis: &FolderAnalysis, folder: &Path) {
    for line in format_analysis(analysis) {
        println!("{line}");
    }
    for line in format_recommendations(analysis, folder) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{FileInfo, FormatStats, SizeBuckets};
    use crate::imaging::{ContentType, OutputFormat};
    use crate::processor::{OutputArtifact, StatsSnapshot};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[test]
    fn file_sizes_format_like_the_originals() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1048576), "1.0 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
    }

    fn sample_result() -> ProcessingResult {
        ProcessingResult {
            original_path: PathBuf::from("/photos/hero.jpg"),
            original_size: 2048,
            content_type: ContentType::Photo,
            outputs: vec![OutputArtifact {
                path: PathBuf::from("/photos/hero_400px/hero.jpg"),
                dimensions: (400, 300),
                format: OutputFormat::Jpeg,
                file_size: 1024,
            }],
            backup_created: true,
            error: None,
        }
    }

    #[test]
    fn optimize_report_lists_artifacts() {
        let lines = format_optimize_result(&sample_result(), Path::new(".backup"));
        assert_eq!(lines[0], "Processed: /photos/hero.jpg");
        assert_eq!(lines[1], "Detected as: photo");
        assert_eq!(lines[2], "Original size: 2.0 KB");
        assert_eq!(lines[3], "Backup created: .backup");
        assert!(lines.contains(&"Generated 1 output files:".to_string()));
        assert!(
            lines
                .iter()
                .any(|l| l.contains("hero_400px/hero.jpg (400x300, JPEG, 1.0 KB)"))
        );
    }

    #[test]
    fn optimize_report_skips_backup_line_when_absent() {
        let mut result = sample_result();
        result.backup_created = false;
        let lines = format_optimize_result(&result, Path::new(".backup"));
        assert!(!lines.iter().any(|l| l.starts_with("Backup created")));
    }

    #[test]
    fn batch_event_lines() {
        let ok = BatchEvent {
            path: PathBuf::from("a.jpg"),
            outputs: 6,
            error: None,
        };
        assert_eq!(format_batch_event(&ok), "  a.jpg: 6 files");

        let failed = BatchEvent {
            path: PathBuf::from("b.jpg"),
            outputs: 0,
            error: Some("failed to decode b.jpg: bad marker".to_string()),
        };
        assert_eq!(
            format_batch_event(&failed),
            "  b.jpg: Error: failed to decode b.jpg: bad marker"
        );
    }

    #[test]
    fn summary_includes_optimization_block_only_with_successes() {
        let stats = StatsSnapshot {
            processed: 2,
            original_bytes: 1000,
            optimized_bytes: 500,
            files_created: 8,
            reduction_percent: 50.0,
        };
        let summary = BatchSummary {
            processed: 2,
            errors: 1,
            total_files: 3,
            stats,
        };
        let lines = format_summary(&summary);
        assert!(lines.contains(&"Files processed: 2".to_string()));
        assert!(lines.contains(&"Size reduction: 50.0%".to_string()));

        let empty = BatchSummary {
            processed: 0,
            errors: 0,
            total_files: 0,
            stats: StatsSnapshot {
                processed: 0,
                original_bytes: 0,
                optimized_bytes: 0,
                files_created: 0,
                reduction_percent: 0.0,
            },
        };
        let lines = format_summary(&empty);
        assert!(!lines.iter().any(|l| l.contains("Size Optimization")));
    }

    fn sample_analysis(large: usize) -> FolderAnalysis {
        let mut format_breakdown = BTreeMap::new();
        format_breakdown.insert(
            ".jpg".to_string(),
            FormatStats {
                count: 2,
                size: 3072,
            },
        );
        FolderAnalysis {
            total_files: 2,
            total_size: 3072,
            format_breakdown,
            size_breakdown: SizeBuckets {
                small: 2 - large,
                medium: 0,
                large,
            },
            files: vec![
                FileInfo {
                    path: PathBuf::from("big.jpg"),
                    size: 2048,
                    format: ".jpg".to_string(),
                },
                FileInfo {
                    path: PathBuf::from("small.jpg"),
                    size: 1024,
                    format: ".jpg".to_string(),
                },
            ],
        }
    }

    #[test]
    fn analysis_report_sections() {
        let lines = format_analysis(&sample_analysis(0));
        assert_eq!(lines[0], "=== Image Analysis ===");
        assert!(lines.contains(&"Total files: 2".to_string()));
        assert!(lines.contains(&".jpg: 2 files (3.0 KB)".to_string()));
        assert!(lines.contains(&"Small (< 500KB): 2 files".to_string()));
        assert!(lines.contains(&"big.jpg: 2.0 KB".to_string()));
    }

    #[test]
    fn recommendations_only_for_large_files() {
        let none = format_recommendations(&sample_analysis(0), Path::new("photos"));
        assert!(none.is_empty());

        let some = format_recommendations(&sample_analysis(1), Path::new("photos"));
        assert!(some.contains(&"Found 1 large files (>1MB)".to_string()));
        assert!(
            some.contains(&"Run: image-optimizer batch --dry-run photos".to_string())
        );
    }
}
