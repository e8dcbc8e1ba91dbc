use clap::{Args, Parser, Subcommand};
use image_optimizer::batch::BatchEngine;
use image_optimizer::processor::{ImageProcessor, ProcessOptions};
use image_optimizer::{config, output};
use std::path::PathBuf;

/// Shared flags for commands that encode images.
#[derive(Args, Clone)]
struct EncodeArgs {
    /// Comma-separated list of widths to generate
    #[arg(long, short = 's', default_value = "400,800,1200")]
    sizes: String,

    /// Override quality (0-100)
    #[arg(long, short = 'q', value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: Option<u8>,

    /// Generate WebP versions (default)
    #[arg(long, overrides_with = "no_webp")]
    webp: bool,

    /// Skip WebP versions
    #[arg(long)]
    no_webp: bool,

    /// Show what would be done without making changes
    #[arg(long)]
    dry_run: bool,
}

impl EncodeArgs {
    fn process_options(&self) -> Result<ProcessOptions, String> {
        Ok(ProcessOptions {
            sizes: parse_sizes(&self.sizes)?,
            quality: self.quality,
            generate_webp: self.webp || !self.no_webp,
            dry_run: self.dry_run,
        })
    }
}

/// Shared flags for commands that back up originals.
#[derive(Args, Clone)]
struct BackupArgs {
    /// Backup original files (default)
    #[arg(long, overrides_with = "no_backup")]
    backup: bool,

    /// Skip backing up original files
    #[arg(long)]
    no_backup: bool,

    /// Backup folder name
    #[arg(long, default_value = config::BACKUP_FOLDER)]
    backup_folder: PathBuf,
}

impl BackupArgs {
    fn processor(&self) -> ImageProcessor {
        ImageProcessor::new(self.backup || !self.no_backup, Some(self.backup_folder.clone()))
    }
}

#[derive(Parser)]
#[command(name = "image-optimizer")]
#[command(about = "Responsive image optimizer for static sites")]
#[command(long_about = "\
Responsive image optimizer for static sites

Resizes source images to multiple display widths and generates WebP
versions, preserving originals via backup. For source dir/name.ext and
width W, variants land in dir/name_Wpx/ next to the source.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Optimize a single image file
    Optimize {
        /// Path to the image file
        image_path: PathBuf,
        #[command(flatten)]
        encode: EncodeArgs,
        #[command(flatten)]
        backup: BackupArgs,
    },
    /// Process all images in a folder
    Batch {
        /// Path to the folder containing images
        folder_path: PathBuf,
        #[command(flatten)]
        encode: EncodeArgs,
        #[command(flatten)]
        backup: BackupArgs,
        /// Process subfolders (default)
        #[arg(long, overrides_with = "no_recursive")]
        recursive: bool,
        /// Skip subfolders
        #[arg(long)]
        no_recursive: bool,
        /// Number of parallel workers
        #[arg(long, short = 'w', default_value_t = config::DEFAULT_WORKERS)]
        workers: usize,
    },
    /// Analyze images in a folder without processing
    Analyze {
        /// Path to the folder containing images
        folder_path: PathBuf,
        /// Analyze subfolders (default)
        #[arg(long, overrides_with = "no_recursive")]
        recursive: bool,
        /// Skip subfolders
        #[arg(long)]
        no_recursive: bool,
        /// Emit the analysis as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// Print the version
    Version,
}

fn main() {
    if let Err(error) = run(Cli::parse()) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Optimize {
            image_path,
            encode,
            backup,
        } => {
            let opts = encode.process_options()?;
            if opts.dry_run {
                println!("DRY RUN MODE - No files will be modified\n");
            }

            let processor = backup.processor();
            let result = processor.process_image(&image_path, &opts)?;
            output::print_optimize_result(&result, processor.backup_folder());

            if !opts.dry_run {
                let stats = processor.stats();
                if stats.processed > 0 {
                    println!("\nSize reduction: {:.1}%", stats.reduction_percent);
                }
            }
        }
        Command::Batch {
            folder_path,
            encode,
            backup,
            recursive,
            no_recursive,
            workers,
        } => {
            let recursive = recursive || !no_recursive;
            let opts = encode.process_options()?;
            if opts.dry_run {
                println!("DRY RUN MODE - No files will be modified\n");
            }

            let mut engine = BatchEngine::new(workers, backup.processor());

            // One progress line per completed file, printed off-worker.
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    println!("{}", output::format_batch_event(&event));
                }
            });

            engine.process_folder(&folder_path, recursive, &opts, Some(tx))?;
            printer.join().expect("printer thread panicked");

            output::print_summary(&engine.summary());

            if opts.dry_run {
                println!("\nDRY RUN COMPLETED - No files were modified");
            }
        }
        Command::Analyze {
            folder_path,
            recursive,
            no_recursive,
            json,
        } => {
            let recursive = recursive || !no_recursive;
            let engine = BatchEngine::new(1, ImageProcessor::new(false, None));
            let analysis = engine.analyze_folder(&folder_path, recursive)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                output::print_analysis(&analysis, &folder_path);
            }
        }
        Command::Version => {
            println!("image-optimizer {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Parse a comma-separated width list. Widths must be positive integers.
fn parse_sizes(input: &str) -> Result<Vec<u32>, String> {
    let sizes: Result<Vec<u32>, _> = input
        .split(',')
        .map(|s| s.trim().parse::<u32>())
        .collect();

    match sizes {
        Ok(sizes) if !sizes.is_empty() && !sizes.contains(&0) => Ok(sizes),
        _ => Err("Sizes must be comma-separated positive integers".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sizes_accepts_lists_with_whitespace() {
        assert_eq!(parse_sizes("400,800,1200").unwrap(), vec![400, 800, 1200]);
        assert_eq!(parse_sizes(" 400 , 800 ").unwrap(), vec![400, 800]);
        assert_eq!(parse_sizes("640").unwrap(), vec![640]);
    }

    #[test]
    fn parse_sizes_rejects_garbage() {
        assert!(parse_sizes("").is_err());
        assert!(parse_sizes("abc").is_err());
        assert!(parse_sizes("400,abc").is_err());
        assert!(parse_sizes("400,,800").is_err());
        assert!(parse_sizes("-400").is_err());
        assert!(parse_sizes("0").is_err());
    }

    #[test]
    fn cli_parses_optimize_with_flags() {
        let cli = Cli::try_parse_from([
            "image-optimizer",
            "optimize",
            "photo.jpg",
            "--sizes",
            "320,640",
            "--quality",
            "70",
            "--no-webp",
            "--no-backup",
            "--dry-run",
        ])
        .unwrap();

        let Command::Optimize { encode, .. } = cli.command else {
            panic!("expected optimize command");
        };
        let opts = encode.process_options().unwrap();
        assert_eq!(opts.sizes, vec![320, 640]);
        assert_eq!(opts.quality, Some(70));
        assert!(!opts.generate_webp);
        assert!(opts.dry_run);
    }

    #[test]
    fn cli_rejects_out_of_range_quality() {
        let result = Cli::try_parse_from([
            "image-optimizer",
            "optimize",
            "photo.jpg",
            "--quality",
            "150",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_analyze_accepts_json_flag() {
        let cli =
            Cli::try_parse_from(["image-optimizer", "analyze", "photos", "--json"]).unwrap();
        let Command::Analyze { json, .. } = cli.command else {
            panic!("expected analyze command");
        };
        assert!(json);
    }

    #[test]
    fn cli_batch_defaults() {
        let cli = Cli::try_parse_from(["image-optimizer", "batch", "photos"]).unwrap();
        let Command::Batch {
            encode,
            workers,
            no_recursive,
            ..
        } = cli.command
        else {
            panic!("expected batch command");
        };
        assert_eq!(workers, 4);
        assert!(!no_recursive);
        let opts = encode.process_options().unwrap();
        assert_eq!(opts.sizes, vec![400, 800, 1200]);
        assert!(opts.generate_webp);
        assert!(!opts.dry_run);
    }
}
