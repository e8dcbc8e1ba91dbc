//! # Image Optimizer
//!
//! Responsive image variants for static-site publishing. Point it at a file
//! or a folder of source images and it produces resized copies (and WebP
//! versions) for each configured display width, backs the originals up, and
//! reports how many bytes the variants save.
//!
//! # Pipeline
//!
//! Every file goes through the same single-file pipeline:
//!
//! ```text
//! validate → backup → decode → orientation fix → size planning
//!          → classify → encode (JPEG, WebP) → stats
//! ```
//!
//! Batch runs fan that pipeline out across a bounded worker pool, with
//! per-file failure isolation: one corrupt image becomes one error-tagged
//! result and the rest of the folder still processes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Primitives: size planning, EXIF orientation, content classification, encoders |
//! | [`processor`] | Single-file pipeline, backup policy, running statistics |
//! | [`batch`] | Folder discovery, worker pool, failure isolation, analysis |
//! | [`config`] | Default sizes, quality table, supported formats |
//! | [`output`] | CLI report formatting, pure `format_*` functions |
//!
//! # Design Decisions
//!
//! ## Orientation First
//!
//! EXIF orientation is applied to the pixels before any dimension math, so
//! the planner works with the image as a viewer sees it. Outputs carry no
//! EXIF at all; the corrected pixels are the only orientation record, which
//! sidesteps the classic double-rotation bug in browsers that honor the tag.
//!
//! ## Never Upscale
//!
//! A target width at or above the original maps to the original dimensions.
//! Upscaling adds bytes and blur; the variant directory for that width still
//! exists so templates can reference every configured breakpoint uniformly.
//!
//! ## Quality By Content, Not By File
//!
//! Photos tolerate aggressive JPEG compression; screenshots and graphics
//! show artifacts at the same settings. A small heuristic (declared format,
//! transparency, pixel contrast) picks a row in a fixed quality table. The
//! heuristic is best-effort by policy: any ambiguity degrades to the photo
//! row rather than failing the file.
//!
//! ## Deterministic Output Layout
//!
//! `dir/name.ext` at width 800 becomes `dir/name_800px/name.jpg` (plus
//! `name.webp`). Downstream templating depends on this exact layout, so it
//! is covered by tests rather than left as a convention.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;
pub mod processor;
