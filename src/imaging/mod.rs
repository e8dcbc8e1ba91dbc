//! Image primitives: dimension math, orientation, classification, encoding.
//!
//! The module is split into:
//! - **Calculations**: pure functions for output-size planning (unit testable)
//! - **Orientation**: EXIF orientation read + pixel transform
//! - **Classify**: content-type heuristic driving quality selection
//! - **Encode**: resize + format-specific encoders and the output path scheme

pub mod calculations;
pub mod classify;
pub mod encode;
pub mod orientation;

pub use calculations::plan_output_sizes;
pub use classify::{classify, ContentType};
pub use encode::{encode_variant, variant_path, EncodeError, OutputFormat};
pub use orientation::{read_orientation, Orientation};
