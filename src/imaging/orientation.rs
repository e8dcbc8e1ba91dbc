//! EXIF orientation correction.
//!
//! Cameras store sensor data as shot and record the display transform in
//! EXIF tag 0x0112. We apply that transform to the pixels once, up front, so
//! every later stage (size planning, encoding) sees the image as the viewer
//! would. Outputs never carry orientation metadata: the encoders write no
//! EXIF at all, so the corrected pixels are the only source of truth.
//!
//! Reading the tag is best-effort. A missing, unreadable, or malformed EXIF
//! block means "upright", never an error.
//!
//! The correction table below is expressed in the `image` crate's convention
//! (`rotate90` = 90° clockwise). The non-180° codes (5-8) swap width and
//! height.

use image::DynamicImage;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The eight EXIF orientation values, named after the standard's
/// row/column positions (value 1 = row 0 at top, column 0 at left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// 1: upright, no transform.
    TopLeft,
    /// 2: mirrored horizontally.
    TopRight,
    /// 3: rotated 180°.
    BottomRight,
    /// 4: rotated 180° and mirrored horizontally.
    BottomLeft,
    /// 5: rotated 90° counter-clockwise and mirrored horizontally.
    LeftTop,
    /// 6: shot with the camera rotated 90° clockwise.
    RightTop,
    /// 7: rotated 90° clockwise and mirrored horizontally.
    RightBottom,
    /// 8: shot with the camera rotated 90° counter-clockwise.
    LeftBottom,
}

impl Orientation {
    /// Map a raw EXIF orientation value to a transform.
    ///
    /// Values outside 1–8 (including 0 and garbage) are treated as upright.
    pub fn from_code(code: u32) -> Self {
        match code {
            2 => Orientation::TopRight,
            3 => Orientation::BottomRight,
            4 => Orientation::BottomLeft,
            5 => Orientation::LeftTop,
            6 => Orientation::RightTop,
            7 => Orientation::RightBottom,
            8 => Orientation::LeftBottom,
            _ => Orientation::TopLeft,
        }
    }

    /// The raw EXIF code (1–8) for this orientation.
    pub fn code(self) -> u32 {
        match self {
            Orientation::TopLeft => 1,
            Orientation::TopRight => 2,
            Orientation::BottomRight => 3,
            Orientation::BottomLeft => 4,
            Orientation::LeftTop => 5,
            Orientation::RightTop => 6,
            Orientation::RightBottom => 7,
            Orientation::LeftBottom => 8,
        }
    }

    /// Whether applying this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::LeftTop
                | Orientation::RightTop
                | Orientation::RightBottom
                | Orientation::LeftBottom
        )
    }

    /// Apply the correction so the pixel data matches visual intent.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::TopLeft => img,
            Orientation::TopRight => img.fliph(),
            Orientation::BottomRight => img.rotate180(),
            Orientation::BottomLeft => img.rotate180().fliph(),
            Orientation::LeftTop => img.rotate270().fliph(),
            Orientation::RightTop => img.rotate90(),
            Orientation::RightBottom => img.rotate90().fliph(),
            Orientation::LeftBottom => img.rotate270(),
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::TopLeft
    }
}

/// Read the EXIF orientation tag from an image file.
///
/// Returns [`Orientation::TopLeft`] when the file has no EXIF block, the
/// block is unreadable, or the tag is absent. This never fails the pipeline.
pub fn read_orientation(path: &Path) -> Orientation {
    let Ok(file) = File::open(path) else {
        return Orientation::TopLeft;
    };
    let mut reader = BufReader::new(file);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut reader) else {
        return Orientation::TopLeft;
    };

    let code = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(1);

    Orientation::from_code(code)
}
