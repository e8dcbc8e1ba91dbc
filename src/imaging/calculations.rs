//! Pure calculation functions for output dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use std::collections::BTreeMap;

/// Calculate output dimensions for each requested target width.
///
/// Aspect ratio is preserved and images are never upscaled: a target at or
/// above the original width maps to the original dimensions unchanged.
/// Heights are truncated, not rounded (`floor(target / aspect)`).
///
/// Duplicate targets collapse, since the result is keyed by target width. An
/// empty `targets` slice yields an empty map; callers supply the default
/// size list when none was given.
///
/// # Examples
/// ```
/// # use image_optimizer::imaging::plan_output_sizes;
/// let sizes = plan_output_sizes((2000, 1500), &[800]);
/// assert_eq!(sizes[&800], (800, 600));
///
/// // Target larger than the original: no upscaling.
/// let sizes = plan_output_sizes((500, 400), &[800]);
/// assert_eq!(sizes[&800], (500, 400));
/// ```
pub fn plan_output_sizes(original: (u32, u32), targets: &[u32]) -> BTreeMap<u32, (u32, u32)> {
    let (width, height) = original;
    let aspect_ratio = width as f64 / height as f64;

    let mut output_sizes = BTreeMap::new();

    for &target in targets {
        if target < width {
            let new_height = (target as f64 / aspect_ratio) as u32;
            output_sizes.insert(target, (target, new_height));
        } else {
            output_sizes.insert(target, (width, height));
        }
    }

    output_sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downscales_preserving_aspect_ratio() {
        let sizes = plan_output_sizes((2000, 1500), &[400, 800, 1200]);
        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes[&400], (400, 300));
        assert_eq!(sizes[&800], (800, 600));
        assert_eq!(sizes[&1200], (1200, 900));
    }

    #[test]
    fn never_upscales() {
        // 1000 wide original: targets at or above 1000 keep original dims.
        let sizes = plan_output_sizes((1000, 800), &[800, 1000, 1400, 2080]);
        assert_eq!(sizes[&800], (800, 640));
        assert_eq!(sizes[&1000], (1000, 800));
        assert_eq!(sizes[&1400], (1000, 800));
        assert_eq!(sizes[&2080], (1000, 800));
    }

    #[test]
    fn heights_are_truncated_not_rounded() {
        // 1000x667: aspect 1.49925..., 400 / aspect = 266.8 → 266
        let sizes = plan_output_sizes((1000, 667), &[400]);
        assert_eq!(sizes[&400], (400, 266));

        // 3000x2000: 700 / 1.5 = 466.66 → 466
        let sizes = plan_output_sizes((3000, 2000), &[700]);
        assert_eq!(sizes[&700], (700, 466));
    }

    #[test]
    fn portrait_originals() {
        let sizes = plan_output_sizes((1500, 2000), &[750]);
        assert_eq!(sizes[&750], (750, 1000));
    }

    #[test]
    fn duplicate_targets_collapse() {
        let sizes = plan_output_sizes((2000, 1500), &[800, 800, 400, 800]);
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[&400], (400, 300));
        assert_eq!(sizes[&800], (800, 600));
    }

    #[test]
    fn empty_targets_yield_empty_plan() {
        let sizes = plan_output_sizes((2000, 1500), &[]);
        assert!(sizes.is_empty());
    }

    #[test]
    fn target_equal_to_width_keeps_original() {
        let sizes = plan_output_sizes((800, 600), &[800]);
        assert_eq!(sizes[&800], (800, 600));
    }
}
