//! Pixel comparison
//!
//! Lockstep scan of two aligned RGBA sample buffers deciding pixel-level
//! overlap under an alpha threshold and the session's color-exclusion rules.

use crate::color::ExclusionRules;
use crate::foundation::math::{Point2, Vec2};
use crate::raster::{sample_alpha, sample_blue, sample_green, sample_red};

/// Outcome of comparing two aligned pixel buffers
#[derive(Debug, Clone, Default)]
pub struct Overlap {
    /// True when at least one pixel pair passed the threshold and rules
    pub overlapping: bool,
    /// Contributing pixels in global coordinates, buffer scan order;
    /// `None` when collection was not requested
    pub points: Option<Vec<Point2>>,
}

/// Coordinate conversion context for overlap-point collection
pub struct CollectContext<'a> {
    /// Translation the primary's draw matrix applied during rasterization
    pub draw_offset: Vec2,
    /// Primary-local to global conversion
    pub to_global: &'a dyn Fn(Point2) -> Point2,
}

/// Compare two equal-size, row-major sample buffers
///
/// A pixel contributes to overlap when both alphas are at least
/// `alpha_threshold` and neither sample fully matches any exclusion rule.
/// With `collect` set, each contributing pixel's buffer-local coordinate is
/// converted to the primary object's local space by subtracting the draw
/// offset, then to global coordinates, and appended in scan order
/// (row-major, left to right, top to bottom). Without it the scan stops at
/// the first contributing pixel.
///
/// Buffers of unequal length terminate the scan at the shorter one; an
/// under-read at the end of a buffer is normal loop termination, not an
/// error.
pub fn compare_buffers(
    first: &[u32],
    second: &[u32],
    width: u32,
    alpha_threshold: u8,
    rules: &ExclusionRules,
    collect: Option<&CollectContext<'_>>,
) -> Overlap {
    let mut overlap = Overlap {
        overlapping: false,
        points: collect.map(|_| Vec::new()),
    };
    if width == 0 {
        return overlap;
    }

    for (index, (&sample1, &sample2)) in first.iter().zip(second).enumerate() {
        let alpha1 = sample_alpha(sample1);
        let alpha2 = sample_alpha(sample2);
        if alpha1 < alpha_threshold || alpha2 < alpha_threshold {
            continue;
        }
        if rules.excludes(alpha1, sample_red(sample1), sample_green(sample1), sample_blue(sample1))
            || rules.excludes(alpha2, sample_red(sample2), sample_green(sample2), sample_blue(sample2))
        {
            continue;
        }

        overlap.overlapping = true;
        let Some(context) = collect else {
            // Boolean-only query: first hit decides
            break;
        };

        let x = (index as u32 % width) as f32;
        let y = (index as u32 / width) as f32;
        let local = Point2::new(x - context.draw_offset.x, y - context.draw_offset.y);
        if let Some(points) = overlap.points.as_mut() {
            points.push((context.to_global)(local));
        }
    }

    overlap
}
