//! Contact-angle estimation
//!
//! Vector-average heuristic: the secondary object is resampled into a buffer
//! twice the primary's size, and the offsets of every opaque, non-excluded
//! pixel from buffer center are accumulated. The result approximates the
//! direction of the secondary's opaque mass as seen from the primary's
//! frame. It is not a silhouette-tangent computation.

use crate::color::ExclusionRules;
use crate::foundation::math::{self, Rect, Vec2};
use crate::raster::{sample_alpha, sample_blue, sample_green, sample_red, Surface};
use crate::resolve::ResolvedTransform;
use crate::scene::VisualObject;

/// Estimate the contact angle of `secondary` relative to the primary object
///
/// `primary_bounds` is the primary's resolved bounding box; the secondary is
/// drawn into a buffer of twice its ceiling-rounded dimensions, translated
/// by the primary's half-extents so the sweep has margin on every side. A
/// pixel contributes when its alpha strictly exceeds `alpha_threshold` and
/// no exclusion rule matches it. Returns `-atan2(sum_dy, sum_dx)` in
/// radians; an empty accumulation yields `-0.0`.
pub fn estimate_angle<O: VisualObject>(
    secondary: &O,
    secondary_resolved: &ResolvedTransform,
    primary_bounds: &Rect,
    alpha_threshold: u8,
    rules: &ExclusionRules,
) -> f32 {
    let (width, height) = primary_bounds.ceil_size();
    let buffer_width = width * 2;
    let buffer_height = height * 2;

    let mut matrix = secondary_resolved.draw_matrix(primary_bounds.origin());
    math::translate_by(
        &mut matrix,
        primary_bounds.width / 2.0,
        primary_bounds.height / 2.0,
    );

    let mut surface = Surface::new(buffer_width, buffer_height);
    surface.draw(secondary, &matrix, &secondary.color_transform());
    let samples = surface.samples();

    let center_x = (buffer_width / 2) as f32;
    let center_y = (buffer_height / 2) as f32;
    let mut sum = Vec2::zeros();
    let mut contributors = 0u32;

    for (index, &sample) in samples.iter().enumerate() {
        let alpha = sample_alpha(sample);
        if alpha <= alpha_threshold {
            continue;
        }
        if rules.excludes(
            alpha,
            sample_red(sample),
            sample_green(sample),
            sample_blue(sample),
        ) {
            continue;
        }
        let row = (index as u32 / buffer_width) as f32;
        let column = (index as u32 % buffer_width) as f32;
        sum.x += column - center_x;
        sum.y += center_y - row;
        contributors += 1;
    }

    log::trace!(
        "angle estimate over {buffer_width}x{buffer_height} buffer: {contributors} contributing pixel(s)"
    );
    -f32::atan2(sum.y, sum.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use crate::scene::{Sprite, VisualObject};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn fixture(secondary_x: f32, secondary_y: f32) -> f32 {
        let stage = Sprite::stage();
        let primary = Sprite::solid(10, 10, [255, 255, 255, 255]);
        let secondary = Sprite::solid(4, 4, [0, 0, 255, 255]);
        stage.add_child(&primary);
        stage.add_child(&secondary);
        primary.set_position(20.0, 20.0);
        secondary.set_position(secondary_x, secondary_y);

        let resolved_primary = resolve(&primary);
        let resolved_secondary = resolve(&secondary);
        estimate_angle(
            &secondary,
            &resolved_secondary,
            &resolved_primary.bounds,
            0,
            &ExclusionRules::new(),
        )
    }

    #[test]
    fn test_mass_to_the_right_is_angle_zero() {
        // Secondary centered vertically on the primary, displaced +x
        let angle = fixture(28.0, 23.0);
        assert_relative_eq!(angle, 0.0, epsilon = 0.15);
    }

    #[test]
    fn test_mass_below_is_positive_quarter_turn() {
        // Screen-down displacement: rows grow, dy goes negative
        let angle = fixture(23.0, 28.0);
        assert_relative_eq!(angle, FRAC_PI_2, epsilon = 0.15);
    }

    #[test]
    fn test_mass_above_is_negative_quarter_turn() {
        let angle = fixture(23.0, 16.0);
        assert_relative_eq!(angle, -FRAC_PI_2, epsilon = 0.15);
    }
}
