//! Off-screen raster surfaces
//!
//! The rasterization side of detection: transparent RGBA working buffers,
//! non-smoothed transformed drawing, raw sample readback and the alpha
//! hit-test primitive. Surfaces are allocated per pair check and dropped
//! before the check returns; nothing is retained between cycles, so peak
//! memory stays at a small constant number of buffers.

use image::RgbaImage;

use crate::foundation::math::{Mat3, Point2, Rect};
use crate::scene::{ColorTransform, VisualObject};

/// Extract the alpha channel from an `0xRRGGBBAA` sample word
pub const fn sample_alpha(sample: u32) -> u8 {
    (sample & 0xFF) as u8
}

/// Extract the red channel from an `0xRRGGBBAA` sample word
pub const fn sample_red(sample: u32) -> u8 {
    (sample >> 24) as u8
}

/// Extract the green channel from an `0xRRGGBBAA` sample word
pub const fn sample_green(sample: u32) -> u8 {
    ((sample >> 16) & 0xFF) as u8
}

/// Extract the blue channel from an `0xRRGGBBAA` sample word
pub const fn sample_blue(sample: u32) -> u8 {
    ((sample >> 8) & 0xFF) as u8
}

/// Off-screen RGBA buffer scoped to one pair check
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Allocate a fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Buffer width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Buffer height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Draw a visual object through `transform` with smoothing disabled
    pub fn draw<O: VisualObject>(
        &mut self,
        object: &O,
        transform: &Mat3,
        color_transform: &ColorTransform,
    ) {
        log::trace!(
            "drawing object into {}x{} surface",
            self.width(),
            self.height()
        );
        object.draw_into(self, transform, color_transform);
    }

    /// Blit transformed RGBA content into this surface
    ///
    /// Source pixels are sampled nearest-neighbour (never interpolated) by
    /// inverse-mapping each covered target pixel, then color-adjusted and
    /// composited source-over. `antialias` box-filters a 2x2 supersample per
    /// target pixel, the crate's stand-in for host-side anti-aliased
    /// rendering of text-like content.
    pub fn draw_image(
        &mut self,
        source: &RgbaImage,
        transform: &Mat3,
        color_transform: &ColorTransform,
        antialias: bool,
    ) {
        let Some(inverse) = transform.try_inverse() else {
            // Degenerate transform (zero scale) covers no pixels
            return;
        };

        let source_rect = Rect::new(0.0, 0.0, source.width() as f32, source.height() as f32);
        let covered = source_rect.transformed(transform);
        let x0 = covered.x.floor().max(0.0) as u32;
        let y0 = covered.y.floor().max(0.0) as u32;
        let x1 = (covered.right().ceil().max(0.0) as u32).min(self.width());
        let y1 = (covered.bottom().ceil().max(0.0) as u32).min(self.height());

        for y in y0..y1 {
            for x in x0..x1 {
                let sample = if antialias {
                    supersample(source, &inverse, x, y)
                } else {
                    sample_nearest(source, &inverse, x as f32 + 0.5, y as f32 + 0.5)
                };
                let Some(rgba) = sample else { continue };
                if rgba[3] == 0 {
                    continue;
                }
                let adjusted = color_transform.apply(rgba);
                let dst = self.image.get_pixel_mut(x, y);
                dst.0 = composite_over(dst.0, adjusted);
            }
        }
    }

    /// Raw RGBA-ordered sample words, row-major
    pub fn samples(&self) -> Vec<u32> {
        let quads: &[[u8; 4]] = bytemuck::cast_slice(self.image.as_raw());
        quads.iter().map(|q| u32::from_be_bytes(*q)).collect()
    }

    /// Read one RGBA pixel
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Alpha-threshold hit test between two aligned, equal-size surfaces
    ///
    /// True when any pixel position is at least as opaque as the per-side
    /// threshold on both surfaces.
    pub fn hit_test(first: &Surface, second: &Surface, threshold_first: u8, threshold_second: u8) -> bool {
        debug_assert_eq!(
            (first.width(), first.height()),
            (second.width(), second.height()),
        );
        first
            .image
            .pixels()
            .zip(second.image.pixels())
            .any(|(a, b)| a.0[3] >= threshold_first && b.0[3] >= threshold_second)
    }
}

/// Nearest-neighbour source sample at a target-space position
fn sample_nearest(source: &RgbaImage, inverse: &Mat3, x: f32, y: f32) -> Option<[u8; 4]> {
    let local = inverse.transform_point(&Point2::new(x, y));
    let sx = local.x.floor();
    let sy = local.y.floor();
    if sx < 0.0 || sy < 0.0 || sx >= source.width() as f32 || sy >= source.height() as f32 {
        return None;
    }
    Some(source.get_pixel(sx as u32, sy as u32).0)
}

/// Box-filtered 2x2 supersample of the source for one target pixel
fn supersample(source: &RgbaImage, inverse: &Mat3, x: u32, y: u32) -> Option<[u8; 4]> {
    let offsets = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];
    let mut accum = [0u32; 4];
    for (dx, dy) in offsets {
        let rgba = sample_nearest(source, inverse, x as f32 + dx, y as f32 + dy)
            .unwrap_or([0, 0, 0, 0]);
        for (total, value) in accum.iter_mut().zip(rgba) {
            *total += u32::from(value);
        }
    }
    if accum[3] == 0 {
        return None;
    }
    Some([
        (accum[0] / 4) as u8,
        (accum[1] / 4) as u8,
        (accum[2] / 4) as u8,
        (accum[3] / 4) as u8,
    ])
}

/// Source-over compositing of straight-alpha RGBA samples
fn composite_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let src_a = u32::from(src[3]);
    if src_a == 255 || dst[3] == 0 {
        return src;
    }
    let dst_a = u32::from(dst[3]);
    let blended_dst_a = dst_a * (255 - src_a) / 255;
    let out_a = src_a + blended_dst_a;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }
    let blend = |s: u8, d: u8| -> u8 {
        ((u32::from(s) * src_a + u32::from(d) * blended_dst_a) / out_a) as u8
    };
    [
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        out_a as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::translation;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba(color))
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = Surface::new(3, 2);
        assert!(surface.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_identity_draw_copies_pixels() {
        let mut surface = Surface::new(4, 4);
        let source = solid(2, 2, [10, 20, 30, 255]);
        surface.draw_image(
            &source,
            &Mat3::identity(),
            &ColorTransform::identity(),
            false,
        );
        assert_eq!(surface.pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(surface.pixel(1, 1), [10, 20, 30, 255]);
        // Outside the source footprint stays transparent
        assert_eq!(surface.pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_translated_draw() {
        let mut surface = Surface::new(4, 4);
        let source = solid(2, 2, [0, 0, 0, 255]);
        surface.draw_image(
            &source,
            &translation(2.0, 1.0),
            &ColorTransform::identity(),
            false,
        );
        assert_eq!(surface.pixel(0, 0)[3], 0);
        assert_eq!(surface.pixel(2, 1)[3], 255);
        assert_eq!(surface.pixel(3, 2)[3], 255);
    }

    #[test]
    fn test_color_transform_applied_at_draw() {
        let mut surface = Surface::new(1, 1);
        let source = solid(1, 1, [100, 100, 100, 255]);
        let ct = ColorTransform {
            red_multiplier: 0.5,
            green_offset: 55.0,
            ..ColorTransform::identity()
        };
        surface.draw_image(&source, &Mat3::identity(), &ct, false);
        assert_eq!(surface.pixel(0, 0), [50, 155, 100, 255]);
    }

    #[test]
    fn test_sample_word_layout() {
        let mut surface = Surface::new(1, 1);
        let source = solid(1, 1, [0x11, 0x22, 0x33, 0x44]);
        surface.draw_image(
            &source,
            &Mat3::identity(),
            &ColorTransform::identity(),
            false,
        );
        let word = surface.samples()[0];
        assert_eq!(word, 0x1122_3344);
        assert_eq!(sample_red(word), 0x11);
        assert_eq!(sample_green(word), 0x22);
        assert_eq!(sample_blue(word), 0x33);
        assert_eq!(sample_alpha(word), 0x44);
    }

    #[test]
    fn test_hit_test() {
        let mut a = Surface::new(3, 1);
        let mut b = Surface::new(3, 1);
        a.draw_image(
            &solid(2, 1, [0, 0, 0, 255]),
            &Mat3::identity(),
            &ColorTransform::identity(),
            false,
        );
        b.draw_image(
            &solid(2, 1, [0, 0, 0, 255]),
            &translation(1.0, 0.0),
            &ColorTransform::identity(),
            false,
        );
        // Opaque columns are {0,1} and {1,2}: they share column 1
        assert!(Surface::hit_test(&a, &b, 255, 255));

        let empty = Surface::new(3, 1);
        assert!(!Surface::hit_test(&a, &empty, 1, 1));
    }
}
