//! Scene-object capabilities
//!
//! The collision core never owns the scene graph; it consumes visual objects
//! through the [`VisualObject`] capability trait. Any host scene node that
//! can report its transforms, bounds and visibility, and rasterize itself
//! into a [`Surface`](crate::raster::Surface), can participate in detection.
//! [`Sprite`] is the crate's own minimal implementation.

mod sprite;

pub use sprite::Sprite;

use crate::foundation::math::{Mat3, Point2, Rect};
use crate::raster::Surface;

/// Stable identity of a visual object
///
/// Two handles with the same id refer to the same underlying scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Per-channel linear color adjustment applied while an object renders
///
/// Each output channel is `input * multiplier + offset`, clamped to the
/// 0-255 channel domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransform {
    /// Alpha channel multiplier
    pub alpha_multiplier: f32,
    /// Red channel multiplier
    pub red_multiplier: f32,
    /// Green channel multiplier
    pub green_multiplier: f32,
    /// Blue channel multiplier
    pub blue_multiplier: f32,
    /// Alpha channel offset
    pub alpha_offset: f32,
    /// Red channel offset
    pub red_offset: f32,
    /// Green channel offset
    pub green_offset: f32,
    /// Blue channel offset
    pub blue_offset: f32,
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorTransform {
    /// The identity adjustment: unit multipliers, zero offsets
    pub const fn identity() -> Self {
        Self {
            alpha_multiplier: 1.0,
            red_multiplier: 1.0,
            green_multiplier: 1.0,
            blue_multiplier: 1.0,
            alpha_offset: 0.0,
            red_offset: 0.0,
            green_offset: 0.0,
            blue_offset: 0.0,
        }
    }

    /// True when applying this transform leaves every sample unchanged
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Apply the adjustment to an RGBA sample
    pub fn apply(&self, rgba: [u8; 4]) -> [u8; 4] {
        if self.is_identity() {
            return rgba;
        }
        let channel = |value: u8, multiplier: f32, offset: f32| -> u8 {
            (f32::from(value).mul_add(multiplier, offset)).clamp(0.0, 255.0) as u8
        };
        [
            channel(rgba[0], self.red_multiplier, self.red_offset),
            channel(rgba[1], self.green_multiplier, self.green_offset),
            channel(rgba[2], self.blue_multiplier, self.blue_offset),
            channel(rgba[3], self.alpha_multiplier, self.alpha_offset),
        ]
    }
}

/// Scoped override of an object's anti-alias state
///
/// Returned by [`VisualObject::antialias_override`]; the previous state is
/// restored when the guard drops, on every exit path of the holder.
pub struct AntialiasGuard {
    restore: Option<Box<dyn FnOnce()>>,
}

impl AntialiasGuard {
    /// Wrap a restore action to run when the guard drops
    pub fn new(restore: impl FnOnce() + 'static) -> Self {
        Self {
            restore: Some(Box::new(restore)),
        }
    }
}

impl Drop for AntialiasGuard {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

impl std::fmt::Debug for AntialiasGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AntialiasGuard").finish_non_exhaustive()
    }
}

/// Capability interface the collision core consumes from a scene node
///
/// Implementors are cheap-to-clone handles; the core treats them as
/// read-only apart from the transient anti-alias override. The drawing
/// contract is non-smoothed: `draw_into` must sample without interpolation
/// so alpha edges are deterministic between cycles.
pub trait VisualObject: Clone {
    /// Stable identity of the underlying node
    fn id(&self) -> ObjectId;

    /// Immediate containing object, if any
    fn parent(&self) -> Option<Self>;

    /// Ancestors from the immediate parent up to the top-most object
    fn ancestor_chain(&self) -> Vec<Self> {
        let mut chain = Vec::new();
        let mut current = self.parent();
        while let Some(ancestor) = current {
            current = ancestor.parent();
            chain.push(ancestor);
        }
        chain
    }

    /// True when `other` appears in this object's ancestor chain
    fn has_ancestor(&self, other: &Self) -> bool {
        self.ancestor_chain().iter().any(|a| a.id() == other.id())
    }

    /// True when the object is connected to a stage root
    fn is_on_stage(&self) -> bool;

    /// Visibility flag
    fn visible(&self) -> bool;

    /// Rendered width in the parent's coordinate space
    fn width(&self) -> f32;

    /// Rendered height in the parent's coordinate space
    fn height(&self) -> f32;

    /// Local affine transform; `None` stands for the identity
    fn local_transform(&self) -> Option<Mat3>;

    /// Color adjustment applied when the object renders
    fn color_transform(&self) -> ColorTransform;

    /// Map a point in this object's local space to global coordinates
    fn local_to_global(&self, point: Point2) -> Point2;

    /// Axis-aligned bounds in the coordinate space of `ancestor`
    /// (global space when `None`)
    fn bounds_in_space(&self, ancestor: Option<&Self>) -> Rect;

    /// Rasterize this object into `surface` through `transform`, applying
    /// `color_transform`, with smoothing disabled
    fn draw_into(&self, surface: &mut Surface, transform: &Mat3, color_transform: &ColorTransform);

    /// Temporarily force crisp (non-anti-aliased) rendering
    ///
    /// `None` when the object has no anti-alias state to override; text-like
    /// objects return a guard that restores the previous state on drop.
    fn antialias_override(&self) -> Option<AntialiasGuard> {
        None
    }
}
