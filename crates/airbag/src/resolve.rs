//! Transform resolution
//!
//! Composes an object's local-to-top-ancestor transform by walking its
//! parent chain, computes its bounds in that shared space and captures the
//! global registration point used to anchor rasterization.

use crate::foundation::math::{self, Mat3, Point2, Rect, Vec2};
use crate::scene::VisualObject;

/// An object's transform and bounds resolved against its ancestor chain
#[derive(Debug, Clone)]
pub struct ResolvedTransform {
    matrix: Mat3,
    /// Bounds in the top-most ancestor's coordinate space, adjusted by that
    /// ancestor's own position when the object is not itself the top
    pub bounds: Rect,
    /// Registration point (local origin) in global coordinates
    pub global_origin: Point2,
}

impl ResolvedTransform {
    /// Matrix placing the object's content at a buffer whose top-left corner
    /// sits at `target_origin`
    ///
    /// The resolved translation is overwritten with
    /// `global_origin - target_origin`, so drawing through the result starts
    /// exactly at the buffer origin.
    pub fn draw_matrix(&self, target_origin: Point2) -> Mat3 {
        let mut matrix = self.matrix;
        math::set_translation(
            &mut matrix,
            self.global_origin.x - target_origin.x,
            self.global_origin.y - target_origin.y,
        );
        matrix
    }

    /// Buffer-local offset of the registration point for `target_origin`
    ///
    /// This is the translation [`draw_matrix`](Self::draw_matrix) applies;
    /// the comparator subtracts it to map buffer pixels back to local space.
    pub fn draw_offset(&self, target_origin: Point2) -> Vec2 {
        Vec2::new(
            self.global_origin.x - target_origin.x,
            self.global_origin.y - target_origin.y,
        )
    }
}

/// Resolve `object` against its ancestor chain
///
/// The returned matrix concatenates the object's local transform with every
/// ancestor's local transform walking up the parent chain; an absent local
/// transform stands for the identity.
pub fn resolve<O: VisualObject>(object: &O) -> ResolvedTransform {
    let mut matrix = object.local_transform().unwrap_or_else(Mat3::identity);
    let chain = object.ancestor_chain();
    for ancestor in &chain {
        matrix = ancestor.local_transform().unwrap_or_else(Mat3::identity) * matrix;
    }

    let top = chain.last();
    let bounds = match top {
        Some(top) => {
            let mut bounds = object.bounds_in_space(Some(top));
            // The top-level ancestor's own position offsets the shared frame
            if let Some(transform) = top.local_transform() {
                let offset = math::translation_of(&transform);
                bounds = bounds.translated(offset.x, offset.y);
            }
            bounds
        }
        // A parentless object is its own top-level ancestor
        None => object.bounds_in_space(Some(object)),
    };

    let global_origin = object.local_to_global(Point2::origin());

    ResolvedTransform {
        matrix,
        bounds,
        global_origin,
    }
}
