//! Math utilities and types
//!
//! Provides the 2D math the collision core works in: affine transforms as
//! homogeneous 3x3 matrices, and axis-aligned rectangles for bounds.

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 homogeneous matrix type for 2D affine transforms
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Create a pure translation transform
pub fn translation(x: f32, y: f32) -> Mat3 {
    Mat3::new_translation(&Vec2::new(x, y))
}

/// Overwrite the translation components of a transform in place
pub fn set_translation(matrix: &mut Mat3, x: f32, y: f32) {
    matrix[(0, 2)] = x;
    matrix[(1, 2)] = y;
}

/// Add to the translation components of a transform in place
pub fn translate_by(matrix: &mut Mat3, dx: f32, dy: f32) {
    matrix[(0, 2)] += dx;
    matrix[(1, 2)] += dy;
}

/// Read the translation components of a transform
pub fn translation_of(matrix: &Mat3) -> Vec2 {
    Vec2::new(matrix[(0, 2)], matrix[(1, 2)])
}

/// Axis-aligned rectangle in a given coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and extents
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner as a point
    pub fn origin(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Area in square units
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when the rectangle has no extent on either axis
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check whether this rectangle overlaps another
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlapping region of two rectangles, `None` when they do not intersect
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > x && bottom > y {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both rectangles
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// This rectangle shifted by an offset
    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Bounding rectangle of a set of points; the zero rectangle when empty
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Rect {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        let mut any = false;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
            any = true;
        }
        if any {
            Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
        } else {
            Rect::default()
        }
    }

    /// Bounding rectangle of this rectangle's corners mapped through an
    /// affine transform
    pub fn transformed(&self, matrix: &Mat3) -> Rect {
        let corners = [
            Point2::new(self.x, self.y),
            Point2::new(self.right(), self.y),
            Point2::new(self.right(), self.bottom()),
            Point2::new(self.x, self.bottom()),
        ];
        Rect::from_points(corners.iter().map(|c| matrix.transform_point(c)))
    }

    /// Ceiling-rounded pixel dimensions for a raster buffer covering this
    /// rectangle
    pub fn ceil_size(&self) -> (u32, u32) {
        if self.is_empty() {
            return (0, 0);
        }
        (self.width.ceil() as u32, self.height.ceil() as u32)
    }
}
