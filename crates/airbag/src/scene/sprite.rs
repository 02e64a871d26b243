//! Raster-backed scene nodes
//!
//! A minimal concrete scene graph: enough to place transformed,
//! color-filtered raster content on a stage and run detection without a host
//! framework. `Sprite` handles are cheaply cloneable and share the
//! underlying node.

use std::cell::RefCell;
use std::path::Path;
use std::rc::{Rc, Weak};

use image::RgbaImage;

use crate::foundation::math::{self, Mat3, Point2, Rect};
use crate::raster::Surface;

use super::{AntialiasGuard, ColorTransform, ObjectId, VisualObject};

struct SpriteData {
    image: RgbaImage,
    transform: Mat3,
    color_transform: ColorTransform,
    visible: bool,
    antialias: bool,
    is_stage: bool,
    parent: Option<Weak<RefCell<SpriteData>>>,
    children: Vec<Sprite>,
}

/// Shared handle to a raster scene node
#[derive(Clone)]
pub struct Sprite {
    inner: Rc<RefCell<SpriteData>>,
}

impl Sprite {
    fn from_data(data: SpriteData) -> Self {
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    /// Create a sprite from RGBA raster content
    pub fn new(image: RgbaImage) -> Self {
        Self::from_data(SpriteData {
            image,
            transform: Mat3::identity(),
            color_transform: ColorTransform::identity(),
            visible: true,
            antialias: false,
            is_stage: false,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Create a solid-color rectangular sprite
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(color)))
    }

    /// Load sprite content from an image file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let path_ref = path.as_ref();
        log::debug!("loading sprite content from {:?}", path_ref);
        let img = image::open(path_ref)?;
        let rgba = img.to_rgba8();
        log::info!(
            "loaded sprite {}x{} from {:?}",
            rgba.width(),
            rgba.height(),
            path_ref
        );
        Ok(Self::new(rgba))
    }

    /// Create a stage root; descendants of a stage count as "on stage"
    pub fn stage() -> Self {
        Self::from_data(SpriteData {
            image: RgbaImage::new(0, 0),
            transform: Mat3::identity(),
            color_transform: ColorTransform::identity(),
            visible: true,
            antialias: false,
            is_stage: true,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Attach `child` to this node, detaching it from any previous parent
    pub fn add_child(&self, child: &Sprite) {
        if let Some(old_parent) = child.parent() {
            old_parent.remove_child(child);
        }
        child.inner.borrow_mut().parent = Some(Rc::downgrade(&self.inner));
        self.inner.borrow_mut().children.push(child.clone());
    }

    /// Detach `child` from this node; a no-op when it is not a child
    pub fn remove_child(&self, child: &Sprite) {
        let mut data = self.inner.borrow_mut();
        data.children.retain(|c| !Rc::ptr_eq(&c.inner, &child.inner));
        drop(data);
        let mut child_data = child.inner.borrow_mut();
        if let Some(parent) = &child_data.parent {
            if parent.ptr_eq(&Rc::downgrade(&self.inner)) {
                child_data.parent = None;
            }
        }
    }

    /// Set the translation components of the local transform
    pub fn set_position(&self, x: f32, y: f32) {
        math::set_translation(&mut self.inner.borrow_mut().transform, x, y);
    }

    /// Replace the local transform
    pub fn set_transform(&self, transform: Mat3) {
        self.inner.borrow_mut().transform = transform;
    }

    /// Replace the color adjustment
    pub fn set_color_transform(&self, color_transform: ColorTransform) {
        self.inner.borrow_mut().color_transform = color_transform;
    }

    /// Set the visibility flag
    pub fn set_visible(&self, visible: bool) {
        self.inner.borrow_mut().visible = visible;
    }

    /// Enable anti-aliased rendering, as a text-like object would use
    pub fn set_antialias(&self, antialias: bool) {
        self.inner.borrow_mut().antialias = antialias;
    }

    /// Current anti-alias state
    pub fn antialias(&self) -> bool {
        self.inner.borrow().antialias
    }

    /// Matrix mapping this node's local space into `ancestor`'s space
    /// (global space when `None`)
    fn matrix_to_ancestor(&self, ancestor: Option<&Sprite>) -> Mat3 {
        if let Some(a) = ancestor {
            if a.id() == self.id() {
                return Mat3::identity();
            }
        }
        let mut matrix = self.inner.borrow().transform;
        let mut current = self.parent();
        while let Some(node) = current {
            if let Some(a) = ancestor {
                if node.id() == a.id() {
                    return matrix;
                }
            }
            matrix = node.inner.borrow().transform * matrix;
            current = node.parent();
        }
        matrix
    }

    fn content_rect(&self) -> Rect {
        let data = self.inner.borrow();
        Rect::new(0.0, 0.0, data.image.width() as f32, data.image.height() as f32)
    }
}

impl PartialEq for Sprite {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Sprite")
            .field("id", &self.id())
            .field("size", &(data.image.width(), data.image.height()))
            .field("visible", &data.visible)
            .field("is_stage", &data.is_stage)
            .finish()
    }
}

impl VisualObject for Sprite {
    fn id(&self) -> ObjectId {
        ObjectId(Rc::as_ptr(&self.inner) as *const () as usize)
    }

    fn parent(&self) -> Option<Self> {
        self.inner
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Sprite { inner })
    }

    fn is_on_stage(&self) -> bool {
        let mut current = self.clone();
        loop {
            match current.parent() {
                Some(parent) => current = parent,
                None => return current.inner.borrow().is_stage,
            }
        }
    }

    fn visible(&self) -> bool {
        self.inner.borrow().visible
    }

    fn width(&self) -> f32 {
        let parent = self.parent();
        self.bounds_in_space(parent.as_ref()).width
    }

    fn height(&self) -> f32 {
        let parent = self.parent();
        self.bounds_in_space(parent.as_ref()).height
    }

    fn local_transform(&self) -> Option<Mat3> {
        Some(self.inner.borrow().transform)
    }

    fn color_transform(&self) -> ColorTransform {
        self.inner.borrow().color_transform
    }

    fn local_to_global(&self, point: Point2) -> Point2 {
        self.matrix_to_ancestor(None).transform_point(&point)
    }

    fn bounds_in_space(&self, ancestor: Option<&Self>) -> Rect {
        let matrix = self.matrix_to_ancestor(ancestor);
        self.content_rect().transformed(&matrix)
    }

    fn draw_into(&self, surface: &mut Surface, transform: &Mat3, color_transform: &ColorTransform) {
        let data = self.inner.borrow();
        surface.draw_image(&data.image, transform, color_transform, data.antialias);
    }

    fn antialias_override(&self) -> Option<AntialiasGuard> {
        {
            let mut data = self.inner.borrow_mut();
            if !data.antialias {
                return None;
            }
            data.antialias = false;
        }
        let inner = Rc::clone(&self.inner);
        Some(AntialiasGuard::new(move || {
            inner.borrow_mut().antialias = true;
        }))
    }
}
