//! # airbag
//!
//! Pixel-accurate 2D collision detection for transformed, color-filtered
//! raster objects sharing a coordinate space.
//!
//! ## Features
//!
//! - **Pixel-level overlap**: bounding boxes only pre-filter; contact is
//!   decided per pixel under an alpha threshold
//! - **Affine transforms**: objects carry local transforms composed through
//!   their ancestor chain into a shared frame
//! - **Color exclusion**: tolerance windows mask out colors that should
//!   never trigger a collision
//! - **Contact angles and overlap points**: optional per-collision extras
//! - **Host-agnostic**: any scene node implementing [`VisualObject`] can
//!   participate; [`Sprite`](scene::Sprite) is a ready-made implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use airbag::prelude::*;
//!
//! let stage = Sprite::stage();
//! let player = Sprite::solid(16, 16, [255, 255, 255, 255]);
//! let wall = Sprite::solid(16, 16, [128, 128, 128, 255]);
//! stage.add_child(&player);
//! stage.add_child(&wall);
//! wall.set_position(8.0, 0.0);
//!
//! let mut session = AirBag::with_objects(vec![player, wall]);
//! session.set_alpha_threshold(0.5)?;
//!
//! let collisions = session.detect()?;
//! assert_eq!(collisions.len(), 1);
//! # Ok::<(), airbag::CollisionError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;

pub mod angle;
pub mod clock;
pub mod color;
pub mod compare;
pub mod detector;
pub mod error;
pub mod events;
pub mod raster;
pub mod resolve;
pub mod scene;

pub use detector::{AirBag, Collision, DetectorConfig, IntoObjects, Mode};
pub use error::CollisionError;
pub use scene::{Sprite, VisualObject};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        clock::{FrameTicker, ManualClock},
        color::ColorExclusionRule,
        detector::{AirBag, Collision, DetectorConfig, IntoObjects, Mode},
        error::CollisionError,
        events::CollisionListener,
        foundation::math::{Mat3, Point2, Rect, Vec2},
        scene::{ColorTransform, ObjectId, Sprite, VisualObject},
    };
}
