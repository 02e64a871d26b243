//! Detection orchestration
//!
//! [`AirBag`] owns the detection list and drives the per-cycle pipeline:
//! candidate pairing with bounding-box pre-filtering, rasterization into
//! per-pair buffers, pixel comparison and optional angle or overlap-point
//! extraction. Cycles are synchronous and run to completion before control
//! returns; buffers live only for the pair check that allocated them.

mod config;

pub use config::{ConfigError, DetectorConfig, ExclusionEntry};

use crate::angle::estimate_angle;
use crate::clock::FrameTicker;
use crate::color::{ColorExclusionRule, ExclusionRules};
use crate::compare::{compare_buffers, CollectContext};
use crate::error::CollisionError;
use crate::events::{CollisionListener, ListenerSet};
use crate::foundation::math::Point2;
use crate::raster::Surface;
use crate::resolve::resolve;
use crate::scene::VisualObject;

/// Pairing strategy for a detection session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every unordered pair in the detection list is a candidate
    #[default]
    ManyToMany,
    /// The single target is paired against every other list member
    OneToMany,
}

/// One detected pixel-level overlap
#[derive(Debug, Clone)]
pub struct Collision<O: VisualObject> {
    /// The colliding pair; the single target, if any, comes first
    pub pair: (O, O),
    /// Contact angle in radians; `None` unless angle calculation is enabled
    pub angle: Option<f32>,
    /// Overlapping pixels in global coordinates, in buffer scan order;
    /// `None` unless overlap collection is enabled
    pub overlapping_points: Option<Vec<Point2>>,
}

/// Conversion for the list-mutation surface
///
/// Accepts a single object, a flat collection or a list of lists, mirroring
/// the forms hosts tend to hold sprite groups in.
pub trait IntoObjects<O> {
    /// Flatten into a list of objects
    fn into_objects(self) -> Vec<O>;
}

impl<O: VisualObject> IntoObjects<O> for O {
    fn into_objects(self) -> Vec<O> {
        vec![self]
    }
}

impl<O: VisualObject> IntoObjects<O> for Vec<O> {
    fn into_objects(self) -> Vec<O> {
        self
    }
}

impl<O: VisualObject> IntoObjects<O> for &[O] {
    fn into_objects(self) -> Vec<O> {
        self.to_vec()
    }
}

impl<O: VisualObject, const N: usize> IntoObjects<O> for [O; N] {
    fn into_objects(self) -> Vec<O> {
        self.into_iter().collect()
    }
}

impl<O: VisualObject> IntoObjects<O> for Vec<Vec<O>> {
    fn into_objects(self) -> Vec<O> {
        self.into_iter().flatten().collect()
    }
}

/// Pixel-accurate collision detection session
///
/// A session starts in [`Mode::ManyToMany`]; assigning a single target
/// prepends it to the detection list and switches to [`Mode::OneToMany`]
/// until the target is cleared again.
pub struct AirBag<O: VisualObject> {
    objects: Vec<O>,
    mode: Mode,
    alpha_threshold: f32,
    calculate_angles: bool,
    calculate_overlap: bool,
    ignore_parentless: bool,
    ignore_invisibles: bool,
    skip: u32,
    skip_counter: u32,
    rules: ExclusionRules,
    listeners: ListenerSet<O>,
    active: bool,
}

impl<O: VisualObject> Default for AirBag<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: VisualObject> AirBag<O> {
    /// Create an empty many-to-many session
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            mode: Mode::ManyToMany,
            alpha_threshold: 0.0,
            calculate_angles: false,
            calculate_overlap: false,
            ignore_parentless: false,
            ignore_invisibles: false,
            skip: 0,
            skip_counter: 0,
            rules: ExclusionRules::new(),
            listeners: ListenerSet::default(),
            active: true,
        }
    }

    /// Create a session seeded with an initial object set
    pub fn with_objects(objects: impl IntoObjects<O>) -> Self {
        let mut session = Self::new();
        session.add(objects);
        session
    }

    /// Create a session from a validated configuration and an initial set
    pub fn from_config(
        config: &DetectorConfig,
        objects: impl IntoObjects<O>,
    ) -> Result<Self, CollisionError> {
        let mut session = Self::with_objects(objects);
        session.apply_config(config)?;
        Ok(session)
    }

    /// Apply a configuration onto this session
    ///
    /// Validation runs first; an invalid configuration leaves the session
    /// untouched.
    pub fn apply_config(&mut self, config: &DetectorConfig) -> Result<(), CollisionError> {
        config.validate()?;
        self.alpha_threshold = config.alpha_threshold;
        self.calculate_angles = config.calculate_angles;
        self.calculate_overlap = config.calculate_overlap;
        self.ignore_parentless = config.ignore_parentless;
        self.ignore_invisibles = config.ignore_invisibles;
        self.set_skip(config.skip);
        for entry in &config.exclusions {
            self.rules.add(ColorExclusionRule::from(*entry));
        }
        Ok(())
    }

    /// Add objects to the detection list
    pub fn add(&mut self, objects: impl IntoObjects<O>) {
        let mut objects = objects.into_objects();
        log::debug!("adding {} object(s) to detection list", objects.len());
        self.objects.append(&mut objects);
    }

    /// Remove an object from the detection list
    ///
    /// In one-to-many mode the single target at index 0 is never a removal
    /// candidate; clear it with [`set_single_target`](Self::set_single_target)
    /// instead.
    pub fn remove(&mut self, object: &O) -> Result<(), CollisionError> {
        let start = match self.mode {
            Mode::OneToMany => 1,
            Mode::ManyToMany => 0,
        };
        match self
            .objects
            .iter()
            .skip(start)
            .position(|o| o.id() == object.id())
        {
            Some(offset) => {
                self.objects.remove(start + offset);
                Ok(())
            }
            None => Err(CollisionError::ObjectNotFound),
        }
    }

    /// Remove several objects; fails when any is absent
    ///
    /// All-or-nothing: a failed call leaves the detection list unchanged.
    pub fn remove_all(&mut self, objects: impl IntoObjects<O>) -> Result<(), CollisionError> {
        let start = match self.mode {
            Mode::OneToMany => 1,
            Mode::ManyToMany => 0,
        };
        let mut remaining = self.objects.clone();
        for object in objects.into_objects() {
            match remaining
                .iter()
                .skip(start)
                .position(|o| o.id() == object.id())
            {
                Some(offset) => {
                    remaining.remove(start + offset);
                }
                None => return Err(CollisionError::ObjectNotFound),
            }
        }
        self.objects = remaining;
        Ok(())
    }

    /// Drop every object, including any single target, reverting to
    /// many-to-many mode
    pub fn clear(&mut self) {
        self.objects.clear();
        self.mode = Mode::ManyToMany;
    }

    /// Number of objects in the detection list (the single target included)
    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    /// Current pairing mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The designated single target, if any
    pub fn single_target(&self) -> Option<O> {
        match self.mode {
            Mode::OneToMany => self.objects.first().cloned(),
            Mode::ManyToMany => None,
        }
    }

    /// Assign or clear the single target
    ///
    /// Assigning prepends the target to the detection list and enters
    /// one-to-many mode; assigning `None` removes it again and reverts to
    /// many-to-many.
    pub fn set_single_target(&mut self, target: Option<O>) {
        match (self.mode, target) {
            (Mode::OneToMany, Some(target)) => {
                self.objects[0] = target;
            }
            (Mode::ManyToMany, Some(target)) => {
                self.objects.insert(0, target);
                self.mode = Mode::OneToMany;
            }
            (Mode::OneToMany, None) => {
                self.objects.remove(0);
                self.mode = Mode::ManyToMany;
            }
            (Mode::ManyToMany, None) => {}
        }
    }

    /// Minimum opacity (0-1) a pixel needs on both sides to collide
    pub fn alpha_threshold(&self) -> f32 {
        self.alpha_threshold
    }

    /// Set the alpha threshold; the previous value is retained on error
    pub fn set_alpha_threshold(&mut self, threshold: f32) -> Result<(), CollisionError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CollisionError::AlphaThresholdOutOfRange(threshold));
        }
        self.alpha_threshold = threshold;
        Ok(())
    }

    /// Whether collisions carry a contact angle
    pub fn calculate_angles(&self) -> bool {
        self.calculate_angles
    }

    /// Enable or disable contact-angle calculation
    pub fn set_calculate_angles(&mut self, enabled: bool) {
        self.calculate_angles = enabled;
    }

    /// Whether collisions carry the overlapping-point list
    pub fn calculate_overlap(&self) -> bool {
        self.calculate_overlap
    }

    /// Enable or disable overlap-point collection
    pub fn set_calculate_overlap(&mut self, enabled: bool) {
        self.calculate_overlap = enabled;
    }

    /// Whether objects without a containing stage are ignored
    pub fn ignore_parentless(&self) -> bool {
        self.ignore_parentless
    }

    /// Set the parentless-object policy
    pub fn set_ignore_parentless(&mut self, enabled: bool) {
        self.ignore_parentless = enabled;
    }

    /// Whether invisible objects are ignored
    pub fn ignore_invisibles(&self) -> bool {
        self.ignore_invisibles
    }

    /// Set the invisible-object policy
    pub fn set_ignore_invisibles(&mut self, enabled: bool) {
        self.ignore_invisibles = enabled;
    }

    /// Ticks skipped between detection cycles
    pub fn skip(&self) -> u32 {
        self.skip
    }

    /// Set the frame-skip count; resets the internal tick counter
    pub fn set_skip(&mut self, skip: u32) {
        self.skip = skip;
        self.skip_counter = 0;
    }

    /// Exclude a color with the default tolerances (alpha 255, colors 20)
    ///
    /// Silently ignored when the color is already excluded.
    pub fn add_color_to_exclusion_list(&mut self, color: u32) {
        self.rules.add(ColorExclusionRule::with_defaults(color));
    }

    /// Exclude a color with explicit per-channel tolerances
    pub fn add_color_to_exclusion_list_with_ranges(
        &mut self,
        color: u32,
        alpha_range: u8,
        red_range: u8,
        green_range: u8,
        blue_range: u8,
    ) {
        self.rules.add(ColorExclusionRule::new(
            color,
            alpha_range,
            red_range,
            green_range,
            blue_range,
        ));
    }

    /// Stop excluding a color; errors when it was never excluded
    pub fn remove_color_from_exclusion_list(&mut self, color: u32) -> Result<(), CollisionError> {
        self.rules.remove(color)
    }

    /// The session's exclusion rules
    pub fn exclusion_rules(&self) -> &ExclusionRules {
        &self.rules
    }

    /// Register a listener for per-cycle notifications
    pub fn add_listener(&mut self, listener: Box<dyn CollisionListener<O>>) {
        self.listeners.add(listener);
    }

    /// Number of registered listeners
    pub fn num_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Resume running detection on delivered ticks
    pub fn start(&mut self) {
        self.active = true;
    }

    /// Stop running detection on future ticks
    ///
    /// A cycle already in progress is never interrupted; cycles are
    /// synchronous, so by the time this can run no cycle is under way.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Whether ticks currently trigger detection
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Release session resources: objects, rules and listeners
    ///
    /// Raster buffers are scoped to individual pair checks and never held by
    /// the session, so there is nothing further to free.
    pub fn dispose(&mut self) {
        self.stop();
        self.clear();
        self.rules.clear();
        self.listeners.clear();
    }

    /// Run one detection cycle and return the collisions found, in
    /// candidate-scan order
    ///
    /// In one-to-many mode the single target's preconditions are checked
    /// once up front: a target off the stage while `ignore_parentless` is
    /// enabled, or invisible while `ignore_invisibles` is enabled, aborts
    /// the cycle with an error. On the many side a failing object is
    /// skipped. In many-to-many mode a failing object terminates the scan
    /// it appears in rather than being skipped: on the inner scan it
    /// truncates the remainder of that scan, and in the outer position it
    /// ends the cycle's remaining enumeration entirely; this preserves the
    /// behavior of the system this detector is compatible with.
    ///
    /// Dispatches the detection-performed notification after every cycle
    /// and the collision notification when the result list is non-empty.
    pub fn detect(&mut self) -> Result<Vec<Collision<O>>, CollisionError> {
        let threshold = (self.alpha_threshold * 255.0).round() as u8;
        let mut collisions = Vec::new();

        match self.mode {
            Mode::OneToMany => {
                if let Some(target) = self.objects.first().cloned() {
                    if self.ignore_parentless && !target.is_on_stage() {
                        return Err(CollisionError::TargetOffStage);
                    }
                    if self.ignore_invisibles && !target.visible() {
                        return Err(CollisionError::TargetInvisible);
                    }
                    for candidate in &self.objects[1..] {
                        if self.ignore_parentless && !candidate.is_on_stage() {
                            log::trace!("skipping off-stage candidate");
                            continue;
                        }
                        if self.ignore_invisibles && !candidate.visible() {
                            log::trace!("skipping invisible candidate");
                            continue;
                        }
                        if let Some(collision) = self.evaluate_pair(&target, candidate, threshold)
                        {
                            collisions.push(collision);
                        }
                    }
                }
            }
            Mode::ManyToMany => {
                let count = self.objects.len();
                for i in 0..count.saturating_sub(1) {
                    let first = &self.objects[i];
                    // A failing object ends the enumeration instead of being
                    // skipped; kept for compatibility (see contract)
                    if self.ignore_parentless && !first.is_on_stage() {
                        break;
                    }
                    if self.ignore_invisibles && !first.visible() {
                        break;
                    }
                    for second in &self.objects[i + 1..] {
                        // A failing object ends this scan instead of being
                        // skipped; kept for compatibility (see contract)
                        if self.ignore_parentless && !second.is_on_stage() {
                            break;
                        }
                        if self.ignore_invisibles && !second.visible() {
                            break;
                        }
                        if let Some(collision) = self.evaluate_pair(first, second, threshold) {
                            collisions.push(collision);
                        }
                    }
                }
            }
        }

        log::debug!(
            "detection cycle: {} object(s), {} collision(s)",
            self.objects.len(),
            collisions.len()
        );
        self.listeners.dispatch(&collisions);
        Ok(collisions)
    }

    /// Alias for [`detect`](Self::detect)
    pub fn check_collisions(&mut self) -> Result<Vec<Collision<O>>, CollisionError> {
        self.detect()
    }

    /// Evaluate one candidate pair; `None` when the pair does not collide
    fn evaluate_pair(&self, first: &O, second: &O, threshold: u8) -> Option<Collision<O>> {
        let resolved_first = resolve(first);
        let resolved_second = resolve(second);

        // Broad phase: disjoint bounding boxes cost nothing further
        let intersection = resolved_first.bounds.intersection(&resolved_second.bounds)?;

        // Draw the geometrically larger object second; a performance
        // convention, not a correctness requirement
        let swap = first.width() * first.height() > second.width() * second.height();
        let (primary, secondary, resolved_primary, resolved_secondary) = if swap {
            (second, first, &resolved_second, &resolved_first)
        } else {
            (first, second, &resolved_first, &resolved_second)
        };

        let detailed = self.calculate_angles || self.calculate_overlap;
        if !detailed {
            let (width, height) = intersection.ceil_size();
            if width == 0 || height == 0 {
                return None;
            }
            let origin = intersection.origin();
            let mut surface_primary = Surface::new(width, height);
            surface_primary.draw(
                primary,
                &resolved_primary.draw_matrix(origin),
                &primary.color_transform(),
            );
            let mut surface_secondary = Surface::new(width, height);
            surface_secondary.draw(
                secondary,
                &resolved_secondary.draw_matrix(origin),
                &secondary.color_transform(),
            );

            let overlapping = if self.rules.is_empty() {
                Surface::hit_test(&surface_primary, &surface_secondary, threshold, threshold)
            } else {
                compare_buffers(
                    &surface_primary.samples(),
                    &surface_secondary.samples(),
                    width,
                    threshold,
                    &self.rules,
                    None,
                )
                .overlapping
            };
            return overlapping.then(|| Collision {
                pair: (first.clone(), second.clone()),
                angle: None,
                overlapping_points: None,
            });
        }

        // Detailed path: the buffer covers the primary's full bounds so the
        // angle estimator and overlap points see the whole local pixel grid
        let bounds = resolved_primary.bounds;
        let (width, height) = bounds.ceil_size();
        if width == 0 || height == 0 {
            return None;
        }
        let origin = bounds.origin();

        // Text-like objects render crisp while pixels are sampled; the
        // guards restore their state on every exit path below
        let _antialias_primary = primary.antialias_override();
        let _antialias_secondary = secondary.antialias_override();

        let mut surface_primary = Surface::new(width, height);
        surface_primary.draw(
            primary,
            &resolved_primary.draw_matrix(origin),
            &primary.color_transform(),
        );
        let mut surface_secondary = Surface::new(width, height);
        surface_secondary.draw(
            secondary,
            &resolved_secondary.draw_matrix(origin),
            &secondary.color_transform(),
        );

        let to_global = |point: Point2| primary.local_to_global(point);
        let context = CollectContext {
            draw_offset: resolved_primary.draw_offset(origin),
            to_global: &to_global,
        };
        let overlap = compare_buffers(
            &surface_primary.samples(),
            &surface_secondary.samples(),
            width,
            threshold,
            &self.rules,
            self.calculate_overlap.then_some(&context),
        );
        if !overlap.overlapping {
            return None;
        }

        let angle = self.calculate_angles.then(|| {
            estimate_angle(secondary, resolved_secondary, &bounds, threshold, &self.rules)
        });

        Some(Collision {
            pair: (first.clone(), second.clone()),
            angle,
            overlapping_points: overlap.points,
        })
    }
}

impl<O: VisualObject> FrameTicker for AirBag<O> {
    /// Run detection when the skip counter elapses; a failed cycle is
    /// logged and the next tick tries again independently
    fn on_tick(&mut self) {
        if !self.active {
            return;
        }
        if self.skip_counter < self.skip {
            self.skip_counter += 1;
            return;
        }
        self.skip_counter = 0;
        if let Err(error) = self.detect() {
            log::warn!("detection cycle aborted: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Sprite;

    fn staged_sprite(x: f32, y: f32, size: u32) -> (Sprite, Sprite) {
        let stage = Sprite::stage();
        let sprite = Sprite::solid(size, size, [255, 255, 255, 255]);
        stage.add_child(&sprite);
        sprite.set_position(x, y);
        (stage, sprite)
    }

    #[test]
    fn test_mode_transitions() {
        let (_s1, a) = staged_sprite(0.0, 0.0, 4);
        let (_s2, b) = staged_sprite(100.0, 0.0, 4);
        let (_s3, target) = staged_sprite(50.0, 0.0, 4);

        let mut session = AirBag::with_objects(vec![a, b]);
        assert_eq!(session.mode(), Mode::ManyToMany);
        assert_eq!(session.num_objects(), 2);

        session.set_single_target(Some(target.clone()));
        assert_eq!(session.mode(), Mode::OneToMany);
        assert_eq!(session.num_objects(), 3);
        assert_eq!(session.single_target().unwrap().id(), target.id());

        session.set_single_target(None);
        assert_eq!(session.mode(), Mode::ManyToMany);
        assert_eq!(session.num_objects(), 2);
        assert!(session.single_target().is_none());
    }

    #[test]
    fn test_remove_not_found() {
        let (_s1, a) = staged_sprite(0.0, 0.0, 4);
        let (_s2, b) = staged_sprite(10.0, 0.0, 4);

        let mut session = AirBag::with_objects(a);
        assert_eq!(session.remove(&b), Err(CollisionError::ObjectNotFound));
        assert_eq!(session.num_objects(), 1);
    }

    #[test]
    fn test_single_target_not_a_removal_candidate() {
        let (_s1, target) = staged_sprite(0.0, 0.0, 4);
        let (_s2, member) = staged_sprite(10.0, 0.0, 4);

        let mut session = AirBag::with_objects(member);
        session.set_single_target(Some(target.clone()));
        // The target sits at index 0 but removal never matches it there
        assert_eq!(session.remove(&target), Err(CollisionError::ObjectNotFound));
        assert_eq!(session.num_objects(), 2);
    }

    #[test]
    fn test_alpha_threshold_range_check() {
        let mut session: AirBag<Sprite> = AirBag::new();
        session.set_alpha_threshold(0.5).unwrap();

        let err = session.set_alpha_threshold(1.5).unwrap_err();
        assert_eq!(err, CollisionError::AlphaThresholdOutOfRange(1.5));
        assert_eq!(session.alpha_threshold(), 0.5);

        let err = session.set_alpha_threshold(-0.1).unwrap_err();
        assert_eq!(err, CollisionError::AlphaThresholdOutOfRange(-0.1));
        assert_eq!(session.alpha_threshold(), 0.5);
    }

    #[test]
    fn test_target_precondition_errors() {
        let off_stage = Sprite::solid(4, 4, [255, 255, 255, 255]);
        let (_stage, member) = staged_sprite(0.0, 0.0, 4);

        let mut session = AirBag::with_objects(member.clone());
        session.set_single_target(Some(off_stage));
        session.set_ignore_parentless(true);
        assert_eq!(session.detect().unwrap_err(), CollisionError::TargetOffStage);

        let (_stage2, hidden) = staged_sprite(0.0, 0.0, 4);
        hidden.set_visible(false);
        session.set_single_target(Some(hidden));
        session.set_ignore_parentless(false);
        session.set_ignore_invisibles(true);
        assert_eq!(session.detect().unwrap_err(), CollisionError::TargetInvisible);
    }

    #[test]
    fn test_many_to_many_inner_scan_truncates() {
        let stage = Sprite::stage();
        let make = |x: f32| {
            let sprite = Sprite::solid(4, 4, [255, 255, 255, 255]);
            stage.add_child(&sprite);
            sprite.set_position(x, 0.0);
            sprite
        };
        // a overlaps both b and c; b is invisible and sits between them in
        // the list, so the inner scan for a ends before reaching c
        let a = make(0.0);
        let b = make(2.0);
        let c = make(3.0);
        b.set_visible(false);

        let mut session = AirBag::with_objects(vec![a, b, c]);
        session.set_ignore_invisibles(true);
        let collisions = session.detect().unwrap();
        assert!(collisions.is_empty());
    }

    #[test]
    fn test_many_to_many_outer_scan_failing_object_ends_cycle() {
        let stage = Sprite::stage();
        let make = |x: f32| {
            let sprite = Sprite::solid(4, 4, [255, 255, 255, 255]);
            stage.add_child(&sprite);
            sprite.set_position(x, 0.0);
            sprite
        };
        // The invisible object leads the list: the outer scan ends at it, so
        // the overlapping pair behind it is never evaluated
        let leading = make(50.0);
        let a = make(0.0);
        let b = make(2.0);
        leading.set_visible(false);

        let mut session = AirBag::with_objects(vec![leading, a, b]);
        session.set_ignore_invisibles(true);
        let collisions = session.detect().unwrap();
        assert!(collisions.is_empty());
    }

    #[test]
    fn test_remove_all_is_all_or_nothing() {
        let (_s1, a) = staged_sprite(0.0, 0.0, 4);
        let (_s2, b) = staged_sprite(10.0, 0.0, 4);
        let (_s3, absent) = staged_sprite(20.0, 0.0, 4);

        let mut session = AirBag::with_objects(vec![a.clone(), b.clone()]);
        let err = session.remove_all(vec![a.clone(), absent]).unwrap_err();
        assert_eq!(err, CollisionError::ObjectNotFound);
        // The failed call removed nothing
        assert_eq!(session.num_objects(), 2);

        session.remove_all(vec![a, b]).unwrap();
        assert_eq!(session.num_objects(), 0);
    }

    #[test]
    fn test_skip_counter_via_ticks() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Recorder {
            cycles: Rc<RefCell<u32>>,
        }
        impl CollisionListener<Sprite> for Recorder {
            fn on_detection(&mut self, _collisions: &[Collision<Sprite>]) {
                *self.cycles.borrow_mut() += 1;
            }
        }

        let cycles = Rc::new(RefCell::new(0));
        let mut session: AirBag<Sprite> = AirBag::new();
        session.add_listener(Box::new(Recorder {
            cycles: Rc::clone(&cycles),
        }));
        session.set_skip(2);

        for _ in 0..6 {
            session.on_tick();
        }
        // Detection runs every third tick
        assert_eq!(*cycles.borrow(), 2);

        session.stop();
        session.on_tick();
        assert_eq!(*cycles.borrow(), 2);
    }

    #[test]
    fn test_dispose_releases_state() {
        let (_stage, a) = staged_sprite(0.0, 0.0, 4);
        let mut session = AirBag::with_objects(a);
        session.add_color_to_exclusion_list(0xFF00FF00);

        session.dispose();
        assert_eq!(session.num_objects(), 0);
        assert!(session.exclusion_rules().is_empty());
        assert!(!session.is_active());
    }
}
