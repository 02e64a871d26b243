//! Collision notifications
//!
//! Synchronous listener dispatch in registration order. Every detection
//! cycle produces a detection-performed notification carrying all collisions
//! found (possibly empty); a collision notification follows only when the
//! cycle found at least one.

use crate::detector::Collision;
use crate::scene::VisualObject;

/// Receiver for per-cycle detection notifications
pub trait CollisionListener<O: VisualObject> {
    /// Called after every detection cycle with all collisions found
    fn on_detection(&mut self, collisions: &[Collision<O>]);

    /// Called only when a cycle found at least one collision
    fn on_collision(&mut self, _collisions: &[Collision<O>]) {}
}

/// Registered listeners for one detection session
pub(crate) struct ListenerSet<O: VisualObject> {
    listeners: Vec<Box<dyn CollisionListener<O>>>,
}

impl<O: VisualObject> Default for ListenerSet<O> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<O: VisualObject> ListenerSet<O> {
    pub fn add(&mut self, listener: Box<dyn CollisionListener<O>>) {
        self.listeners.push(listener);
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver the per-cycle notifications for `collisions`
    pub fn dispatch(&mut self, collisions: &[Collision<O>]) {
        for listener in &mut self.listeners {
            listener.on_detection(collisions);
        }
        if collisions.is_empty() {
            return;
        }
        for listener in &mut self.listeners {
            listener.on_collision(collisions);
        }
    }
}
