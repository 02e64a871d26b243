//! Frame-clock plumbing
//!
//! Detection runs once per delivered tick, subject to the session's skip
//! count. [`ManualClock`] is a deterministic serial tick source for tests
//! and for hosts without their own scheduler; hosts with a frame loop can
//! drive [`FrameTicker::on_tick`] directly.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Receiver of frame ticks
pub trait FrameTicker {
    /// Deliver one tick
    fn on_tick(&mut self);
}

/// Handle identifying one clock subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Serial tick source driving subscribed tickers in subscription order
///
/// Subscriptions are held weakly; a dropped subscriber is pruned on the next
/// tick. Ticks are delivered synchronously, so no two subscribers ever run
/// concurrently and a cycle in progress is never interrupted.
#[derive(Default)]
pub struct ManualClock {
    subscribers: Vec<(SubscriptionId, Weak<RefCell<dyn FrameTicker>>)>,
    next_id: u64,
    ticks: u64,
}

impl ManualClock {
    /// Create a clock with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a ticker to future ticks
    pub fn subscribe(&mut self, ticker: Rc<RefCell<dyn FrameTicker>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Rc::downgrade(&ticker)));
        id
    }

    /// Unsubscribe from future ticks; a no-op for unknown ids
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Deliver one tick to every live subscriber
    pub fn tick(&mut self) {
        self.ticks += 1;
        self.subscribers.retain(|(_, weak)| weak.strong_count() > 0);
        for (_, weak) in &self.subscribers {
            if let Some(ticker) = weak.upgrade() {
                ticker.borrow_mut().on_tick();
            }
        }
    }

    /// Total ticks delivered so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        ticks: u32,
    }

    impl FrameTicker for Counter {
        fn on_tick(&mut self) {
            self.ticks += 1;
        }
    }

    #[test]
    fn test_tick_delivery_and_unsubscribe() {
        let mut clock = ManualClock::new();
        let counter = Rc::new(RefCell::new(Counter { ticks: 0 }));
        let id = clock.subscribe(counter.clone());

        clock.tick();
        clock.tick();
        assert_eq!(counter.borrow().ticks, 2);
        assert_eq!(clock.ticks(), 2);

        clock.unsubscribe(id);
        clock.tick();
        assert_eq!(counter.borrow().ticks, 2);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut clock = ManualClock::new();
        {
            let counter = Rc::new(RefCell::new(Counter { ticks: 0 }));
            clock.subscribe(counter.clone());
            assert_eq!(clock.subscriber_count(), 1);
        }
        clock.tick();
        assert_eq!(clock.subscriber_count(), 0);
    }
}
