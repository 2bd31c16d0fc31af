//! `EventQueue` — sparse per-tick scheduled-event queue.
//!
//! Events for the same tick keep their insertion order, which is the
//! execution order.  `BTreeMap` keys the buckets by tick, so draining the
//! due bucket and peeking the next scheduled tick are both O(log W) where
//! W is the number of distinct future ticks — tiny for scenario files.

use std::collections::BTreeMap;

use tsim_events::Event;
use tsim_model::Tick;

/// A priority-queue mapping simulation ticks → events due at that tick.
#[derive(Default)]
pub struct EventQueue {
    inner: BTreeMap<Tick, Vec<Event>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event at its own tick, after everything already
    /// scheduled there.
    pub fn push(&mut self, event: Event) {
        self.inner.entry(event.time()).or_default().push(event);
        self.total += 1;
    }

    /// Remove and return all events due at exactly `tick`, in insertion
    /// order.
    ///
    /// Returns `None` if nothing is due (the common case — avoids
    /// allocation).
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<Event>> {
        let events = self.inner.remove(&tick)?;
        self.total -= events.len();
        Some(events)
    }

    /// The earliest tick with at least one scheduled event.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Snapshot of every event scheduled at `tick` or later, in
    /// (tick ascending, insertion) order.  Feeds listener updates.
    pub fn pending_from(&self, tick: Tick) -> Vec<Event> {
        self.inner
            .range(tick..)
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect()
    }

    /// Total number of scheduled events across all future ticks.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }
}
