//! Listener contract for simulator notifications.
//!
//! Listeners observe the kernel, they never steer it: every callback
//! receives shared references only.  Delivery is inline by default; a
//! graphical shell can supply a dispatch hook
//! ([`TrafficSimulator::set_dispatch_hook`][crate::TrafficSimulator::set_dispatch_hook])
//! to marshal delivery onto its UI thread.  The kernel is never mid-tick
//! while a callback runs.

use tsim_events::Event;
use tsim_model::{RoadMap, Tick};

use crate::error::SimulatorError;

/// Which notification is being delivered.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UpdateKind {
    /// Sent once to a listener as it is added.
    Registered,
    /// The simulator was reset to an empty map at tick 0.
    Reset,
    /// An event was scheduled.
    NewEvent,
    /// A tick completed.
    Advanced,
    /// A tick failed; the paired [`SimulatorError`] says why.
    Error,
}

/// Snapshot handed to every listener callback.
pub struct UpdateEvent<'a> {
    kind: UpdateKind,
    time: Tick,
    road_map: &'a RoadMap,
    /// Events still scheduled (`time ≥ current tick`), in scheduled order.
    pending: &'a [Event],
}

impl<'a> UpdateEvent<'a> {
    pub(crate) fn new(
        kind: UpdateKind,
        time: Tick,
        road_map: &'a RoadMap,
        pending: &'a [Event],
    ) -> Self {
        Self { kind, time, road_map, pending }
    }

    pub fn kind(&self) -> UpdateKind {
        self.kind
    }

    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn road_map(&self) -> &RoadMap {
        self.road_map
    }

    pub fn pending_events(&self) -> &[Event] {
        self.pending
    }
}

/// Callbacks invoked by [`TrafficSimulator`][crate::TrafficSimulator] at
/// the simulation's state transitions.
///
/// All methods have default no-op implementations so implementors only
/// need to override what they care about.  Listeners are invoked in
/// registration order.
pub trait SimulatorListener {
    /// Called once, as this listener is added.
    fn registered(&mut self, _update: &UpdateEvent<'_>) {}

    /// Called after `reset` cleared the simulator.
    fn reset(&mut self, _update: &UpdateEvent<'_>) {}

    /// Called after an event was scheduled via `add_event`.
    fn new_event(&mut self, _update: &UpdateEvent<'_>) {}

    /// Called after each completed tick.
    fn advanced(&mut self, _update: &UpdateEvent<'_>) {}

    /// Called when a tick fails; the run stops after delivery.
    fn error(&mut self, _update: &UpdateEvent<'_>, _error: &SimulatorError) {}
}

/// Handle returned by `add_listener`, used to remove the listener later.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(pub(crate) u32);

/// Caller-supplied "invoke on the UI thread" hook.  The kernel hands it a
/// closure performing one notification round; the hook decides where to
/// run it.
pub type DispatchHook = Box<dyn FnMut(&mut dyn FnMut())>;

pub(crate) fn dispatch_one(
    listener: &mut dyn SimulatorListener,
    update: &UpdateEvent<'_>,
    error: Option<&SimulatorError>,
) {
    match update.kind() {
        UpdateKind::Registered => listener.registered(update),
        UpdateKind::Reset => listener.reset(update),
        UpdateKind::NewEvent => listener.new_event(update),
        UpdateKind::Advanced => listener.advanced(update),
        UpdateKind::Error => {
            if let Some(err) = error {
                listener.error(update, err);
            }
        }
    }
}
