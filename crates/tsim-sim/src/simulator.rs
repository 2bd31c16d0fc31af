//! `TrafficSimulator` — the tick loop.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tsim_events::Event;
use tsim_model::{RoadMap, Tick};

use crate::error::{SimResult, SimulatorError};
use crate::listener::{dispatch_one, DispatchHook, ListenerId, SimulatorListener, UpdateEvent, UpdateKind};
use crate::multimap::EventQueue;

/// The simulation kernel.
///
/// Owns the scheduled events, the tick counter, and the road map, and
/// drives the per-tick phase order:
///
/// ```text
/// ① execute the events due this tick, in insertion order
/// ② advance every road (arrivals at road ends are staged)
/// ③ advance every junction (queue heads may cross)
/// ④ append the staged arrivals to their junction queues
/// ⑤ increment the tick counter
/// ⑥ notify listeners (`advanced`)
/// ⑦ write one report section per junction, road, and vehicle
/// ```
///
/// Staging in ②–④ means a vehicle that reaches a junction this tick shows
/// up in this tick's queue reports but cannot cross before the next tick.
///
/// Scenario errors (bad events, contradictions with the map) stop the
/// current `run` but are not returned: they are logged, delivered via the
/// listener `error` callback, and leave the simulator state exactly as it
/// was when the error surfaced.  Report I/O failures are returned after
/// the same notification.
pub struct TrafficSimulator {
    queue: EventQueue,
    time: Tick,
    map: RoadMap,
    listeners: Vec<(ListenerId, Box<dyn SimulatorListener>)>,
    next_listener: u32,
    output: Option<Box<dyn Write>>,
    hook: Option<DispatchHook>,
    interrupted: Arc<AtomicBool>,
}

impl TrafficSimulator {
    pub fn new() -> Self {
        Self {
            queue: EventQueue::new(),
            time: Tick::ZERO,
            map: RoadMap::new(),
            listeners: Vec::new(),
            next_listener: 0,
            output: None,
            hook: None,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn road_map(&self) -> &RoadMap {
        &self.map
    }

    /// Events still scheduled, in scheduled order.
    pub fn pending_events(&self) -> Vec<Event> {
        self.queue.pending_from(self.time)
    }

    /// Shared flag that stops `run` between ticks when set.  There is no
    /// mid-tick cancellation point.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    // ── Configuration ─────────────────────────────────────────────────────

    /// Install (or remove) the report sink.  `reset` keeps it.
    pub fn set_output(&mut self, output: Option<Box<dyn Write>>) {
        self.output = output;
    }

    /// Route listener delivery through `hook` (a UI thread invoker, say)
    /// instead of calling listeners inline.
    pub fn set_dispatch_hook(&mut self, hook: DispatchHook) {
        self.hook = Some(hook);
    }

    /// Add a listener; it receives `registered` immediately and every
    /// later notification in registration order.
    pub fn add_listener(&mut self, listener: Box<dyn SimulatorListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        log::debug!("listener {id:?} registered");

        let pending = self.queue.pending_from(self.time);
        let update = UpdateEvent::new(UpdateKind::Registered, self.time, &self.map, &pending);
        if let Some((_, listener)) = self.listeners.last_mut() {
            let mut deliver = || listener.registered(&update);
            match self.hook.as_mut() {
                Some(hook) => hook(&mut deliver),
                None => deliver(),
            }
        }
        id
    }

    /// Remove a listener; returns whether it was present.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    // ── Driving the simulation ────────────────────────────────────────────

    /// Schedule an event.  Events in the past are rejected; accepted
    /// events trigger a `new_event` notification.
    pub fn add_event(&mut self, event: Event) -> SimResult<()> {
        if event.time() < self.time {
            return Err(SimulatorError::StaleEvent {
                event_time: event.time(),
                now: self.time,
            });
        }
        self.queue.push(event);
        self.notify(UpdateKind::NewEvent, None);
        Ok(())
    }

    /// Run up to `ticks` ticks.  The interrupt flag is checked at the top
    /// of each iteration.
    pub fn run(&mut self, ticks: u32) -> SimResult<()> {
        for _ in 0..ticks {
            if self.interrupted.load(Ordering::Relaxed) {
                break;
            }
            if let Err(err) = self.step() {
                log::warn!("{err}");
                self.notify(UpdateKind::Error, Some(&err));
                return match err {
                    SimulatorError::Report { .. } => Err(err),
                    _ => Ok(()),
                };
            }
        }
        Ok(())
    }

    /// Drop all events, the map, and the tick counter.  Listeners and the
    /// output sink survive.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.map = RoadMap::new();
        self.time = Tick::ZERO;
        log::debug!("simulator reset");
        self.notify(UpdateKind::Reset, None);
    }

    // ── One tick ──────────────────────────────────────────────────────────

    fn step(&mut self) -> SimResult<()> {
        if let Some(events) = self.queue.drain_tick(self.time) {
            for event in &events {
                event
                    .execute(&mut self.map)
                    .map_err(|source| SimulatorError::Scenario { tick: self.time, source })?;
            }
        }

        let staged = self.map.advance_roads();
        self.map
            .advance_junctions()
            .map_err(|e| SimulatorError::Scenario { tick: self.time, source: e.into() })?;
        self.map.enter_junctions(&staged);

        self.time += 1;
        self.notify(UpdateKind::Advanced, None);
        self.write_reports()
    }

    /// One report section per junction, then per road, then per vehicle,
    /// each in creation order.
    fn write_reports(&mut self) -> SimResult<()> {
        let Some(out) = self.output.as_mut() else {
            return Ok(());
        };
        let time = self.time;
        for junction in self.map.junctions() {
            junction.report(time, &self.map).store(out).map_err(|source| {
                SimulatorError::Report { id: junction.id().to_string(), tick: time, source }
            })?;
        }
        for road in self.map.roads() {
            road.report(time, &self.map).store(out).map_err(|source| {
                SimulatorError::Report { id: road.id().to_string(), tick: time, source }
            })?;
        }
        for vehicle in self.map.vehicles() {
            vehicle.report(time, &self.map).store(out).map_err(|source| {
                SimulatorError::Report { id: vehicle.id().to_string(), tick: time, source }
            })?;
        }
        Ok(())
    }

    /// Deliver one notification round to every listener, through the
    /// dispatch hook when one is installed.
    fn notify(&mut self, kind: UpdateKind, error: Option<&SimulatorError>) {
        let pending = self.queue.pending_from(self.time);
        let update = UpdateEvent::new(kind, self.time, &self.map, &pending);

        let listeners = &mut self.listeners;
        let mut deliver = || {
            for (_, listener) in listeners.iter_mut() {
                dispatch_one(listener.as_mut(), &update, error);
            }
        };
        match self.hook.as_mut() {
            Some(hook) => hook(&mut deliver),
            None => deliver(),
        }
    }
}

impl Default for TrafficSimulator {
    fn default() -> Self {
        Self::new()
    }
}
