//! `Junction` — a crossing with per-incoming-road queues and a traffic
//! light policy.
//!
//! The three policies share all of their state; the time-slice
//! bookkeeping fields on [`IncomingRoad`] are simply ignored by the other
//! two.  `advance` is common as well: release the head of the green queue
//! (if it may move), tick down queued fault counters, then compute the
//! next green.  After `advance`, exactly one incoming road is green on
//! any junction that has one.

use std::collections::VecDeque;

use tsim_ini::IniSection;

use crate::ids::{JunctionId, RoadId, VehicleId};
use crate::road_map::RoadMap;
use crate::time::Tick;
use crate::vehicle::Vehicle;

/// Traffic-light policy variants.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JunctionPolicy {
    /// Green rotates to the next incoming road every tick.
    RoundRobin,
    /// Green goes to the longest queue every tick; ties and the all-empty
    /// case fall back to insertion order.
    MostCrowded,
    /// Each incoming road holds green for an interval that adapts to how
    /// well the allocation was used.  Intervals stay within
    /// `[min_slice, max_slice]`; fresh roads start at `max_slice`.
    TimeSlice { max_slice: u32, min_slice: u32 },
}

/// One incoming road: its light, its FIFO of waiting vehicles, and the
/// time-slice allocation bookkeeping.
#[derive(Debug)]
pub struct IncomingRoad {
    road: RoadId,
    green: bool,
    waiting: VecDeque<VehicleId>,
    /// Allocated green ticks for the current/next cycle (time-slice only).
    interval: u32,
    /// Green ticks consumed in the current allocation.
    time_spent: u32,
    /// True while every green tick of this allocation released a vehicle.
    completely_used: bool,
    /// True once `completely_used` held at any point of this allocation.
    used: bool,
}

impl IncomingRoad {
    fn new(road: RoadId, interval: u32) -> Self {
        Self {
            road,
            green: false,
            waiting: VecDeque::new(),
            interval,
            time_spent: 0,
            completely_used: false,
            used: false,
        }
    }

    pub fn road(&self) -> RoadId {
        self.road
    }

    pub fn is_green(&self) -> bool {
        self.green
    }

    /// Vehicles waiting to cross, head first.
    pub fn waiting(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.waiting.iter().copied()
    }

    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Current time-slice allocation (meaningful under the time-slice
    /// policy only).
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Green ticks left in the current allocation.
    pub fn remaining(&self) -> u32 {
        self.interval.saturating_sub(self.time_spent)
    }

    #[cfg(test)]
    pub(crate) fn set_interval(&mut self, interval: u32) {
        self.interval = interval;
    }

    /// Pop the queue head if it is allowed to move.  Faulty heads stay
    /// put and block the queue.
    fn release_head(&mut self, vehicles: &[Vehicle]) -> Option<VehicleId> {
        let &head = self.waiting.front()?;
        if vehicles[head.index()].is_faulty() {
            return None;
        }
        self.waiting.pop_front()
    }

    /// Take the green light and reset the allocation bookkeeping.
    fn take_green(&mut self) {
        self.green = true;
        self.time_spent = 0;
        self.completely_used = true;
        self.used = false;
    }

    fn light_label(&self) -> &'static str {
        if self.green { "green" } else { "red" }
    }

    /// Queue rendering for reports: `[v1,v2]`.
    fn queue_label(&self, map: &RoadMap) -> String {
        let ids: Vec<&str> = self.waiting.iter().map(|&v| map.vehicle(v).id()).collect();
        format!("[{}]", ids.join(","))
    }
}

#[derive(Debug)]
pub struct Junction {
    id: String,
    policy: JunctionPolicy,
    /// Incoming roads in insertion order — the rotation order.
    incoming: Vec<IncomingRoad>,
    /// Destination junction → outgoing road used to reach it.
    outgoing: Vec<(JunctionId, RoadId)>,
    /// Index of the green incoming road, if any.
    current: Option<usize>,
}

impl Junction {
    pub(crate) fn new(id: String, policy: JunctionPolicy) -> Self {
        Self { id, policy, incoming: Vec::new(), outgoing: Vec::new(), current: None }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn policy(&self) -> JunctionPolicy {
        self.policy
    }

    pub fn incoming(&self) -> &[IncomingRoad] {
        &self.incoming
    }

    #[cfg(test)]
    pub(crate) fn incoming_mut(&mut self) -> &mut [IncomingRoad] {
        &mut self.incoming
    }

    /// Index of the green incoming road.
    pub fn green_index(&self) -> Option<usize> {
        self.current
    }

    /// The outgoing road that reaches `dest`, if one was registered.
    pub fn road_to(&self, dest: JunctionId) -> Option<RoadId> {
        self.outgoing
            .iter()
            .find(|&&(j, _)| j == dest)
            .map(|&(_, r)| r)
    }

    // ── Topology (called by RoadMap) ──────────────────────────────────────

    pub(crate) fn add_incoming(&mut self, road: RoadId) {
        let interval = match self.policy {
            JunctionPolicy::TimeSlice { max_slice, .. } => max_slice,
            _ => 0,
        };
        self.incoming.push(IncomingRoad::new(road, interval));
    }

    /// Register the road used to reach `dest`.  A later road with the
    /// same destination replaces the entry.
    pub(crate) fn add_outgoing(&mut self, dest: JunctionId, road: RoadId) {
        match self.outgoing.iter_mut().find(|(j, _)| *j == dest) {
            Some(entry) => entry.1 = road,
            None => self.outgoing.push((dest, road)),
        }
    }

    /// Queue a vehicle arriving from `road`.
    pub(crate) fn enter(&mut self, road: RoadId, vehicle: VehicleId) {
        if let Some(ir) = self.incoming.iter_mut().find(|ir| ir.road == road) {
            ir.waiting.push_back(vehicle);
        }
    }

    // ── Advancement ───────────────────────────────────────────────────────

    /// One tick: release the green queue head (if movable), tick down
    /// queued fault counters, switch the lights.  Returns the released
    /// vehicle; the caller moves it onto its next road.
    pub(crate) fn advance(&mut self, vehicles: &mut [Vehicle]) -> Option<VehicleId> {
        if self.incoming.is_empty() {
            return None;
        }

        let released = match self.current {
            None => None,
            Some(i) => {
                let ir = &mut self.incoming[i];
                let released = ir.release_head(vehicles);
                if matches!(self.policy, JunctionPolicy::TimeSlice { .. }) {
                    ir.time_spent += 1;
                    ir.completely_used = ir.completely_used && released.is_some();
                    ir.used = ir.used || ir.completely_used;
                }
                released
            }
        };

        // Queued vehicles burn fault ticks whether or not anything moved.
        for ir in &mut self.incoming {
            for &vid in &ir.waiting {
                vehicles[vid.index()].tick_fault();
            }
        }

        self.switch_lights();
        released
    }

    /// Compute the next green per policy and flip the flags.
    fn switch_lights(&mut self) {
        let n = self.incoming.len();
        let next = match self.policy {
            JunctionPolicy::RoundRobin => self.current.map_or(0, |i| (i + 1) % n),

            JunctionPolicy::MostCrowded => {
                let mut best = 0;
                for i in 1..n {
                    if self.incoming[i].waiting.len() > self.incoming[best].waiting.len() {
                        best = i;
                    }
                }
                best
            }

            JunctionPolicy::TimeSlice { max_slice, min_slice } => match self.current {
                // Allocation still running: keep the light where it is.
                Some(i) if self.incoming[i].time_spent < self.incoming[i].interval => return,
                Some(i) => {
                    // Recompute the allocation for this road's next cycle
                    // on the way out of green.
                    let ir = &mut self.incoming[i];
                    if ir.completely_used && ir.interval < max_slice {
                        ir.interval += 1;
                    } else if !ir.used && ir.interval > min_slice {
                        ir.interval -= 1;
                    }
                    (i + 1) % n
                }
                None => 0,
            },
        };

        if let Some(i) = self.current {
            self.incoming[i].green = false;
        }
        self.current = Some(next);
        self.incoming[next].take_green();
    }

    // ── Reporting ─────────────────────────────────────────────────────────

    /// Build this junction's `[junction_report]` section.
    ///
    /// `queues` joins `(roadId,light,[v1,v2])` entries in insertion order;
    /// the green entry of a time-slice junction renders as
    /// `(roadId,green:remaining,[…])`.
    pub fn report(&self, time: Tick, map: &RoadMap) -> IniSection {
        let time_slice = matches!(self.policy, JunctionPolicy::TimeSlice { .. });
        let queues = self
            .incoming
            .iter()
            .map(|ir| {
                let road = map.road(ir.road).id();
                let queue = ir.queue_label(map);
                if time_slice && ir.green {
                    format!("({road},green:{},{queue})", ir.remaining())
                } else {
                    format!("({road},{},{queue})", ir.light_label())
                }
            })
            .collect::<Vec<_>>()
            .join(",");

        let mut sec = IniSection::new("junction_report");
        sec.set_value("id", &self.id);
        sec.set_value("time", time);
        sec.set_value("queues", queues);
        sec
    }

    /// `(roadId,light[…])` rendering used by the UI describe rows.  The
    /// queue follows the light directly, unlike the report `queues` value.
    pub(crate) fn incoming_label(&self, ir: &IncomingRoad, map: &RoadMap) -> String {
        format!(
            "({},{}{})",
            map.road(ir.road).id(),
            ir.light_label(),
            ir.queue_label(map)
        )
    }
}
