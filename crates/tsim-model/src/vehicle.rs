//! `Vehicle` — a simulated vehicle with an itinerary and a fault counter.

use tsim_ini::IniSection;

use crate::ids::{JunctionId, RoadId};
use crate::road_map::RoadMap;
use crate::time::Tick;

/// Where a vehicle currently is.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VehicleLocation {
    /// Travelling along a road.
    OnRoad(RoadId),
    /// Queued at a junction, waiting to cross.
    Waiting(JunctionId),
    /// Past the last junction of its itinerary.  Terminal.
    Arrived,
}

/// A vehicle.  Movement is driven from the outside: roads set the speed
/// and advance the distance, junctions release queued vehicles onto their
/// next road.  The vehicle itself only tracks its state.
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: String,
    max_speed: u32,
    /// Resolved itinerary; length ≥ 2, enforced at creation.
    itinerary: Vec<JunctionId>,
    /// Index of the itinerary junction the vehicle most recently departed.
    itinerary_pos: usize,
    speed: u32,
    /// Distance travelled on the current road; `0 ≤ distance ≤ length`.
    distance: u32,
    /// Lane on the current road; always 0 on single-lane roads.
    lane: u32,
    /// Total distance accumulated over the whole trip.
    kilometrage: u32,
    /// Remaining ticks of fault; nonzero means the vehicle does not move.
    faulty_remaining: u32,
    location: VehicleLocation,
}

impl Vehicle {
    /// Create a vehicle about to depart `itinerary[0]`.  The caller
    /// ([`RoadMap::add_vehicle`]) places it on its first road.
    pub(crate) fn new(id: String, max_speed: u32, itinerary: Vec<JunctionId>) -> Self {
        debug_assert!(itinerary.len() >= 2);
        let start = itinerary[0];
        Self {
            id,
            max_speed,
            itinerary,
            itinerary_pos: 0,
            speed: 0,
            distance: 0,
            lane: 0,
            kilometrage: 0,
            faulty_remaining: 0,
            location: VehicleLocation::Waiting(start),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn max_speed(&self) -> u32 {
        self.max_speed
    }

    pub fn itinerary(&self) -> &[JunctionId] {
        &self.itinerary
    }

    pub fn itinerary_pos(&self) -> usize {
        self.itinerary_pos
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn lane(&self) -> u32 {
        self.lane
    }

    pub fn kilometrage(&self) -> u32 {
        self.kilometrage
    }

    pub fn faulty_remaining(&self) -> u32 {
        self.faulty_remaining
    }

    pub fn is_faulty(&self) -> bool {
        self.faulty_remaining > 0
    }

    pub fn location(&self) -> VehicleLocation {
        self.location
    }

    pub fn has_arrived(&self) -> bool {
        self.location == VehicleLocation::Arrived
    }

    // ── Fault handling ────────────────────────────────────────────────────

    /// Add `duration` ticks of fault.  Adding 0 leaves a healthy vehicle
    /// healthy.  Arrived vehicles accept the counter but never move again
    /// anyway.
    pub fn make_faulty(&mut self, duration: u32) {
        self.faulty_remaining += duration;
    }

    /// One tick of fault elapses.  No-op on healthy vehicles.
    pub(crate) fn tick_fault(&mut self) {
        self.faulty_remaining = self.faulty_remaining.saturating_sub(1);
    }

    // ── Movement hooks (called by Road / RoadMap) ─────────────────────────

    /// Apply one tick of movement: record the effective speed and advance
    /// by `delta` (already capped to the road end by the road).
    pub(crate) fn advance_by(&mut self, effective_speed: u32, delta: u32) {
        self.speed = effective_speed;
        self.distance += delta;
        self.kilometrage += delta;
    }

    /// The vehicle reached the end of its road and now waits at `dest`.
    pub(crate) fn reach_road_end(&mut self, dest: JunctionId) {
        self.speed = 0;
        self.location = VehicleLocation::Waiting(dest);
    }

    /// Placed at the start of `road`, on `lane`.
    pub(crate) fn enter_road(&mut self, road: RoadId, lane: u32) {
        self.distance = 0;
        self.speed = 0;
        self.lane = lane;
        self.location = VehicleLocation::OnRoad(road);
    }

    /// Crossed the junction at itinerary position `pos`; still en route.
    pub(crate) fn depart(&mut self, pos: usize) {
        self.itinerary_pos = pos;
    }

    /// Crossed the final junction.  Terminal state.
    pub(crate) fn mark_arrived(&mut self, pos: usize) {
        self.itinerary_pos = pos;
        self.speed = 0;
        self.distance = 0;
        self.location = VehicleLocation::Arrived;
    }

    // ── Reporting ─────────────────────────────────────────────────────────

    /// `location` value as it appears in reports:
    /// `arrived`, `(roadId,distance)`, or `(waiting,junctionId)`.
    pub fn location_label(&self, map: &RoadMap) -> String {
        match self.location {
            VehicleLocation::Arrived => "arrived".to_string(),
            VehicleLocation::OnRoad(r) => {
                format!("({},{})", map.road(r).id(), self.distance)
            }
            VehicleLocation::Waiting(j) => {
                format!("(waiting,{})", map.junction(j).id())
            }
        }
    }

    /// Build this vehicle's `[vehicle_report]` section.
    pub fn report(&self, time: Tick, map: &RoadMap) -> IniSection {
        let mut sec = IniSection::new("vehicle_report");
        sec.set_value("id", &self.id);
        sec.set_value("time", time);
        sec.set_value("speed", self.speed);
        sec.set_value("kilometrage", self.kilometrage);
        sec.set_value("faulty", self.faulty_remaining);
        sec.set_value("location", self.location_label(map));
        sec
    }
}
