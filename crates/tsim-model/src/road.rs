//! `Road` — a directed stretch between two junctions.
//!
//! The advancement rule lives here.  Per tick, every vehicle on the road
//! gets an effective speed:
//!
//! ```text
//! base      = min(speed limit, vehicle max speed)
//! effective = base / 2   if a faulty vehicle sits at distance ≥ ours
//!                        on the same lane
//!           = 0          if the vehicle itself is faulty
//!           = base       otherwise
//! ```
//!
//! Distance advances by the effective speed, capped at the road length.
//! A vehicle hitting the cap leaves the road and is handed back to the
//! caller as an arrival for the destination junction's queue.

use tsim_ini::IniSection;

use crate::ids::{JunctionId, VehicleId};
use crate::road_map::RoadMap;
use crate::time::Tick;
use crate::vehicle::Vehicle;

/// Plain single-lane road, or a multi-lane variant.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadKind {
    Plain,
    /// Lane count ≥ 1.  Vehicles are partitioned by lane; the fault
    /// slowdown only applies within a lane.
    Lanes(u32),
}

#[derive(Debug)]
pub struct Road {
    id: String,
    length: u32,
    /// Speed limit for this road.
    max_speed: u32,
    src: JunctionId,
    dest: JunctionId,
    kind: RoadKind,
    /// Vehicles currently on the road, in entry order.
    vehicles: Vec<VehicleId>,
}

impl Road {
    pub(crate) fn new(
        id: String,
        length: u32,
        max_speed: u32,
        src: JunctionId,
        dest: JunctionId,
        kind: RoadKind,
    ) -> Self {
        Self { id, length, max_speed, src, dest, kind, vehicles: Vec::new() }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn max_speed(&self) -> u32 {
        self.max_speed
    }

    pub fn src(&self) -> JunctionId {
        self.src
    }

    pub fn dest(&self) -> JunctionId {
        self.dest
    }

    pub fn kind(&self) -> RoadKind {
        self.kind
    }

    /// Number of lanes; 1 for plain roads.
    pub fn lane_count(&self) -> u32 {
        match self.kind {
            RoadKind::Plain => 1,
            RoadKind::Lanes(n) => n,
        }
    }

    /// Vehicles on the road, in entry order.
    pub fn vehicles(&self) -> &[VehicleId] {
        &self.vehicles
    }

    pub(crate) fn push_vehicle(&mut self, vehicle: VehicleId) {
        self.vehicles.push(vehicle);
    }

    // ── Advancement ───────────────────────────────────────────────────────

    /// Advance every vehicle on the road one tick.  Returns the vehicles
    /// that reached the road end, in on-road order; the caller stages them
    /// into the destination junction's queue.
    pub(crate) fn advance(&mut self, vehicles: &mut [Vehicle]) -> Vec<VehicleId> {
        // Faulty positions snapshot; faulty vehicles do not move, so the
        // snapshot stays valid for the whole pass.
        let faulty: Vec<(u32, u32)> = self
            .vehicles
            .iter()
            .map(|&vid| &vehicles[vid.index()])
            .filter(|v| v.is_faulty())
            .map(|v| (v.lane(), v.distance()))
            .collect();

        let mut staying = Vec::with_capacity(self.vehicles.len());
        let mut arrivals = Vec::new();

        for &vid in &self.vehicles {
            let v = &mut vehicles[vid.index()];
            if v.is_faulty() {
                v.advance_by(0, 0);
                staying.push(vid);
                continue;
            }

            let base = self.max_speed.min(v.max_speed());
            let slowed = faulty
                .iter()
                .any(|&(lane, dist)| lane == v.lane() && dist >= v.distance());
            let effective = if slowed { base / 2 } else { base };
            let delta = effective.min(self.length - v.distance());
            v.advance_by(effective, delta);

            if v.distance() == self.length {
                v.reach_road_end(self.dest);
                arrivals.push(vid);
            } else {
                staying.push(vid);
            }
        }
        self.vehicles = staying;

        // Fault counters tick down after the movement pass, so a fault
        // expiring this tick still slows its followers this tick.
        for &vid in &self.vehicles {
            vehicles[vid.index()].tick_fault();
        }
        arrivals
    }

    /// Lane for a vehicle entering the road: the least-loaded lane, ties
    /// broken by lowest index.  Always 0 on single-lane roads.
    pub(crate) fn entry_lane(&self, vehicles: &[Vehicle]) -> u32 {
        let lanes = self.lane_count();
        if lanes <= 1 {
            return 0;
        }
        let mut counts = vec![0u32; lanes as usize];
        for &vid in &self.vehicles {
            counts[vehicles[vid.index()].lane() as usize] += 1;
        }
        counts
            .iter()
            .enumerate()
            .min_by_key(|&(_, c)| *c)
            .map(|(i, _)| i as u32)
            .unwrap_or(0)
    }

    // ── Reporting ─────────────────────────────────────────────────────────

    /// Build this road's `[road_report]` section.  `state` lists
    /// `(vehicleId,distance)` in ascending distance, stable for ties.
    pub fn report(&self, time: Tick, map: &RoadMap) -> IniSection {
        let mut entries: Vec<(u32, &str)> = self
            .vehicles
            .iter()
            .map(|&vid| {
                let v = map.vehicle(vid);
                (v.distance(), v.id())
            })
            .collect();
        entries.sort_by_key(|&(dist, _)| dist);

        let state = entries
            .iter()
            .map(|(dist, id)| format!("({id},{dist})"))
            .collect::<Vec<_>>()
            .join(",");

        let mut sec = IniSection::new("road_report");
        sec.set_value("id", &self.id);
        sec.set_value("time", time);
        sec.set_value("state", state);
        sec
    }
}
