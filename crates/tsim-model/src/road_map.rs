//! `RoadMap` — owner of every simulated object, in creation order.
//!
//! Creation order is iteration order, for both the advance phases and the
//! report emission, which is what pins down deterministic replay.  All
//! cross-object mutation funnels through methods here: objects hold dense
//! ids into the three storage `Vec`s, and the methods split-borrow the
//! fields so, for instance, a road can move vehicles without aliasing the
//! road storage.

use std::collections::HashMap;

use crate::error::{ModelError, ModelResult};
use crate::ids::{JunctionId, RoadId, VehicleId};
use crate::junction::{Junction, JunctionPolicy};
use crate::road::{Road, RoadKind};
use crate::vehicle::Vehicle;

/// A vehicle that reached the end of its road this tick, waiting to be
/// queued at `junction`.  Arrivals are staged by [`RoadMap::advance_roads`]
/// and applied by [`RoadMap::enter_junctions`] after the junction phase,
/// so a vehicle always waits at least one tick before crossing.
#[derive(Copy, Clone, Debug)]
pub struct Arrival {
    pub junction: JunctionId,
    pub road: RoadId,
    pub vehicle: VehicleId,
}

#[derive(Default, Debug)]
pub struct RoadMap {
    junctions: Vec<Junction>,
    roads: Vec<Road>,
    vehicles: Vec<Vehicle>,
    junction_index: HashMap<String, JunctionId>,
    road_index: HashMap<String, RoadId>,
    vehicle_index: HashMap<String, VehicleId>,
}

impl RoadMap {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Object creation ───────────────────────────────────────────────────

    /// Add a junction.  Duplicate ids per object kind are rejected.
    pub fn add_junction(
        &mut self,
        id: impl Into<String>,
        policy: JunctionPolicy,
    ) -> ModelResult<JunctionId> {
        let id = id.into();
        if self.junction_index.contains_key(&id) {
            return Err(ModelError::DuplicateJunction(id));
        }
        let jid = JunctionId(self.junctions.len() as u32);
        self.junctions.push(Junction::new(id.clone(), policy));
        self.junction_index.insert(id, jid);
        Ok(jid)
    }

    /// Add a road between two existing junctions and wire it into their
    /// incoming/outgoing tables.  A later road over the same `src → dest`
    /// pair replaces the outgoing entry.
    pub fn add_road(
        &mut self,
        id: impl Into<String>,
        length: u32,
        max_speed: u32,
        src: &str,
        dest: &str,
        kind: RoadKind,
    ) -> ModelResult<RoadId> {
        let id = id.into();
        if self.road_index.contains_key(&id) {
            return Err(ModelError::DuplicateRoad(id));
        }
        let src_id = self.junction_id(src).ok_or_else(|| ModelError::UnknownJunction(src.to_string()))?;
        let dest_id = self.junction_id(dest).ok_or_else(|| ModelError::UnknownJunction(dest.to_string()))?;

        let rid = RoadId(self.roads.len() as u32);
        self.roads.push(Road::new(id.clone(), length, max_speed, src_id, dest_id, kind));
        self.road_index.insert(id, rid);
        self.junctions[dest_id.index()].add_incoming(rid);
        self.junctions[src_id.index()].add_outgoing(dest_id, rid);
        Ok(rid)
    }

    /// Add a vehicle and place it on the first road of its itinerary.
    ///
    /// Everything is validated before any state changes, so a rejected
    /// vehicle leaves the map untouched.
    pub fn add_vehicle(
        &mut self,
        id: impl Into<String>,
        max_speed: u32,
        itinerary: &[String],
    ) -> ModelResult<VehicleId> {
        let id = id.into();
        if self.vehicle_index.contains_key(&id) {
            return Err(ModelError::DuplicateVehicle(id));
        }
        if itinerary.len() < 2 {
            return Err(ModelError::ShortItinerary(id));
        }
        let resolved: Vec<JunctionId> = itinerary
            .iter()
            .map(|name| {
                self.junction_id(name)
                    .ok_or_else(|| ModelError::UnknownJunction(name.clone()))
            })
            .collect::<ModelResult<_>>()?;
        let first_road = self.junctions[resolved[0].index()]
            .road_to(resolved[1])
            .ok_or_else(|| ModelError::NoRoadBetween {
                from: itinerary[0].clone(),
                to: itinerary[1].clone(),
            })?;

        let vid = VehicleId(self.vehicles.len() as u32);
        self.vehicles.push(Vehicle::new(id.clone(), max_speed, resolved));
        self.vehicle_index.insert(id, vid);
        self.place_on_road(vid, first_road);
        Ok(vid)
    }

    /// Add fault ticks to a vehicle, by scenario name.
    pub fn make_vehicle_faulty(&mut self, id: &str, duration: u32) -> ModelResult<()> {
        let vid = self
            .vehicle_id(id)
            .ok_or_else(|| ModelError::UnknownVehicle(id.to_string()))?;
        self.vehicles[vid.index()].make_faulty(duration);
        Ok(())
    }

    // ── Advancement (one tick = roads, junctions, then staged arrivals) ───

    /// Advance every road in creation order; returns the staged arrivals.
    pub fn advance_roads(&mut self) -> Vec<Arrival> {
        let mut staged = Vec::new();
        for idx in 0..self.roads.len() {
            let rid = RoadId(idx as u32);
            let dest = self.roads[idx].dest();
            for vehicle in self.roads[idx].advance(&mut self.vehicles) {
                staged.push(Arrival { junction: dest, road: rid, vehicle });
            }
        }
        staged
    }

    /// Advance every junction in creation order, moving each released
    /// vehicle onto the next road of its itinerary.
    pub fn advance_junctions(&mut self) -> ModelResult<()> {
        for idx in 0..self.junctions.len() {
            if let Some(vid) = self.junctions[idx].advance(&mut self.vehicles) {
                self.move_to_next_road(vid)?;
            }
        }
        Ok(())
    }

    /// Append the staged arrivals to their junction queues.
    pub fn enter_junctions(&mut self, arrivals: &[Arrival]) {
        for a in arrivals {
            self.junctions[a.junction.index()].enter(a.road, a.vehicle);
        }
    }

    /// A vehicle crossed a junction: bump its itinerary position, and
    /// either mark it arrived (last junction) or place it on the road
    /// towards the next one.
    fn move_to_next_road(&mut self, vid: VehicleId) -> ModelResult<()> {
        let (pos, here, next) = {
            let v = &self.vehicles[vid.index()];
            let pos = v.itinerary_pos() + 1;
            (pos, v.itinerary()[pos], v.itinerary().get(pos + 1).copied())
        };
        match next {
            None => {
                self.vehicles[vid.index()].mark_arrived(pos);
                Ok(())
            }
            Some(dest) => {
                let road = self.junctions[here.index()].road_to(dest).ok_or_else(|| {
                    ModelError::NoRoadBetween {
                        from: self.junctions[here.index()].id().to_string(),
                        to: self.junctions[dest.index()].id().to_string(),
                    }
                })?;
                self.vehicles[vid.index()].depart(pos);
                self.place_on_road(vid, road);
                Ok(())
            }
        }
    }

    fn place_on_road(&mut self, vid: VehicleId, rid: RoadId) {
        let lane = self.roads[rid.index()].entry_lane(&self.vehicles);
        self.vehicles[vid.index()].enter_road(rid, lane);
        self.roads[rid.index()].push_vehicle(vid);
    }

    // ── Lookups and iteration ─────────────────────────────────────────────

    pub fn junction_id(&self, name: &str) -> Option<JunctionId> {
        self.junction_index.get(name).copied()
    }

    pub fn road_id(&self, name: &str) -> Option<RoadId> {
        self.road_index.get(name).copied()
    }

    pub fn vehicle_id(&self, name: &str) -> Option<VehicleId> {
        self.vehicle_index.get(name).copied()
    }

    pub fn junction(&self, id: JunctionId) -> &Junction {
        &self.junctions[id.index()]
    }

    pub fn road(&self, id: RoadId) -> &Road {
        &self.roads[id.index()]
    }

    pub fn vehicle(&self, id: VehicleId) -> &Vehicle {
        &self.vehicles[id.index()]
    }

    /// Junctions in creation order.
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    /// Roads in creation order.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Vehicles in creation order.  Arrived vehicles stay forever.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty() && self.roads.is_empty() && self.vehicles.is_empty()
    }
}
