//! `Event` — a timestamped change to apply to the road map.

use tsim_model::{JunctionPolicy, RoadKind, RoadMap, Tick};

use crate::error::EventResult;

/// What an event does when its tick comes up.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    NewJunction {
        id: String,
        policy: JunctionPolicy,
    },
    NewRoad {
        id: String,
        src: String,
        dest: String,
        max_speed: u32,
        length: u32,
        /// `Some` for a lane road, `None` for a plain one.
        lanes: Option<u32>,
    },
    NewVehicle {
        id: String,
        max_speed: u32,
        itinerary: Vec<String>,
    },
    VehicleFaulty {
        vehicles: Vec<String>,
        duration: u32,
    },
}

/// A scheduled event.  Built by the builders, queued by the kernel,
/// executed when the simulation reaches its tick.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    time: Tick,
    kind: EventKind,
}

impl Event {
    pub fn new(time: Tick, kind: EventKind) -> Self {
        Self { time, kind }
    }

    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Apply this event to the map.  A contradiction (duplicate id,
    /// unknown reference, disconnected itinerary) surfaces as an error
    /// and leaves the map unchanged.
    pub fn execute(&self, map: &mut RoadMap) -> EventResult<()> {
        match &self.kind {
            EventKind::NewJunction { id, policy } => {
                map.add_junction(id.as_str(), *policy)?;
            }
            EventKind::NewRoad { id, src, dest, max_speed, length, lanes } => {
                let kind = match lanes {
                    None => RoadKind::Plain,
                    Some(n) => RoadKind::Lanes(*n),
                };
                map.add_road(id.as_str(), *length, *max_speed, src, dest, kind)?;
            }
            EventKind::NewVehicle { id, max_speed, itinerary } => {
                map.add_vehicle(id.as_str(), *max_speed, itinerary)?;
            }
            EventKind::VehicleFaulty { vehicles, duration } => {
                for v in vehicles {
                    map.make_vehicle_faulty(v, *duration)?;
                }
            }
        }
        Ok(())
    }

    /// One-line type label for the pending-events table.
    pub fn type_label(&self) -> String {
        match &self.kind {
            EventKind::NewJunction { id, .. } => format!("New junction {id}"),
            EventKind::NewRoad { id, .. } => format!("New road {id}"),
            EventKind::NewVehicle { id, .. } => format!("New vehicle {id}"),
            EventKind::VehicleFaulty { vehicles, .. } => {
                format!("Break vehicles [{}]", vehicles.join(","))
            }
        }
    }

    /// Key/value rows for UI pending-event tables.
    pub fn describe(&self) -> Vec<(String, String)> {
        vec![
            ("Time".to_string(), self.time.to_string()),
            ("Type".to_string(), self.type_label()),
        ]
    }
}
