//! `Describable` — per-object key/value rows for UI tables.
//!
//! The graphical shell renders one table per object kind; each row comes
//! from `describe`.  Keys are human-readable column headers, values are
//! already formatted.  This is a read-only view: implementations take the
//! map by shared reference and only format state.

use crate::road_map::RoadMap;

pub trait Describable {
    /// Key/value rows describing this object, in display order.
    fn describe(&self, map: &RoadMap) -> Vec<(String, String)>;
}

impl Describable for crate::Junction {
    fn describe(&self, map: &RoadMap) -> Vec<(String, String)> {
        let mut green = Vec::new();
        let mut red = Vec::new();
        for ir in self.incoming() {
            let label = self.incoming_label(ir, map);
            if ir.is_green() {
                green.push(label);
            } else {
                red.push(label);
            }
        }
        vec![
            ("ID".to_string(), self.id().to_string()),
            ("Green".to_string(), format!("[{}]", green.join(","))),
            ("Red".to_string(), format!("[{}]", red.join(","))),
        ]
    }
}

impl Describable for crate::Road {
    fn describe(&self, map: &RoadMap) -> Vec<(String, String)> {
        let vehicles: Vec<&str> = self.vehicles().iter().map(|&v| map.vehicle(v).id()).collect();
        vec![
            ("ID".to_string(), self.id().to_string()),
            ("Source".to_string(), map.junction(self.src()).id().to_string()),
            ("Target".to_string(), map.junction(self.dest()).id().to_string()),
            ("Length".to_string(), self.length().to_string()),
            ("Max Speed".to_string(), self.max_speed().to_string()),
            ("Vehicles".to_string(), format!("[{}]", vehicles.join(","))),
        ]
    }
}

impl Describable for crate::Vehicle {
    fn describe(&self, map: &RoadMap) -> Vec<(String, String)> {
        let road = match self.location() {
            crate::VehicleLocation::OnRoad(r) => map.road(r).id().to_string(),
            _ => String::new(),
        };
        let itinerary: Vec<&str> = self
            .itinerary()
            .iter()
            .map(|&j| map.junction(j).id())
            .collect();
        vec![
            ("ID".to_string(), self.id().to_string()),
            ("Road".to_string(), road),
            ("Location".to_string(), self.location_label(map)),
            ("Speed".to_string(), self.speed().to_string()),
            ("Km".to_string(), self.kilometrage().to_string()),
            ("Faulty Units".to_string(), self.faulty_remaining().to_string()),
            ("Itinerary".to_string(), format!("[{}]", itinerary.join(","))),
        ]
    }
}
