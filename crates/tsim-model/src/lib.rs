//! `tsim-model` — the simulated-object model of the tsim traffic simulator.
//!
//! A [`RoadMap`] owns every junction, road, and vehicle in creation order;
//! that order is the advance order and the report order, which is what
//! makes whole runs deterministic.  Objects reference each other through
//! dense typed indices (`JunctionId`, `RoadId`, `VehicleId`) rather than
//! owned pointers, so cross-object mutation happens through `RoadMap`
//! methods with disjoint field borrows.
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `JunctionId`, `RoadId`, `VehicleId`                   |
//! | [`time`]     | `Tick`                                                |
//! | [`vehicle`]  | `Vehicle`, `VehicleLocation`                          |
//! | [`road`]     | `Road`, `RoadKind`                                    |
//! | [`junction`] | `Junction`, `JunctionPolicy`, `IncomingRoad`          |
//! | [`road_map`] | `RoadMap`, `Arrival`                                  |
//! | [`view`]     | `Describable` — key/value rows for UI tables          |
//! | [`error`]    | `ModelError`, `ModelResult<T>`                        |

pub mod error;
pub mod ids;
pub mod junction;
pub mod road;
pub mod road_map;
pub mod time;
pub mod vehicle;
pub mod view;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ModelError, ModelResult};
pub use ids::{JunctionId, RoadId, VehicleId};
pub use junction::{IncomingRoad, Junction, JunctionPolicy};
pub use road::{Road, RoadKind};
pub use road_map::{Arrival, RoadMap};
pub use time::Tick;
pub use vehicle::{Vehicle, VehicleLocation};
pub use view::Describable;
