//! Error types for tsim-model.
//!
//! These are the "scenario invalid" class of failures: an event parsed
//! fine but execution found a contradiction in the road map.  They carry
//! the textual object ids so the message is meaningful to whoever wrote
//! the scenario file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("junction {0} already exists")]
    DuplicateJunction(String),

    #[error("road {0} already exists")]
    DuplicateRoad(String),

    #[error("vehicle {0} already exists")]
    DuplicateVehicle(String),

    #[error("junction {0} does not exist")]
    UnknownJunction(String),

    #[error("vehicle {0} does not exist")]
    UnknownVehicle(String),

    #[error("no road joins junction {from} with junction {to}")]
    NoRoadBetween { from: String, to: String },

    #[error("vehicle {0}: itinerary needs at least two junctions")]
    ShortItinerary(String),
}

/// Alias for `Result<T, ModelError>`.
pub type ModelResult<T> = Result<T, ModelError>;
