//! Error types for tsim-sim.

use thiserror::Error;
use tsim_events::EventError;
use tsim_model::Tick;

#[derive(Debug, Error)]
pub enum SimulatorError {
    /// `add_event` received an event scheduled before the current tick.
    #[error("event scheduled for tick {event_time} is earlier than the current tick {now}")]
    StaleEvent { event_time: Tick, now: Tick },

    /// An event or advance step contradicted the scenario.  The run stops
    /// at `tick` with the map as it was when the error surfaced.
    #[error("error at tick {tick}: {source}")]
    Scenario {
        tick: Tick,
        #[source]
        source: EventError,
    },

    /// Writing one object's report section to the output sink failed.
    #[error("failed to write report for '{id}' at tick {tick}: {source}")]
    Report {
        id: String,
        tick: Tick,
        #[source]
        source: std::io::Error,
    },
}

pub type SimResult<T> = Result<T, SimulatorError>;
