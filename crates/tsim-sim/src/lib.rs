//! `tsim-sim` — simulation kernel of the tsim traffic simulator.
//!
//! # Tick loop
//!
//! ```text
//! for each tick of run(n):
//!   ① Events    — drain and execute the events due this tick, in
//!                 insertion order.
//!   ② Roads     — advance every road; vehicles reaching a road end are
//!                 staged as arrivals.
//!   ③ Junctions — every junction may release its green queue head onto
//!                 the next road of the vehicle's itinerary.
//!   ④ Arrivals  — append the staged arrivals to the junction queues.
//!   ⑤ Tick      — increment the counter.
//!   ⑥ Notify    — `advanced` to every listener.
//!   ⑦ Report    — one section per junction, road, and vehicle, if an
//!                 output sink is set.
//! ```
//!
//! Two runs with the same events and the same tick count produce
//! byte-identical output: the event queue, the road map, and every
//! junction iterate in insertion order.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tsim_events::{load_events, BuilderRegistry};
//! use tsim_ini::Ini;
//! use tsim_sim::TrafficSimulator;
//!
//! let ini = Ini::parse(&scenario_text)?;
//! let mut sim = TrafficSimulator::new();
//! sim.set_output(Some(Box::new(std::io::stdout())));
//! for event in load_events(&ini, &BuilderRegistry::default())? {
//!     sim.add_event(event)?;
//! }
//! sim.run(10)?;
//! ```

pub mod error;
pub mod listener;
pub mod multimap;
pub mod simulator;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{SimResult, SimulatorError};
pub use listener::{DispatchHook, ListenerId, SimulatorListener, UpdateEvent, UpdateKind};
pub use multimap::EventQueue;
pub use simulator::TrafficSimulator;
