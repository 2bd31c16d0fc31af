//! `tsim-events` — the scenario event taxonomy of the tsim traffic
//! simulator.
//!
//! Scenario files are sectioned text (see `tsim-ini`); each section
//! describes one [`Event`].  A [`BuilderRegistry`] turns sections into
//! events by trying a fixed list of [`EventBuilder`]s in order — the
//! first builder that recognises a section's shape wins, and a section
//! no builder recognises is a scenario error.  Executing an event
//! mutates a `tsim_model::RoadMap`.
//!
//! # Crate layout
//!
//! | Module      | Contents                                             |
//! |-------------|------------------------------------------------------|
//! | [`event`]   | `Event`, `EventKind`                                 |
//! | [`builder`] | `EventBuilder`, `BuilderRegistry`, `ScenarioConfig`  |
//! | [`parse`]   | field parsing helpers                                |
//! | [`error`]   | `EventError`, `EventResult<T>`                       |

pub mod builder;
pub mod error;
pub mod event;
pub mod parse;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::{load_events, BuilderRegistry, EventBuilder, ScenarioConfig};
pub use error::{EventError, EventResult};
pub use event::{Event, EventKind};
