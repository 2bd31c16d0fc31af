//! `tsim-ini` — the sectioned key/value text codec used by the tsim crates.
//!
//! Scenario inputs and report outputs share one format: a sequence of
//! sections, each a `[tag]` header line followed by `key = value` lines,
//! closed by a blank line (or the next header, or EOF).  `#`-prefixed
//! lines are comments.
//!
//! # Crate layout
//!
//! | Module      | Contents                                      |
//! |-------------|-----------------------------------------------|
//! | [`section`] | `IniSection` — one tag + ordered pairs        |
//! | [`parser`]  | `Ini` — a parsed document, `parse`/`store`    |
//! | [`error`]   | `IniError`, `IniResult<T>`                    |
//!
//! # Round-trip guarantee
//!
//! `Ini::parse` followed by `Ini::store` reproduces a canonically-emitted
//! file byte for byte (modulo the final newline).  Emission always uses
//! the canonical `key = value` spacing, so arbitrary input spacing is
//! normalised on the first round trip.

pub mod error;
pub mod parser;
pub mod section;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{IniError, IniResult};
pub use parser::Ini;
pub use section::IniSection;
