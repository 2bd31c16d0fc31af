//! Section-to-event builders and the registry that dispatches them.
//!
//! Each builder recognises one section shape.  `parse` returns
//! `Ok(None)` for a section that is not its shape — the registry then
//! tries the next builder — and an error only for a recognised shape
//! with bad fields.  Registration order matters: the typed variants
//! (lane road, most-crowded and time-slice junctions) come before their
//! plain fallbacks, which only match when `type` is absent.

use tsim_ini::{Ini, IniSection};
use tsim_model::{JunctionPolicy, Tick};

use crate::error::{EventError, EventResult};
use crate::event::{Event, EventKind};
use crate::parse::{parse_id, parse_id_list, parse_int, parse_int_or};

/// Scenario-level parsing knobs.
#[derive(Copy, Clone, Debug)]
pub struct ScenarioConfig {
    /// `max_time_slice` default for `type = rr` junctions.
    pub default_time_slice_max: u32,
    /// `min_time_slice` default for `type = rr` junctions.
    pub default_time_slice_min: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self { default_time_slice_max: 10, default_time_slice_min: 1 }
    }
}

/// Parses one section shape into an event.
pub trait EventBuilder {
    /// `Ok(Some(event))` if the section is this builder's shape,
    /// `Ok(None)` to pass it on, `Err` if the shape matched but a field
    /// is missing or invalid.
    fn parse(&self, section: &IniSection) -> EventResult<Option<Event>>;
}

// ── Individual builders ───────────────────────────────────────────────────────

/// Shared prefix of every event section.
fn parse_time(sec: &IniSection) -> EventResult<Tick> {
    Ok(Tick(parse_int(sec, "time", 0)?))
}

/// `[new_junction]` without a `type` key.
pub struct PlainJunctionBuilder;

impl EventBuilder for PlainJunctionBuilder {
    fn parse(&self, sec: &IniSection) -> EventResult<Option<Event>> {
        if sec.tag() != "new_junction" || sec.get_value("type").is_some() {
            return Ok(None);
        }
        let time = parse_time(sec)?;
        let id = parse_id(sec, "id")?;
        Ok(Some(Event::new(
            time,
            EventKind::NewJunction { id, policy: JunctionPolicy::RoundRobin },
        )))
    }
}

/// `[new_junction]` with `type = mc`.
pub struct MostCrowdedJunctionBuilder;

impl EventBuilder for MostCrowdedJunctionBuilder {
    fn parse(&self, sec: &IniSection) -> EventResult<Option<Event>> {
        if sec.tag() != "new_junction" || sec.get_value("type") != Some("mc") {
            return Ok(None);
        }
        let time = parse_time(sec)?;
        let id = parse_id(sec, "id")?;
        Ok(Some(Event::new(
            time,
            EventKind::NewJunction { id, policy: JunctionPolicy::MostCrowded },
        )))
    }
}

/// `[new_junction]` with `type = rr`: the adaptive time-slice junction.
/// `max_time_slice` and `min_time_slice` fall back to the scenario
/// defaults when absent.
pub struct TimeSliceJunctionBuilder {
    config: ScenarioConfig,
}

impl TimeSliceJunctionBuilder {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }
}

impl EventBuilder for TimeSliceJunctionBuilder {
    fn parse(&self, sec: &IniSection) -> EventResult<Option<Event>> {
        if sec.tag() != "new_junction" || sec.get_value("type") != Some("rr") {
            return Ok(None);
        }
        let time = parse_time(sec)?;
        let id = parse_id(sec, "id")?;
        let max_slice =
            parse_int_or(sec, "max_time_slice", 1, self.config.default_time_slice_max)?;
        let min_slice =
            parse_int_or(sec, "min_time_slice", 1, self.config.default_time_slice_min)?;
        if min_slice > max_slice {
            return Err(EventError::bad_value(
                "min_time_slice",
                &min_slice.to_string(),
                format!("exceeds max_time_slice {max_slice}"),
            ));
        }
        Ok(Some(Event::new(
            time,
            EventKind::NewJunction {
                id,
                policy: JunctionPolicy::TimeSlice { max_slice, min_slice },
            },
        )))
    }
}

/// Fields common to both road shapes.
fn parse_road_common(sec: &IniSection) -> EventResult<(Tick, String, String, String, u32, u32)> {
    let time = parse_time(sec)?;
    let id = parse_id(sec, "id")?;
    let src = parse_id(sec, "src")?;
    let dest = parse_id(sec, "dest")?;
    let max_speed = parse_int(sec, "max_speed", 1)?;
    let length = parse_int(sec, "length", 1)?;
    Ok((time, id, src, dest, max_speed, length))
}

/// `[new_road]` without a `type` key.
pub struct PlainRoadBuilder;

impl EventBuilder for PlainRoadBuilder {
    fn parse(&self, sec: &IniSection) -> EventResult<Option<Event>> {
        if sec.tag() != "new_road" || sec.get_value("type").is_some() {
            return Ok(None);
        }
        let (time, id, src, dest, max_speed, length) = parse_road_common(sec)?;
        Ok(Some(Event::new(
            time,
            EventKind::NewRoad { id, src, dest, max_speed, length, lanes: None },
        )))
    }
}

/// `[new_road]` with `type = lanes`.
pub struct LaneRoadBuilder;

impl EventBuilder for LaneRoadBuilder {
    fn parse(&self, sec: &IniSection) -> EventResult<Option<Event>> {
        if sec.tag() != "new_road" || sec.get_value("type") != Some("lanes") {
            return Ok(None);
        }
        let (time, id, src, dest, max_speed, length) = parse_road_common(sec)?;
        let lanes = parse_int(sec, "lanes", 1)?;
        Ok(Some(Event::new(
            time,
            EventKind::NewRoad { id, src, dest, max_speed, length, lanes: Some(lanes) },
        )))
    }
}

/// `[new_vehicle]`.
pub struct VehicleBuilder;

impl EventBuilder for VehicleBuilder {
    fn parse(&self, sec: &IniSection) -> EventResult<Option<Event>> {
        if sec.tag() != "new_vehicle" {
            return Ok(None);
        }
        let time = parse_time(sec)?;
        let id = parse_id(sec, "id")?;
        let max_speed = parse_int(sec, "max_speed", 1)?;
        let itinerary = parse_id_list(sec, "itinerary")?;
        if itinerary.len() < 2 {
            return Err(EventError::bad_value(
                "itinerary",
                &itinerary.join(","),
                "needs at least two junctions",
            ));
        }
        Ok(Some(Event::new(
            time,
            EventKind::NewVehicle { id, max_speed, itinerary },
        )))
    }
}

/// `[make_vehicle_faulty]`.
pub struct VehicleFaultyBuilder;

impl EventBuilder for VehicleFaultyBuilder {
    fn parse(&self, sec: &IniSection) -> EventResult<Option<Event>> {
        if sec.tag() != "make_vehicle_faulty" {
            return Ok(None);
        }
        let time = parse_time(sec)?;
        let vehicles = parse_id_list(sec, "vehicles")?;
        let duration = parse_int(sec, "duration", 1)?;
        Ok(Some(Event::new(
            time,
            EventKind::VehicleFaulty { vehicles, duration },
        )))
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// The builders, tried in registration order.
pub struct BuilderRegistry {
    builders: Vec<Box<dyn EventBuilder>>,
}

impl BuilderRegistry {
    /// The standard builder set, typed variants ahead of the plain
    /// fallbacks.
    pub fn with_config(config: ScenarioConfig) -> Self {
        let mut registry = Self { builders: Vec::new() };
        registry.register(Box::new(LaneRoadBuilder));
        registry.register(Box::new(MostCrowdedJunctionBuilder));
        registry.register(Box::new(TimeSliceJunctionBuilder::new(config)));
        registry.register(Box::new(PlainRoadBuilder));
        registry.register(Box::new(PlainJunctionBuilder));
        registry.register(Box::new(VehicleBuilder));
        registry.register(Box::new(VehicleFaultyBuilder));
        registry
    }

    pub fn register(&mut self, builder: Box<dyn EventBuilder>) {
        self.builders.push(builder);
    }

    /// Parse one section through the builders; the first `Some` wins.
    pub fn parse_section(&self, sec: &IniSection) -> EventResult<Event> {
        for builder in &self.builders {
            if let Some(event) = builder.parse(sec)? {
                return Ok(event);
            }
        }
        Err(EventError::UnknownSection(sec.tag().to_string()))
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::with_config(ScenarioConfig::default())
    }
}

/// Parse a whole scenario file: every section, in file order.
pub fn load_events(ini: &Ini, registry: &BuilderRegistry) -> EventResult<Vec<Event>> {
    ini.sections()
        .iter()
        .map(|sec| registry.parse_section(sec))
        .collect()
}
