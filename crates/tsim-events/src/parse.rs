//! Field parsing helpers shared by the event builders.
//!
//! Every rejection names the offending key and value, so scenario errors
//! point straight at the bad line of the input file.  A missing required
//! key names the key and the section tag instead.

use tsim_ini::IniSection;

use crate::error::{EventError, EventResult};

/// Fetch a required key's raw value.
fn require<'a>(sec: &'a IniSection, key: &str) -> EventResult<&'a str> {
    sec.get_value(key)
        .ok_or_else(|| EventError::missing(sec.tag(), key))
}

fn is_valid_id(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse an object identifier: one or more of `[A-Za-z0-9_]`.
pub fn parse_id(sec: &IniSection, key: &str) -> EventResult<String> {
    let value = require(sec, key)?;
    if !is_valid_id(value) {
        return Err(EventError::bad_value(key, value, "not a valid identifier"));
    }
    Ok(value.to_string())
}

/// Parse a non-negative integer with a lower bound.
pub fn parse_int(sec: &IniSection, key: &str, min: u32) -> EventResult<u32> {
    let value = require(sec, key)?;
    parse_int_value(key, value, min)
}

/// Like [`parse_int`], but an absent key yields `default`.
pub fn parse_int_or(sec: &IniSection, key: &str, min: u32, default: u32) -> EventResult<u32> {
    match sec.get_value(key) {
        None => Ok(default),
        Some(value) => parse_int_value(key, value, min),
    }
}

fn parse_int_value(key: &str, value: &str, min: u32) -> EventResult<u32> {
    let n: u32 = value
        .parse()
        .map_err(|_| EventError::bad_value(key, value, "not an integer"))?;
    if n < min {
        return Err(EventError::bad_value(key, value, format!("must be at least {min}")));
    }
    Ok(n)
}

/// Parse a float within `[min, max]`.
pub fn parse_double(sec: &IniSection, key: &str, min: f64, max: f64) -> EventResult<f64> {
    let value = require(sec, key)?;
    let x: f64 = value
        .parse()
        .map_err(|_| EventError::bad_value(key, value, "not a number"))?;
    if x < min || x > max {
        return Err(EventError::bad_value(
            key,
            value,
            format!("must be within [{min}, {max}]"),
        ));
    }
    Ok(x)
}

/// Parse a non-empty list of identifiers, split on commas and whitespace.
pub fn parse_id_list(sec: &IniSection, key: &str) -> EventResult<Vec<String>> {
    let value = require(sec, key)?;
    let ids: Vec<String> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        return Err(EventError::bad_value(key, value, "empty identifier list"));
    }
    for id in &ids {
        if !is_valid_id(id) {
            return Err(EventError::bad_value(key, id, "not a valid identifier"));
        }
    }
    Ok(ids)
}
