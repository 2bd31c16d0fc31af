//! `IniSection` — one `[tag]` block with insertion-ordered key/value pairs.

use std::fmt;
use std::io::Write;

/// A single section: a tag plus key/value pairs in insertion order.
///
/// Key order is significant — report sections promise a fixed key order,
/// so pairs are kept in a `Vec` rather than a map.  Keys are unique within
/// a section; [`set_value`][Self::set_value] replaces in place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IniSection {
    tag: String,
    pairs: Vec<(String, String)>,
}

impl IniSection {
    /// Create an empty section with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), pairs: Vec::new() }
    }

    /// The section tag (the text between the brackets).
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up a key's value.  Returns `None` if the key is absent.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a key.  An existing key is replaced in place (keeping its
    /// position); a new key is appended.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Iterate the `(key, value)` pairs in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of key/value pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Write the section in canonical form: `[tag]`, one `key = value`
    /// line per pair, then a blank line.
    pub fn store<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        write!(w, "{self}")
    }
}

impl fmt::Display for IniSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.tag)?;
        for (k, v) in &self.pairs {
            writeln!(f, "{k} = {v}")?;
        }
        writeln!(f)
    }
}
