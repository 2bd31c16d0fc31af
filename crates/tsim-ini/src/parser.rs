//! `Ini` — a parsed sectioned-text document.

use std::io::{Read, Write};

use crate::error::{IniError, IniResult};
use crate::section::IniSection;

/// A whole document: sections in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ini {
    sections: Vec<IniSection>,
}

impl Ini {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from text.
    ///
    /// Grammar per line, after trimming:
    /// - empty line → closes the open section (if any)
    /// - `# …` → comment, ignored
    /// - `[tag]` → opens a new section (closing the previous one)
    /// - `key = value` → pair in the open section; the line is split at
    ///   the first `=`, both halves trimmed
    ///
    /// A pair outside any section, a malformed header, a pair without
    /// `=`, an empty key, or a duplicate key within one section are
    /// parse errors carrying the 1-based line number.
    pub fn parse(text: &str) -> IniResult<Ini> {
        let mut sections: Vec<IniSection> = Vec::new();
        let mut open: Option<IniSection> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() {
                if let Some(sec) = open.take() {
                    sections.push(sec);
                }
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('[') {
                let tag = rest
                    .strip_suffix(']')
                    .ok_or_else(|| IniError::parse(line_no, format!("unterminated section header {line:?}")))?
                    .trim();
                if tag.is_empty() {
                    return Err(IniError::parse(line_no, "empty section tag"));
                }
                if let Some(sec) = open.take() {
                    sections.push(sec);
                }
                open = Some(IniSection::new(tag));
                continue;
            }

            // key = value
            let sec = open
                .as_mut()
                .ok_or_else(|| IniError::parse(line_no, format!("{line:?} outside of any section")))?;
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| IniError::parse(line_no, format!("expected `key = value`, got {line:?}")))?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() {
                return Err(IniError::parse(line_no, "empty key"));
            }
            if sec.get_value(key).is_some() {
                return Err(IniError::parse(
                    line_no,
                    format!("duplicate key {key:?} in section [{}]", sec.tag()),
                ));
            }
            sec.set_value(key, value);
        }

        if let Some(sec) = open.take() {
            sections.push(sec);
        }
        Ok(Ini { sections })
    }

    /// Read and parse a document from any `Read` source.
    ///
    /// Useful for loading scenario files; tests pass a `Cursor`.
    pub fn read_from<R: Read>(mut reader: R) -> IniResult<Ini> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ini::parse(&text)
    }

    /// Append a section.
    pub fn add_section(&mut self, section: IniSection) {
        self.sections.push(section);
    }

    /// The sections in file order.
    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Emit every section in canonical form.
    pub fn store<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for sec in &self.sections {
            sec.store(w)?;
        }
        Ok(())
    }
}
