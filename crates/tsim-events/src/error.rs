//! Error types for tsim-events.

use thiserror::Error;
use tsim_model::ModelError;

/// Errors raised while parsing or executing scenario events.
#[derive(Debug, Error)]
pub enum EventError {
    /// A recognised section is missing a required key.
    #[error("section [{section}] is missing key '{key}'")]
    MissingKey { section: String, key: String },

    /// A key is present but its value does not parse or is out of range.
    #[error("bad value '{value}' for key '{key}': {reason}")]
    BadValue { key: String, value: String, reason: String },

    /// No registered builder recognised the section tag.
    #[error("unknown section [{0}]")]
    UnknownSection(String),

    /// The event parsed but contradicts the current road map.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl EventError {
    pub(crate) fn missing(section: &str, key: &str) -> Self {
        EventError::MissingKey { section: section.to_string(), key: key.to_string() }
    }

    pub(crate) fn bad_value(key: &str, value: &str, reason: impl Into<String>) -> Self {
        EventError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Alias for `Result<T, EventError>`.
pub type EventResult<T> = Result<T, EventError>;
