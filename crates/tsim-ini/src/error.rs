//! Error types for tsim-ini.

use thiserror::Error;

/// Errors raised while parsing or emitting sectioned text.
#[derive(Debug, Error)]
pub enum IniError {
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IniError {
    pub(crate) fn parse(line: usize, msg: impl Into<String>) -> Self {
        IniError::Parse { line, msg: msg.into() }
    }
}

/// Alias for `Result<T, IniError>`.
pub type IniResult<T> = Result<T, IniError>;
