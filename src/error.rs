//! Crate-level error types.

use std::fmt;

use crate::structure::StructureId;

/// Errors produced by the drawbridge crate.
///
/// Toggle admission never surfaces these; it reports a
/// [`ToggleOutcome`](crate::engine::ToggleOutcome) instead.
#[derive(Debug)]
pub enum DrawbridgeError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// No record exists for the structure.
    UnknownStructure(StructureId),
    /// The storage collaborator rejected a write.
    Storage(String),
}

impl fmt::Display for DrawbridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::UnknownStructure(id) => {
                write!(f, "no structure with id {id}")
            }
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for DrawbridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DrawbridgeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
