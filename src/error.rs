//! Error types for the struct mapper.

use std::fmt;

use thiserror::Error;

use crate::inference::ValueKind;

/// Which side of a mapping a record was passed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRole {
    Source,
    Destination,
}

impl RecordRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordRole::Source => "source",
            RecordRole::Destination => "destination",
        }
    }
}

impl fmt::Display for RecordRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a source field was not copied into the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The destination has no field with a matching name
    NoSuchField,
    /// The destination field exists but is read-only
    NotSettable,
    /// The destination field cannot hold the source value
    TypeMismatch { expected: String, found: String },
    /// An earlier source field already filled the same destination field
    AlreadyMapped { target: String },
    /// The source field could not be read as a value
    Unreadable,
}

impl SkipReason {
    /// Build a type mismatch between two dynamic value kinds.
    pub fn kind_mismatch(expected: ValueKind, found: ValueKind) -> Self {
        SkipReason::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoSuchField => write!(f, "no matching destination field"),
            SkipReason::NotSettable => write!(f, "destination field is read-only"),
            SkipReason::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            SkipReason::AlreadyMapped { target } => {
                write!(f, "destination field '{}' was already mapped", target)
            }
            SkipReason::Unreadable => write!(f, "source field could not be read"),
        }
    }
}

/// Main error type for the struct mapper.
#[derive(Error, Debug)]
pub enum Error {
    #[error("The {role} record is absent")]
    AbsentRecord { role: RecordRole },

    #[error("The {role} must be a structured record but was {found}")]
    NotARecord { role: RecordRole, found: String },

    #[error("Field '{field}' could not be mapped: {reason}")]
    FieldMismatch { field: String, reason: SkipReason },

    #[error("JSON parse error on line {line}: {message}")]
    JsonParse { line: usize, message: String },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(String),
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A source field that was left out of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    /// Field name as declared by the source
    pub name: String,
    /// Why the field was skipped
    pub reason: SkipReason,
}

impl fmt::Display for SkippedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}
