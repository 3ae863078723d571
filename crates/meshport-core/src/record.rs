//! # Loosely-Typed Records
//!
//! The registry reports entities as free-form JSON objects. Nothing about
//! their shape is guaranteed, so every read goes through a checked cast:
//!
//! - [`Field`] is a tagged view of one value (`Text`, `Map`, `List`, `Other`, `Absent`)
//! - [`Record`] wraps one JSON object and hands out `Field`s by name
//! - A failed cast yields a [`CastError`]; the caller logs it and skips the entry
//!
//! No accessor in this module panics.

use serde_json::{Map, Value};
use thiserror::Error;

// =============================================================================
// CAST ERROR
// =============================================================================

/// A field did not have the expected shape.
///
/// Local to one entry: the entry is skipped, classification continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}`: expected {expected}, found {found}")]
pub struct CastError {
    /// Name (or path) of the field.
    pub field: String,
    /// Shape that was expected.
    pub expected: &'static str,
    /// Shape that was found.
    pub found: &'static str,
}

// =============================================================================
// FIELD
// =============================================================================

/// Tagged view of a JSON value of unknown shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    /// A string.
    Text(&'a str),
    /// A nested object.
    Map(&'a Map<String, Value>),
    /// A sequence.
    List(&'a [Value]),
    /// A number or a boolean.
    Other(&'a Value),
    /// Missing or `null`.
    Absent,
}

impl<'a> Field<'a> {
    /// View an optional value.
    #[must_use]
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(s)) => Self::Text(s),
            Some(Value::Object(map)) => Self::Map(map),
            Some(Value::Array(items)) => Self::List(items),
            Some(other) => Self::Other(other),
        }
    }

    /// Human name of the shape, used in log messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Map(_) => "mapping",
            Self::List(_) => "sequence",
            Self::Other(Value::Bool(_)) => "boolean",
            Self::Other(_) => "number",
            Self::Absent => "nothing",
        }
    }

    /// True for `Absent`.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Cast to a string.
    pub fn text(self, field: &str) -> Result<&'a str, CastError> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(other.mismatch(field, "string")),
        }
    }

    /// Cast to a string, treating `Absent` as the empty string.
    pub fn text_or_empty(self, field: &str) -> Result<&'a str, CastError> {
        match self {
            Self::Absent => Ok(""),
            other => other.text(field),
        }
    }

    /// Cast to a nested record.
    pub fn record(self, field: &str) -> Result<Record<'a>, CastError> {
        match self {
            Self::Map(map) => Ok(Record(map)),
            other => Err(other.mismatch(field, "mapping")),
        }
    }

    /// Cast to a sequence.
    pub fn list(self, field: &str) -> Result<&'a [Value], CastError> {
        match self {
            Self::List(items) => Ok(items),
            other => Err(other.mismatch(field, "sequence")),
        }
    }

    fn mismatch(&self, field: &str, expected: &'static str) -> CastError {
        CastError {
            field: field.to_string(),
            expected,
            found: self.kind(),
        }
    }
}

impl<'a> From<&'a Value> for Field<'a> {
    fn from(value: &'a Value) -> Self {
        Self::of(Some(value))
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// One JSON object with checked, by-name access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a>(&'a Map<String, Value>);

impl<'a> Record<'a> {
    /// View `value` as a record.
    pub fn from_value(value: &'a Value, what: &str) -> Result<Self, CastError> {
        Field::from(value).record(what)
    }

    /// Field `name`, `Absent` if missing.
    #[must_use]
    pub fn field(&self, name: &str) -> Field<'a> {
        Field::of(self.0.get(name))
    }

    /// String field `name`.
    pub fn text(&self, name: &str) -> Result<&'a str, CastError> {
        self.field(name).text(name)
    }

    /// String field `name`, empty when missing.
    pub fn text_or_empty(&self, name: &str) -> Result<&'a str, CastError> {
        self.field(name).text_or_empty(name)
    }

    /// Nested record `name`.
    pub fn record(&self, name: &str) -> Result<Record<'a>, CastError> {
        self.field(name).record(name)
    }

    /// Sequence field `name`.
    pub fn list(&self, name: &str) -> Result<&'a [Value], CastError> {
        self.field(name).list(name)
    }

    /// True if the object has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
