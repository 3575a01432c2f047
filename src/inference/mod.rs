//! Value kinds and assignability rules for dynamic records.
//!
//! A `serde_json::Value` object carries no declared field types, so the
//! current value of each slot stands in for its type. This module classifies
//! values into kinds and decides whether a slot of one kind can take a value
//! of another, converting the value where a widening or quoted coercion
//! applies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};
use std::fmt;

use crate::error::SkipReason;

/// Detect integers inside quotes.
static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?\d+$").unwrap());

/// Detect floats inside quotes.
static FLOAT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?$").unwrap());

/// Kind of a dynamic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null` - an untyped slot
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    /// A nested object
    Record,
}

impl ValueKind {
    /// Classify a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ValueKind::Integer
                } else {
                    ValueKind::Float
                }
            }
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Record,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Record => "record",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check if a string matches the INTEGER pattern.
pub fn is_integer_string(s: &str) -> bool {
    INTEGER_REGEX.is_match(s)
}

/// Check if a string matches the FLOAT pattern.
pub fn is_float_string(s: &str) -> bool {
    FLOAT_REGEX.is_match(s)
}

/// Check if a string represents a boolean value.
pub fn is_boolean_string(s: &str) -> bool {
    let lower = s.to_lowercase();
    lower == "true" || lower == "false"
}

/// Kind of primitive a quoted string holds, if any.
///
/// Integers that overflow `i64` are reported as floats.
pub fn quoted_kind(s: &str) -> Option<ValueKind> {
    if is_integer_string(s) {
        if s.parse::<i64>().is_ok() {
            return Some(ValueKind::Integer);
        }
        return Some(ValueKind::Float);
    }
    if is_float_string(s) {
        return Some(ValueKind::Float);
    }
    if is_boolean_string(s) {
        return Some(ValueKind::Boolean);
    }
    None
}

/// Parse a quoted primitive into the JSON value it spells.
pub fn unquote(s: &str) -> Option<Value> {
    match quoted_kind(s)? {
        ValueKind::Integer => s.parse::<i64>().ok().map(Value::from),
        ValueKind::Float => float_value(s.parse::<f64>().ok()),
        ValueKind::Boolean => Some(Value::Bool(s.eq_ignore_ascii_case("true"))),
        _ => None,
    }
}

/// Decide whether `incoming` can be stored in a slot currently holding `slot`.
///
/// Returns the value to store, which differs from `incoming` only when a
/// conversion applies:
/// - `null` slots are untyped and take anything
/// - same kind is always accepted
/// - integers widen into float slots
/// - with `coerce_quoted`, quoted integers/floats/booleans are parsed into
///   integer, float and boolean slots
pub fn assign_value(
    slot: &Value,
    incoming: &Value,
    coerce_quoted: bool,
) -> Result<Value, SkipReason> {
    let slot_kind = ValueKind::of(slot);
    let incoming_kind = ValueKind::of(incoming);

    if slot_kind == ValueKind::Null || slot_kind == incoming_kind {
        return Ok(incoming.clone());
    }

    let mismatch = || SkipReason::kind_mismatch(slot_kind, incoming_kind);

    match (slot_kind, incoming) {
        (ValueKind::Float, Value::Number(n)) => float_value(n.as_f64()).ok_or_else(mismatch),
        (ValueKind::Integer | ValueKind::Float | ValueKind::Boolean, Value::String(s))
            if coerce_quoted =>
        {
            coerce_quoted_value(slot_kind, s).ok_or_else(mismatch)
        }
        _ => Err(mismatch()),
    }
}

/// Parse a quoted primitive into a value of the target kind.
fn coerce_quoted_value(target: ValueKind, s: &str) -> Option<Value> {
    let found = quoted_kind(s)?;
    match (target, found) {
        (ValueKind::Integer, ValueKind::Integer) => s.parse::<i64>().ok().map(Value::from),
        (ValueKind::Float, ValueKind::Integer | ValueKind::Float) => {
            float_value(s.parse::<f64>().ok())
        }
        (ValueKind::Boolean, ValueKind::Boolean) => Some(Value::Bool(s.eq_ignore_ascii_case("true"))),
        _ => None,
    }
}

fn float_value(f: Option<f64>) -> Option<Value> {
    f.and_then(Number::from_f64).map(Value::Number)
}
