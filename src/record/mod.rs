//! Record introspection.
//!
//! The mapper never looks at concrete types. It works through the [`Record`]
//! trait, which enumerates named fields, reads a field as a dynamic
//! [`Value`], checks whether a field accepts a value and assigns it in place.
//!
//! Typed structs get an implementation from [`impl_record!`](crate::impl_record);
//! `serde_json::Value` objects are records out of the box (see [`json`]).

mod finite;
pub mod json;
mod macros;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use crate::error::{Error, RecordRole, SkipReason};
use crate::inference::{unquote, ValueKind};

pub use serde_json::Value;

/// Strips module paths from `std::any::type_name` output.
static MODULE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z_][a-z0-9_]*::").unwrap());

/// One named field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as seen by the mapper
    pub name: String,
    /// Declared type for typed records, current value kind for dynamic ones
    pub type_name: String,
    /// Whether the mapper may write this field
    pub settable: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, settable: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            settable,
        }
    }
}

/// Why a value cannot be introspected as a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotRecord {
    /// Absent reference (`None`, JSON `null`)
    Absent,
    /// Some other kind of value, named by the payload
    Other(String),
}

impl NotRecord {
    /// Attach the role the value was passed in.
    pub fn into_error(self, role: RecordRole) -> Error {
        match self {
            NotRecord::Absent => Error::AbsentRecord { role },
            NotRecord::Other(found) => Error::NotARecord { role, found },
        }
    }
}

impl fmt::Display for NotRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotRecord::Absent => write!(f, "absent"),
            NotRecord::Other(found) => write!(f, "{}", found),
        }
    }
}

/// A structured value exposing named fields.
pub trait Record {
    /// Human readable name of the record type.
    fn record_name(&self) -> String;

    /// Fields in declaration order.
    fn describe(&self) -> Result<Vec<FieldDescriptor>, NotRecord>;

    /// Read a field as a dynamic value.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Check that `value` could be assigned to field `name`.
    ///
    /// Returns the value to store, which may be a converted form of `value`.
    /// With `coerce_quoted`, quoted primitives like `"123"` may be parsed
    /// into numeric or boolean fields.
    fn check_field(&self, name: &str, value: &Value, coerce_quoted: bool)
        -> Result<Value, SkipReason>;

    /// Assign a value previously returned by [`Record::check_field`].
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), SkipReason>;
}

impl<T: Record> Record for Option<T> {
    fn record_name(&self) -> String {
        match self {
            Some(inner) => inner.record_name(),
            None => "None".to_string(),
        }
    }

    fn describe(&self) -> Result<Vec<FieldDescriptor>, NotRecord> {
        match self {
            Some(inner) => inner.describe(),
            None => Err(NotRecord::Absent),
        }
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        self.as_ref()?.get_field(name)
    }

    fn check_field(
        &self,
        name: &str,
        value: &Value,
        coerce_quoted: bool,
    ) -> Result<Value, SkipReason> {
        match self {
            Some(inner) => inner.check_field(name, value, coerce_quoted),
            None => Err(SkipReason::NoSuchField),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), SkipReason> {
        match self {
            Some(inner) => inner.set_field(name, value),
            None => Err(SkipReason::NoSuchField),
        }
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn record_name(&self) -> String {
        (**self).record_name()
    }

    fn describe(&self) -> Result<Vec<FieldDescriptor>, NotRecord> {
        (**self).describe()
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        (**self).get_field(name)
    }

    fn check_field(
        &self,
        name: &str,
        value: &Value,
        coerce_quoted: bool,
    ) -> Result<Value, SkipReason> {
        (**self).check_field(name, value, coerce_quoted)
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), SkipReason> {
        (**self).set_field(name, value)
    }
}

/// `std::any::type_name` without module paths, e.g. `Option<String>`.
pub fn short_type_name<T: ?Sized>() -> String {
    MODULE_PATH
        .replace_all(std::any::type_name::<T>(), "")
        .into_owned()
}

/// Short type name of the value behind a reference.
pub fn type_name_of<T: ?Sized>(_: &T) -> String {
    short_type_name::<T>()
}

/// Serialize a field into a dynamic value.
///
/// Returns `None` when JSON cannot hold the value: non-finite floats
/// (which `serde_json` would turn into `null`) and integers beyond the
/// 64-bit range.
pub fn field_value<T: Serialize + ?Sized>(field: &T) -> Option<Value> {
    if !finite::is_json_representable(field) {
        return None;
    }
    serde_json::to_value(field).ok()
}

/// Check that `value` deserializes into the type of `slot`.
///
/// serde_json already accepts integers for float types, which gives the
/// usual integer to float widening.
pub fn check_typed<T: DeserializeOwned>(
    _slot: &T,
    value: &Value,
    coerce_quoted: bool,
) -> Result<Value, SkipReason> {
    if serde_json::from_value::<T>(value.clone()).is_ok() {
        return Ok(value.clone());
    }

    if coerce_quoted {
        if let Some(unquoted) = value.as_str().and_then(unquote) {
            if serde_json::from_value::<T>(unquoted.clone()).is_ok() {
                return Ok(unquoted);
            }
        }
    }

    Err(SkipReason::TypeMismatch {
        expected: short_type_name::<T>(),
        found: ValueKind::of(value).to_string(),
    })
}

/// Deserialize `value` into `slot`, replacing its contents.
pub fn assign_typed<T: DeserializeOwned>(slot: &mut T, value: Value) -> Result<(), SkipReason> {
    let found = ValueKind::of(&value);
    *slot = serde_json::from_value(value).map_err(|_| SkipReason::TypeMismatch {
        expected: short_type_name::<T>(),
        found: found.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i64,
        y: f64,
        label: Option<String>,
        origin: bool,
    }

    crate::impl_record!(Point { x, y, label } readonly { origin });

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<String>(), "String");
        assert_eq!(short_type_name::<Option<String>>(), "Option<String>");
        assert_eq!(short_type_name::<Vec<i64>>(), "Vec<i64>");
        assert_eq!(short_type_name::<f64>(), "f64");
    }

    #[test]
    fn test_describe_lists_fields_in_order() {
        let point = Point::default();
        let fields = point.describe().unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "label", "origin"]);
        assert_eq!(fields[0].type_name, "i64");
        assert_eq!(fields[2].type_name, "Option<String>");
        assert!(fields[0].settable);
        assert!(!fields[3].settable);
    }

    #[test]
    fn test_record_name() {
        assert_eq!(Point::default().record_name(), "Point");
    }

    #[test]
    fn test_get_field() {
        let point = Point {
            x: 3,
            y: 1.5,
            label: Some("a".to_string()),
            origin: true,
        };
        assert_eq!(point.get_field("x"), Some(json!(3)));
        assert_eq!(point.get_field("y"), Some(json!(1.5)));
        assert_eq!(point.get_field("label"), Some(json!("a")));
        assert_eq!(point.get_field("origin"), Some(json!(true)));
        assert_eq!(point.get_field("z"), None);
    }

    #[test]
    fn test_check_field() {
        let point = Point::default();
        assert_eq!(point.check_field("x", &json!(7), false), Ok(json!(7)));
        assert_eq!(point.check_field("y", &json!(7), false), Ok(json!(7)));
        assert_eq!(point.check_field("label", &Value::Null, false), Ok(Value::Null));
        assert_eq!(
            point.check_field("x", &json!("7"), false),
            Err(SkipReason::TypeMismatch {
                expected: "i64".to_string(),
                found: "string".to_string(),
            })
        );
        assert_eq!(
            point.check_field("origin", &json!(false), false),
            Err(SkipReason::NotSettable)
        );
        assert_eq!(
            point.check_field("z", &json!(1), false),
            Err(SkipReason::NoSuchField)
        );
    }

    #[test]
    fn test_check_field_coerces_quoted_values() {
        let point = Point::default();
        assert_eq!(point.check_field("x", &json!("7"), true), Ok(json!(7)));
        assert_eq!(point.check_field("y", &json!("2.5"), true), Ok(json!(2.5)));
        assert!(point.check_field("x", &json!("seven"), true).is_err());
    }

    #[test]
    fn test_get_field_unrepresentable_values() {
        #[derive(Debug, Default)]
        struct Reading {
            value: f64,
            maybe: Option<f64>,
            big: i128,
        }
        crate::impl_record!(Reading { value, maybe, big });

        let reading = Reading {
            value: f64::INFINITY,
            maybe: Some(f64::NEG_INFINITY),
            big: i128::MAX,
        };
        assert_eq!(reading.get_field("value"), None);
        assert_eq!(reading.get_field("maybe"), None);
        assert_eq!(reading.get_field("big"), None);

        let reading = Reading {
            value: 2.5,
            maybe: None,
            big: 7,
        };
        assert_eq!(reading.get_field("value"), Some(json!(2.5)));
        assert_eq!(reading.get_field("maybe"), Some(Value::Null));
        assert_eq!(reading.get_field("big"), Some(json!(7)));
    }

    #[test]
    fn test_set_field() {
        let mut point = Point::default();
        point.set_field("x", json!(9)).unwrap();
        point.set_field("y", json!(4)).unwrap();
        point.set_field("label", json!("p")).unwrap();
        assert_eq!(point.x, 9);
        assert_eq!(point.y, 4.0);
        assert_eq!(point.label.as_deref(), Some("p"));
        assert_eq!(point.set_field("origin", json!(true)), Err(SkipReason::NotSettable));
        assert!(!point.origin);
    }

    #[test]
    fn test_set_field_rejects_wrong_type_and_keeps_value() {
        let mut point = Point {
            x: 5,
            ..Point::default()
        };
        assert!(point.set_field("x", json!("five")).is_err());
        assert_eq!(point.x, 5);
    }

    #[test]
    fn test_option_none_is_absent() {
        let missing: Option<Point> = None;
        assert_eq!(missing.describe(), Err(NotRecord::Absent));
        assert_eq!(missing.get_field("x"), None);
        assert_eq!(missing.record_name(), "None");
    }

    #[test]
    fn test_option_some_forwards() {
        let mut present = Some(Point::default());
        present.set_field("x", json!(1)).unwrap();
        assert_eq!(present.get_field("x"), Some(json!(1)));
        assert_eq!(present.describe().unwrap().len(), 4);
    }

    #[test]
    fn test_boxed_dyn_record() {
        let mut boxed: Box<dyn Record> = Box::new(Point::default());
        boxed.set_field("x", json!(2)).unwrap();
        assert_eq!(boxed.get_field("x"), Some(json!(2)));
        assert_eq!(boxed.record_name(), "Point");
    }

    #[test]
    fn test_not_record_into_error() {
        assert!(matches!(
            NotRecord::Absent.into_error(RecordRole::Source),
            Error::AbsentRecord {
                role: RecordRole::Source
            }
        ));
        assert!(matches!(
            NotRecord::Other("array".to_string()).into_error(RecordRole::Destination),
            Error::NotARecord {
                role: RecordRole::Destination,
                ..
            }
        ));
    }
}
