//! JSON objects as dynamic records.
//!
//! Every key of a `Value::Object` is a settable field. Field types come from
//! the current values (see [`crate::inference`]). `Value::Null` is treated as
//! an absent record and any other variant is not a record.

use serde_json::Value;

use super::{FieldDescriptor, NotRecord, Record};
use crate::error::SkipReason;
use crate::inference::{assign_value, ValueKind};

impl Record for Value {
    fn record_name(&self) -> String {
        match self {
            Value::Object(_) => "object".to_string(),
            other => ValueKind::of(other).to_string(),
        }
    }

    fn describe(&self) -> Result<Vec<FieldDescriptor>, NotRecord> {
        match self {
            Value::Object(obj) => Ok(obj
                .iter()
                .map(|(key, value)| {
                    FieldDescriptor::new(key.as_str(), ValueKind::of(value).as_str(), true)
                })
                .collect()),
            Value::Null => Err(NotRecord::Absent),
            other => Err(NotRecord::Other(ValueKind::of(other).to_string())),
        }
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        self.as_object()?.get(name).cloned()
    }

    fn check_field(
        &self,
        name: &str,
        value: &Value,
        coerce_quoted: bool,
    ) -> Result<Value, SkipReason> {
        let slot = self
            .as_object()
            .and_then(|obj| obj.get(name))
            .ok_or(SkipReason::NoSuchField)?;
        assign_value(slot, value, coerce_quoted)
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), SkipReason> {
        let slot = self
            .as_object_mut()
            .and_then(|obj| obj.get_mut(name))
            .ok_or(SkipReason::NoSuchField)?;
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_object_preserves_key_order() {
        let record = json!({"ID": "Lock", "CorrelationNumber": 123, "Ratio": 0.5});
        let fields = record.describe().unwrap();
        assert_eq!(
            fields,
            vec![
                FieldDescriptor::new("ID", "string", true),
                FieldDescriptor::new("CorrelationNumber", "integer", true),
                FieldDescriptor::new("Ratio", "float", true),
            ]
        );
    }

    #[test]
    fn test_describe_empty_object() {
        assert!(json!({}).describe().unwrap().is_empty());
    }

    #[test]
    fn test_describe_null_is_absent() {
        assert_eq!(Value::Null.describe(), Err(NotRecord::Absent));
    }

    #[test]
    fn test_describe_non_objects() {
        assert_eq!(json!(1).describe(), Err(NotRecord::Other("integer".to_string())));
        assert_eq!(json!([1]).describe(), Err(NotRecord::Other("array".to_string())));
        assert_eq!(json!("s").describe(), Err(NotRecord::Other("string".to_string())));
    }

    #[test]
    fn test_record_name() {
        assert_eq!(json!({}).record_name(), "object");
        assert_eq!(json!(true).record_name(), "boolean");
    }

    #[test]
    fn test_get_field() {
        let record = json!({"a": 1});
        assert_eq!(record.get_field("a"), Some(json!(1)));
        assert_eq!(record.get_field("b"), None);
        assert_eq!(json!(5).get_field("a"), None);
    }

    #[test]
    fn test_check_field_uses_slot_kind() {
        let record = json!({"ID": "", "Price": 0.0});
        assert_eq!(record.check_field("ID", &json!("Lock"), false), Ok(json!("Lock")));
        assert_eq!(record.check_field("Price", &json!(123), false), Ok(json!(123.0)));
        assert!(matches!(
            record.check_field("ID", &json!(1), false),
            Err(SkipReason::TypeMismatch { .. })
        ));
        assert_eq!(
            record.check_field("Missing", &json!(1), false),
            Err(SkipReason::NoSuchField)
        );
    }

    #[test]
    fn test_set_field() {
        let mut record = json!({"ID": ""});
        record.set_field("ID", json!("Lock")).unwrap();
        assert_eq!(record, json!({"ID": "Lock"}));
        assert_eq!(record.set_field("Other", json!(1)), Err(SkipReason::NoSuchField));
        assert_eq!(record, json!({"ID": "Lock"}));
    }
}
