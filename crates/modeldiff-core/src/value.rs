//! Attribute values extracted from records.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::schema::RecordRef;

/// A single attribute value.
///
/// `Null` marks absence. Relation fields carry [`Value::Record`] or
/// [`Value::Records`]; records compare equal when they share model and primary
/// key, or are the same instance when unsaved.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Json(serde_json::Value),
    Record(RecordRef),
    Records(Vec<RecordRef>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Concrete type name; for records this is the model name.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Json(_) => "json",
            Value::Record(record) => record.model(),
            Value::Records(_) => "records",
        }
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[RecordRef]> {
        match self {
            Value::Records(records) => Some(records),
            _ => None,
        }
    }
}

/// Record identity: same model and primary key, or the same unsaved instance.
pub fn same_record(a: &RecordRef, b: &RecordRef) -> bool {
    if a.model() != b.model() {
        return false;
    }
    match (a.pk(), b.pk()) {
        (Some(pk_a), Some(pk_b)) => pk_a == pk_b,
        _ => Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>(),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => same_record(a, b),
            (Value::Records(a), Value::Records(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_record(x, y))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("-"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::DateTime(v) => f.write_str(&v.to_rfc3339()),
            Value::Json(v) => write!(f, "{}", v),
            Value::Record(record) => f.write_str(&record.display()),
            Value::Records(records) => {
                let shown: Vec<String> = records.iter().map(|r| r.display()).collect();
                f.write_str(&shown.join(", "))
            }
        }
    }
}

// Render contexts and summaries carry values as JSON; records collapse to
// their display string.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Date(_) | Value::DateTime(_) => serializer.serialize_str(&self.to_string()),
            Value::Json(v) => v.serialize(serializer),
            Value::Record(record) => serializer.serialize_str(&record.display()),
            Value::Records(records) => {
                let mut seq = serializer.serialize_seq(Some(records.len()))?;
                for record in records {
                    seq.serialize_element(&record.display())?;
                }
                seq.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<RecordRef> for Value {
    fn from(v: RecordRef) -> Self {
        Value::Record(v)
    }
}

impl From<Vec<RecordRef>> for Value {
    fn from(v: Vec<RecordRef>) -> Self {
        Value::Records(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::memory::MemoryRecord;

    #[test]
    fn test_scalar_equality_is_type_strict() {
        assert_eq!(Value::from(5), Value::Int(5));
        assert_ne!(Value::from(5), Value::from("5"));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Null, Value::Null);
    }

    #[test]
    fn test_records_compare_by_model_and_pk() {
        let a = MemoryRecord::new("Pet").with_pk(1).set("name", "Rex").into_ref();
        let b = MemoryRecord::new("Pet").with_pk(1).set("name", "Max").into_ref();
        let c = MemoryRecord::new("Pet").with_pk(2).into_ref();
        let d = MemoryRecord::new("Toy").with_pk(1).into_ref();

        assert!(same_record(&a, &b));
        assert!(!same_record(&a, &c));
        assert!(!same_record(&a, &d));
    }

    #[test]
    fn test_unsaved_records_compare_by_instance() {
        let a = MemoryRecord::new("Pet").into_ref();
        let b = MemoryRecord::new("Pet").into_ref();
        assert!(same_record(&a, &a.clone()));
        assert!(!same_record(&a, &b));
    }

    #[test]
    fn test_type_name_uses_model_for_records() {
        let pet = MemoryRecord::new("Pet").into_ref();
        assert_eq!(Value::Record(pet).type_name(), "Pet");
        assert_eq!(Value::from("x").type_name(), "text");
        assert_eq!(Value::Records(vec![]).type_name(), "records");
    }

    #[test]
    fn test_serialize_records_as_display() {
        let pet = MemoryRecord::new("Pet").with_pk(3).into_ref();
        let json = serde_json::to_value(Value::Records(vec![pet])).unwrap();
        assert_eq!(json, serde_json::json!(["Pet (3)"]));
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }
}
