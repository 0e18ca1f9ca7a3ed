//! Attribute snapshots: a flat name → value extraction of one record.

use std::collections::BTreeMap;

use crate::errors::{ModelDiffError, Result};
use crate::schema::{FieldKind, FieldMeta, RecordRef, Schema};
use crate::value::Value;

/// Values of one record, keyed by field name.
///
/// Missing names read as [`Value::Null`]; an absent record yields an empty
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    values: BTreeMap<String, Value>,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }
}

/// Extract the schema fields of `record` into a snapshot.
///
/// `fields` restricts extraction to the named fields when given; `exclude`
/// always wins. Relation values are normalized: single relations become
/// `Record` or `Null`, multiple relations become a (possibly empty)
/// `Records` list.
///
/// # Errors
///
/// - `UnknownModel` if the schema does not know the record's model
/// - `UnexpectedValue` if a relation attribute holds a non-record value
pub fn extract_snapshot(
    schema: &dyn Schema,
    record: Option<&RecordRef>,
    fields: Option<&[String]>,
    exclude: &[String],
) -> Result<Snapshot> {
    let mut snapshot = Snapshot::default();
    let Some(record) = record else {
        return Ok(snapshot);
    };

    for meta in schema.declared_fields(record.model())? {
        if fields.is_some_and(|names| !names.contains(&meta.name)) {
            continue;
        }
        if exclude.contains(&meta.name) {
            continue;
        }
        let raw = record.value(&meta.name).unwrap_or_default();
        snapshot.insert(meta.name.clone(), normalize(meta, raw)?);
    }

    Ok(snapshot)
}

fn normalize(meta: &FieldMeta, raw: Value) -> Result<Value> {
    match meta.kind {
        FieldKind::Scalar => Ok(raw),
        FieldKind::OneToOne | FieldKind::ForeignKey => match raw {
            Value::Null | Value::Record(_) => Ok(raw),
            other => Err(unexpected(meta, "record", &other)),
        },
        FieldKind::ManyToMany | FieldKind::ReverseManyToOne => match raw {
            Value::Null => Ok(Value::Records(Vec::new())),
            Value::Records(_) => Ok(raw),
            other => Err(unexpected(meta, "records", &other)),
        },
    }
}

fn unexpected(meta: &FieldMeta, expected: &str, found: &Value) -> ModelDiffError {
    ModelDiffError::UnexpectedValue {
        field: meta.name.clone(),
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::memory::{MemoryRecord, MemorySchema};
    use crate::schema::ModelMeta;

    fn schema() -> MemorySchema {
        MemorySchema::new()
            .with_model(
                ModelMeta::new("Person", "Person")
                    .field(FieldMeta::scalar("name", "Name"))
                    .field(FieldMeta::scalar("age", "Age"))
                    .field(FieldMeta::one_to_one("passport", "Passport", "Passport"))
                    .field(FieldMeta::reverse_many_to_one("pets", "Pet", "Pets")),
            )
            .with_model(ModelMeta::new("Passport", "Passport"))
            .with_model(ModelMeta::new("Pet", "Pet"))
    }

    #[test]
    fn test_absent_record_gives_empty_snapshot() {
        let snapshot = extract_snapshot(&schema(), None, None, &[]).unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.get("name"), Value::Null);
    }

    #[test]
    fn test_relations_are_normalized() {
        let person = MemoryRecord::new("Person").set("name", "Alice").into_ref();
        let snapshot = extract_snapshot(&schema(), Some(&person), None, &[]).unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.get("age"), Value::Null);
        assert_eq!(snapshot.get("passport"), Value::Null);
        assert_eq!(snapshot.get("pets"), Value::Records(vec![]));
    }

    #[test]
    fn test_include_and_exclude_filters() {
        let person = MemoryRecord::new("Person")
            .set("name", "Alice")
            .set("age", 30)
            .into_ref();
        let include = vec!["name".to_string(), "age".to_string()];
        let exclude = vec!["age".to_string()];
        let snapshot = extract_snapshot(&schema(), Some(&person), Some(&include), &exclude).unwrap();

        let names: Vec<_> = snapshot.names().collect();
        assert_eq!(names, vec!["name"]);
    }

    #[test]
    fn test_scalar_in_relation_field_is_rejected() {
        let person = MemoryRecord::new("Person").set("passport", "P-123").into_ref();
        let err = extract_snapshot(&schema(), Some(&person), None, &[]).unwrap_err();
        assert!(matches!(err, ModelDiffError::UnexpectedValue { ref field, .. } if field == "passport"));
    }
}
