//! In-memory schema and record implementation.
//!
//! Useful for tests, fixtures and for comparing data that was already
//! materialized outside a database (e.g. decoded from JSON).

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::schema::{ModelMeta, Record, RecordRef, Schema};
use crate::value::Value;

/// Schema backed by a map of model metadata.
#[derive(Debug, Clone, Default)]
pub struct MemorySchema {
    models: BTreeMap<String, ModelMeta>,
}

impl MemorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model (builder style)
    pub fn with_model(mut self, model: ModelMeta) -> Self {
        self.insert(model);
        self
    }

    /// Add or replace a model
    pub fn insert(&mut self, model: ModelMeta) {
        self.models.insert(model.name.clone(), model);
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Wrap into a shareable schema handle
    pub fn into_shared(self) -> Arc<dyn Schema> {
        Arc::new(self)
    }
}

impl Schema for MemorySchema {
    fn model(&self, name: &str) -> Option<&ModelMeta> {
        self.models.get(name)
    }
}

/// Record holding its attributes in a map.
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    model: String,
    pk: Option<Value>,
    values: BTreeMap<String, Value>,
}

impl MemoryRecord {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            pk: None,
            values: BTreeMap::new(),
        }
    }

    pub fn with_pk(mut self, pk: impl Into<Value>) -> Self {
        self.pk = Some(pk.into());
        self
    }

    /// Set an attribute (builder style)
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn into_ref(self) -> RecordRef {
        Arc::new(self)
    }
}

impl Record for MemoryRecord {
    fn model(&self) -> &str {
        &self.model
    }

    fn pk(&self) -> Option<Value> {
        self.pk.clone().filter(|pk| !pk.is_null())
    }

    fn value(&self, field: &str) -> Option<Value> {
        self.values.get(field).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldMeta;

    #[test]
    fn test_memory_schema_lookup() {
        let schema = MemorySchema::new()
            .with_model(ModelMeta::new("Pet", "Pet").field(FieldMeta::scalar("name", "Name")));

        assert_eq!(schema.len(), 1);
        assert!(schema.model("Pet").is_some());
        assert!(schema.model("Person").is_none());
        assert_eq!(schema.declared_fields("Pet").unwrap().len(), 1);
        assert!(schema.declared_fields("Person").is_err());
    }

    #[test]
    fn test_memory_record_values() {
        let record = MemoryRecord::new("Pet")
            .with_pk(7)
            .set("name", "Rex")
            .into_ref();

        assert_eq!(record.model(), "Pet");
        assert_eq!(record.pk(), Some(Value::Int(7)));
        assert_eq!(record.value("name"), Some(Value::from("Rex")));
        assert_eq!(record.value("age"), None);
        assert_eq!(record.display(), "Pet (7)");
    }

    #[test]
    fn test_null_pk_is_unsaved() {
        let record = MemoryRecord::new("Pet").with_pk(Value::Null);
        assert_eq!(record.pk(), None);
    }
}
