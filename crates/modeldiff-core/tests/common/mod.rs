use std::sync::Arc;

use modeldiff_core::schema::memory::{MemoryRecord, MemorySchema};
use modeldiff_core::{ComparatorConfig, ComparatorDef, FieldMeta, ModelMeta, RecordRef, Schema};

/// People with a passport, an employer and pets.
///
/// `Person.passport` is one-to-one, `Person.company` a foreign key and
/// `Person.pets` the reverse side of `Pet.owner`.
#[allow(dead_code)]
pub fn test_schema() -> Arc<dyn Schema> {
    MemorySchema::new()
        .with_model(
            ModelMeta::new("Person", "Person")
                .field(FieldMeta::scalar("name", "Name"))
                .field(FieldMeta::scalar("age", "Age"))
                .field(FieldMeta::one_to_one("passport", "Passport", "Passport"))
                .field(FieldMeta::foreign_key("company", "Company", "Company"))
                .field(FieldMeta::reverse_many_to_one("pets", "Pet", "Pets")),
        )
        .with_model(
            ModelMeta::new("Passport", "Passport")
                .field(FieldMeta::scalar("number", "Number"))
                .field(FieldMeta::scalar("country", "Country")),
        )
        .with_model(
            ModelMeta::new("Company", "Company").field(FieldMeta::scalar("name", "Company name")),
        )
        .with_model(
            ModelMeta::new("Pet", "Pet")
                .field(FieldMeta::scalar("name", "Pet name"))
                .field(FieldMeta::scalar("species", "Species")),
        )
        .with_model(
            ModelMeta::new("Node", "Node")
                .field(FieldMeta::scalar("value", "Value"))
                .field(FieldMeta::one_to_one("parent", "Node", "Parent")),
        )
        .into_shared()
}

/// Comparator over the scalar fields of `Person`
#[allow(dead_code)]
pub fn scalar_person_def() -> Arc<ComparatorDef> {
    ComparatorDef::build(
        test_schema(),
        ComparatorConfig::new("PersonComparator")
            .model("Person")
            .fields(["name", "age"]),
    )
    .unwrap()
}

/// Comparator over every field of `Person`, relations included
#[allow(dead_code)]
pub fn person_def() -> Arc<ComparatorDef> {
    ComparatorDef::build(
        test_schema(),
        ComparatorConfig::new("PersonComparator")
            .model("Person")
            .all_fields(),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn person(pk: i64, name: &str, age: i64) -> MemoryRecord {
    MemoryRecord::new("Person")
        .with_pk(pk)
        .set("name", name)
        .set("age", age)
}

#[allow(dead_code)]
pub fn pet(pk: i64, name: &str, species: &str) -> RecordRef {
    MemoryRecord::new("Pet")
        .with_pk(pk)
        .set("name", name)
        .set("species", species)
        .into_ref()
}

#[allow(dead_code)]
pub fn passport(pk: i64, number: &str, country: &str) -> RecordRef {
    MemoryRecord::new("Passport")
        .with_pk(pk)
        .set("number", number)
        .set("country", country)
        .into_ref()
}

#[allow(dead_code)]
pub fn company(pk: i64, name: &str) -> RecordRef {
    MemoryRecord::new("Company")
        .with_pk(pk)
        .set("name", name)
        .into_ref()
}

/// A chain of `Node`s, each the parent of the next; returns the leaf.
#[allow(dead_code)]
pub fn node_chain(values: &[i64]) -> Option<RecordRef> {
    let mut parent: Option<RecordRef> = None;
    for (pk, value) in values.iter().enumerate() {
        let mut node = MemoryRecord::new("Node")
            .with_pk(pk as i64)
            .set("value", *value);
        if let Some(p) = parent.take() {
            node = node.set("parent", p);
        }
        parent = Some(node.into_ref());
    }
    parent
}
