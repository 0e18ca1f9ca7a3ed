//! Schema introspection boundary.
//!
//! The comparison engine never reads persisted data directly. It asks a
//! [`Schema`] for the declared fields of a model and reads attribute values
//! from a [`Record`]. [`memory`] provides an in-memory implementation of both.

pub mod memory;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelDiffError, Result};
use crate::value::Value;

/// Shared handle to an externally owned record.
pub type RecordRef = Arc<dyn Record>;

/// Relation kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain column value
    Scalar,
    /// Single related record owned one-to-one
    OneToOne,
    /// Single related record referenced by key
    ForeignKey,
    /// Related records through a join, compared as a list value
    ManyToMany,
    /// Records of another model pointing back at this one
    ReverseManyToOne,
}

impl FieldKind {
    pub fn is_relation(&self) -> bool {
        !matches!(self, FieldKind::Scalar)
    }

    /// Whether snapshot values of this kind are record lists
    pub fn is_multiple(&self) -> bool {
        matches!(self, FieldKind::ManyToMany | FieldKind::ReverseManyToOne)
    }
}

/// Metadata for one declared field of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub related_model: Option<String>,
    pub label: String,
}

impl FieldMeta {
    pub fn new(
        name: impl Into<String>,
        kind: FieldKind,
        related_model: Option<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            related_model,
            label: label.into(),
        }
    }

    pub fn scalar(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar, None, label)
    }

    pub fn one_to_one(
        name: impl Into<String>,
        related_model: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(name, FieldKind::OneToOne, Some(related_model.into()), label)
    }

    pub fn foreign_key(
        name: impl Into<String>,
        related_model: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(name, FieldKind::ForeignKey, Some(related_model.into()), label)
    }

    pub fn many_to_many(
        name: impl Into<String>,
        related_model: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(name, FieldKind::ManyToMany, Some(related_model.into()), label)
    }

    pub fn reverse_many_to_one(
        name: impl Into<String>,
        related_model: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FieldKind::ReverseManyToOne,
            Some(related_model.into()),
            label,
        )
    }
}

/// A model: its name, display label and fields in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub fields: Vec<FieldMeta>,
}

impl ModelMeta {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field (builder style)
    pub fn field(mut self, field: FieldMeta) -> Self {
        self.fields.push(field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Source of model metadata.
pub trait Schema: fmt::Debug + Send + Sync {
    /// Look up a model by name
    fn model(&self, name: &str) -> Option<&ModelMeta>;

    /// Declared fields of a model, in declaration order
    ///
    /// # Errors
    ///
    /// `UnknownModel` if the schema has no such model.
    fn declared_fields(&self, model: &str) -> Result<&[FieldMeta]> {
        self.model(model)
            .map(|m| m.fields.as_slice())
            .ok_or_else(|| ModelDiffError::UnknownModel {
                model: model.to_string(),
            })
    }
}

/// Read access to one persisted instance.
///
/// Relation-valued attributes return [`Value::Record`] / [`Value::Records`]
/// (or [`Value::Null`] when unset).
pub trait Record: fmt::Debug + Send + Sync {
    /// Model name of this instance
    fn model(&self) -> &str;

    /// Primary key, if the instance has been persisted
    fn pk(&self) -> Option<Value>;

    /// Raw attribute value; `None` when the attribute does not exist
    fn value(&self, field: &str) -> Option<Value>;

    /// Human-readable representation used in rendered output
    fn display(&self) -> String {
        match self.pk() {
            Some(pk) => format!("{} ({})", self.model(), pk),
            None => self.model().to_string(),
        }
    }
}
