//! Comparator catalogs loaded from TOML.
//!
//! A catalog declares several comparators at once and wires relation fields
//! to each other by name:
//!
//! ```toml
//! max_depth = 16
//!
//! [[comparator]]
//! name = "PetComparator"
//! model = "Pet"
//! fields = "__all__"
//!
//! [[comparator]]
//! name = "PersonComparator"
//! model = "Person"
//! fields = ["name", "age", "pets"]
//!
//! [comparator.related]
//! pets = "PetComparator"
//! ```
//!
//! Every declaration is built once, dependencies first.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::comparator::Comparator;
use crate::errors::{ModelDiffError, Result};
use crate::registry::{ComparatorConfig, ComparatorDef, FieldSpec};
use crate::render::Widget;
use crate::schema::{RecordRef, Schema};

/// Top-level catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Default nesting limit for every comparator
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default, rename = "comparator")]
    pub comparators: Vec<ComparatorDecl>,
}

/// One `[[comparator]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparatorDecl {
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub fields: Option<FieldSpec>,
    #[serde(default)]
    pub exclude: Option<FieldSpec>,
    /// Relation field → name of another comparator in the catalog
    #[serde(default)]
    pub related: BTreeMap<String, String>,
    /// Field → widget template
    #[serde(default)]
    pub widgets: BTreeMap<String, Widget>,
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Built comparator definitions, addressable by name.
#[derive(Debug, Default)]
pub struct Catalog {
    defs: BTreeMap<String, Arc<ComparatorDef>>,
    order: Vec<String>,
}

impl Catalog {
    /// # Errors
    ///
    /// `Serialization` for malformed TOML, otherwise see [`Catalog::build`].
    pub fn from_toml_str(schema: Arc<dyn Schema>, text: &str) -> Result<Self> {
        let config: CatalogConfig = toml::from_str(text)?;
        Self::build(schema, config)
    }

    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise see [`Catalog::from_toml_str`].
    pub fn from_path(schema: Arc<dyn Schema>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ModelDiffError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(schema, &text)
    }

    /// Build every declaration of `config`.
    ///
    /// # Errors
    ///
    /// - `ImproperlyConfigured` for duplicate names, references to unknown
    ///   comparators and circular references
    /// - any registry build error of a declaration
    pub fn build(schema: Arc<dyn Schema>, config: CatalogConfig) -> Result<Self> {
        let mut decls: BTreeMap<&str, &ComparatorDecl> = BTreeMap::new();
        for decl in &config.comparators {
            if decls.insert(decl.name.as_str(), decl).is_some() {
                return Err(ModelDiffError::ImproperlyConfigured {
                    comparator: decl.name.clone(),
                    reason: "declared more than once".to_string(),
                });
            }
        }

        let mut builder = Builder {
            schema,
            decls,
            default_max_depth: config.max_depth,
            built: BTreeMap::new(),
            visiting: Vec::new(),
        };
        for decl in &config.comparators {
            builder.resolve(&decl.name)?;
        }

        tracing::debug!(comparators = builder.built.len(), "catalog built");

        Ok(Self {
            defs: builder.built,
            order: config.comparators.iter().map(|d| d.name.clone()).collect(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ComparatorDef>> {
        self.defs.get(name)
    }

    /// Comparator names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Compare two records with the named comparator.
    ///
    /// # Errors
    ///
    /// `ImproperlyConfigured` if the catalog has no such comparator,
    /// otherwise see [`Comparator::new`].
    pub fn compare(
        &self,
        name: &str,
        first: impl Into<Option<RecordRef>>,
        second: impl Into<Option<RecordRef>>,
    ) -> Result<Comparator> {
        let def = self
            .get(name)
            .ok_or_else(|| ModelDiffError::ImproperlyConfigured {
                comparator: name.to_string(),
                reason: "not declared in the catalog".to_string(),
            })?;
        Comparator::new(def.clone(), first, second)
    }
}

struct Builder<'a> {
    schema: Arc<dyn Schema>,
    decls: BTreeMap<&'a str, &'a ComparatorDecl>,
    default_max_depth: Option<usize>,
    built: BTreeMap<String, Arc<ComparatorDef>>,
    visiting: Vec<String>,
}

impl Builder<'_> {
    fn resolve(&mut self, name: &str) -> Result<Arc<ComparatorDef>> {
        if let Some(def) = self.built.get(name) {
            return Ok(def.clone());
        }
        if self.visiting.iter().any(|n| n == name) {
            let mut cycle = self.visiting.clone();
            cycle.push(name.to_string());
            return Err(ModelDiffError::ImproperlyConfigured {
                comparator: name.to_string(),
                reason: format!("circular related comparators: {}", cycle.join(" -> ")),
            });
        }
        let Some(decl) = self.decls.get(name).copied() else {
            let referrer = self.visiting.last().cloned().unwrap_or_default();
            return Err(ModelDiffError::ImproperlyConfigured {
                comparator: referrer,
                reason: format!("related comparator {} is not declared", name),
            });
        };

        self.visiting.push(name.to_string());
        let mut config = ComparatorConfig::new(decl.name.clone());
        config.model = decl.model.clone();
        config.fields = decl.fields.clone();
        config.exclude = decl.exclude.clone();
        config.widgets = decl.widgets.clone();
        config.max_depth = decl.max_depth.or(self.default_max_depth);
        for (field, related) in &decl.related {
            let def = self.resolve(related)?;
            config.related.insert(field.clone(), def);
        }
        self.visiting.pop();

        let def = ComparatorDef::build(self.schema.clone(), config)?;
        self.built.insert(name.to_string(), def.clone());
        Ok(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::memory::MemorySchema;
    use crate::schema::{FieldMeta, ModelMeta};

    fn schema() -> Arc<dyn Schema> {
        MemorySchema::new()
            .with_model(
                ModelMeta::new("Person", "Person")
                    .field(FieldMeta::scalar("name", "Name"))
                    .field(FieldMeta::reverse_many_to_one("pets", "Pet", "Pets")),
            )
            .with_model(
                ModelMeta::new("Pet", "Pet")
                    .field(FieldMeta::scalar("name", "Name"))
                    .field(FieldMeta::foreign_key("owner", "Person", "Owner")),
            )
            .into_shared()
    }

    #[test]
    fn test_fields_accepts_sentinel_string() {
        let config: CatalogConfig = toml::from_str(
            r#"
            [[comparator]]
            name = "PetComparator"
            model = "Pet"
            fields = "__all__"
            "#,
        )
        .unwrap();
        assert_eq!(config.comparators[0].fields, Some(FieldSpec::all()));
    }

    #[test]
    fn test_dependencies_resolve_regardless_of_order() {
        let catalog = Catalog::from_toml_str(
            schema(),
            r#"
            [[comparator]]
            name = "PersonComparator"
            model = "Person"
            fields = ["name", "pets"]
            related = { pets = "PetComparator" }

            [[comparator]]
            name = "PetComparator"
            model = "Pet"
            exclude = ["owner"]
            "#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["PersonComparator", "PetComparator"]
        );
    }

    #[test]
    fn test_cycle_is_rejected() {
        let err = Catalog::from_toml_str(
            schema(),
            r#"
            [[comparator]]
            name = "PersonComparator"
            model = "Person"
            fields = "__all__"
            related = { pets = "PetComparator" }

            [[comparator]]
            name = "PetComparator"
            model = "Pet"
            fields = "__all__"
            related = { owner = "PersonComparator" }
            "#,
        )
        .unwrap_err();
        match err {
            ModelDiffError::ImproperlyConfigured { reason, .. } => {
                assert!(reason.contains("PersonComparator -> PetComparator -> PersonComparator"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let err = Catalog::from_toml_str(schema(), "colour = \"blue\"").unwrap_err();
        assert!(matches!(err, ModelDiffError::Serialization { .. }));
    }
}
