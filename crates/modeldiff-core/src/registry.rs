//! Comparator declarations and the field registry builder.
//!
//! A [`ComparatorConfig`] declares which fields of a model are compared and
//! how. [`ComparatorDef::build`] validates it against the [`Schema`] once and
//! produces an immutable, shareable [`ComparatorDef`] holding the ordered
//! [`FieldRegistry`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelDiffError, Result};
use crate::field::{FieldDescriptor, NestedComparator, Strategy};
use crate::render::Widget;
use crate::schema::{FieldKind, FieldMeta, Schema};
use crate::{log_op_end, log_op_error, log_op_start};

/// Sentinel for "every field of the model".
pub const ALL_FIELDS: &str = "__all__";

/// Default limit for nested comparisons.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Raw `fields` / `exclude` value as written in a declaration.
///
/// Only [`ALL_FIELDS`] is accepted as a single string; any other string is
/// rejected when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Single(String),
    List(Vec<String>),
}

impl FieldSpec {
    pub fn all() -> Self {
        FieldSpec::Single(ALL_FIELDS.to_string())
    }

    pub fn list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldSpec::List(names.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for FieldSpec {
    fn from(value: &str) -> Self {
        FieldSpec::Single(value.to_string())
    }
}

impl From<Vec<String>> for FieldSpec {
    fn from(value: Vec<String>) -> Self {
        FieldSpec::List(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldFilter {
    All,
    Names(Vec<String>),
}

impl FieldFilter {
    fn contains(&self, name: &str) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Names(names) => names.iter().any(|n| n == name),
        }
    }
}

/// Comparison strategy of a manually declared field.
#[derive(Debug, Clone)]
pub enum DeclaredStrategy {
    Scalar,
    OneToOne(Arc<ComparatorDef>),
    Collection(Arc<ComparatorDef>),
}

/// A field declared by hand rather than derived from the schema.
#[derive(Debug, Clone)]
pub struct DeclaredField {
    pub name: String,
    pub label: String,
    pub strategy: DeclaredStrategy,
    pub widget: Option<Widget>,
}

impl DeclaredField {
    pub fn scalar(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            strategy: DeclaredStrategy::Scalar,
            widget: None,
        }
    }

    pub fn one_to_one(
        name: impl Into<String>,
        label: impl Into<String>,
        comparator: Arc<ComparatorDef>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            strategy: DeclaredStrategy::OneToOne(comparator),
            widget: None,
        }
    }

    pub fn collection(
        name: impl Into<String>,
        label: impl Into<String>,
        comparator: Arc<ComparatorDef>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            strategy: DeclaredStrategy::Collection(comparator),
            widget: None,
        }
    }

    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widget = Some(widget);
        self
    }
}

/// Declaration of a comparator type.
#[derive(Debug, Clone, Default)]
pub struct ComparatorConfig {
    pub name: String,
    pub model: Option<String>,
    pub fields: Option<FieldSpec>,
    pub exclude: Option<FieldSpec>,
    /// Nested comparator per relation field
    pub related: BTreeMap<String, Arc<ComparatorDef>>,
    /// Widget override per field
    pub widgets: BTreeMap<String, Widget>,
    pub declared: Vec<DeclaredField>,
    pub max_depth: Option<usize>,
}

impl ComparatorConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(FieldSpec::list(names));
        self
    }

    pub fn all_fields(mut self) -> Self {
        self.fields = Some(FieldSpec::all());
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(FieldSpec::list(names));
        self
    }

    pub fn related(mut self, field: impl Into<String>, comparator: Arc<ComparatorDef>) -> Self {
        self.related.insert(field.into(), comparator);
        self
    }

    pub fn widget(mut self, field: impl Into<String>, widget: Widget) -> Self {
        self.widgets.insert(field.into(), widget);
        self
    }

    pub fn declare(mut self, field: DeclaredField) -> Self {
        self.declared.push(field);
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Ordered field descriptors of one comparator type.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    index: BTreeMap<String, usize>,
}

impl FieldRegistry {
    fn from_descriptors(fields: Vec<FieldDescriptor>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();
        Self { fields, index }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Position and descriptor of a field
    pub fn lookup(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
        self.index.get(name).map(|&i| (i, &self.fields[i]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::name)
    }
}

/// Built, immutable declaration of a comparator type.
#[derive(Debug)]
pub struct ComparatorDef {
    name: String,
    model: Option<String>,
    include: Option<Vec<String>>,
    exclude: Vec<String>,
    registry: FieldRegistry,
    schema: Arc<dyn Schema>,
    max_depth: usize,
}

impl ComparatorDef {
    /// Validate `config` against `schema` and build the field registry.
    ///
    /// # Errors
    ///
    /// - `FieldListIsString` — `fields`/`exclude` given as a string other than `"__all__"`
    /// - `ImproperlyConfigured` — neither `fields` nor `exclude` for a model,
    ///   or no model and no declared fields
    /// - `UnknownModel` — the model is not in the schema
    /// - `UnknownFields` — names that are neither model fields nor declared
    pub fn build(schema: Arc<dyn Schema>, config: ComparatorConfig) -> Result<Arc<Self>> {
        let started = Instant::now();
        let name = config.name.clone();
        log_op_start!("build_registry", comparator = name.as_str());

        match Self::build_inner(schema, config) {
            Ok(def) => {
                log_op_end!(
                    "build_registry",
                    duration_ms = started.elapsed().as_millis() as u64,
                    comparator = name.as_str(),
                    registry_len = def.registry.len()
                );
                Ok(Arc::new(def))
            }
            Err(err) => {
                log_op_error!(
                    "build_registry",
                    err.clone(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    comparator = name.as_str()
                );
                Err(err)
            }
        }
    }

    /// Comparator over every field of `model`, used for relations without an
    /// explicit nested comparator.
    pub(crate) fn derive(
        schema: Arc<dyn Schema>,
        model: &str,
        max_depth: usize,
    ) -> Result<Arc<Self>> {
        let config = ComparatorConfig::new(format!("{}Comparator", model))
            .model(model)
            .all_fields()
            .max_depth(max_depth);
        Self::build(schema, config)
    }

    fn build_inner(schema: Arc<dyn Schema>, config: ComparatorConfig) -> Result<Self> {
        let fields = parse_spec(&config.name, "fields", config.fields.as_ref())?;
        let exclude = parse_spec(&config.name, "exclude", config.exclude.as_ref())?;
        let max_depth = config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);

        let Some(model) = config.model.clone() else {
            if config.declared.is_empty() {
                return Err(ModelDiffError::ImproperlyConfigured {
                    comparator: config.name,
                    reason: "declares neither a model nor any fields".to_string(),
                });
            }
            let descriptors = config
                .declared
                .iter()
                .map(|d| declared_descriptor(d, &config.widgets))
                .collect();
            return Ok(Self {
                name: config.name,
                model: None,
                include: None,
                exclude: Vec::new(),
                registry: FieldRegistry::from_descriptors(descriptors),
                schema,
                max_depth,
            });
        };

        if fields.is_none() && exclude.is_none() {
            return Err(ModelDiffError::ImproperlyConfigured {
                comparator: config.name,
                reason: "creating a comparator without either the 'fields' attribute or \
                         the 'exclude' attribute is prohibited"
                    .to_string(),
            });
        }

        let model_fields = schema.declared_fields(&model)?;
        check_override_keys(&model, model_fields, &config)?;

        let excluded = |name: &str| exclude.as_ref().is_some_and(|e| e.contains(name));

        let mut derived: Vec<(String, Option<FieldDescriptor>)> = Vec::new();
        for meta in model_fields {
            if fields.as_ref().is_some_and(|f| !f.contains(&meta.name)) {
                continue;
            }
            if excluded(&meta.name) {
                continue;
            }
            let descriptor = schema_descriptor(&schema, &config, meta, max_depth)?;
            derived.push((meta.name.clone(), Some(descriptor)));
        }

        // An explicit list decides the order; names it mentions that the
        // model lacks stay as empty slots for declared fields to fill.
        if let Some(FieldFilter::Names(names)) = &fields {
            let mut ordered: Vec<(String, Option<FieldDescriptor>)> = Vec::new();
            for name in names {
                if excluded(name) || ordered.iter().any(|(n, _)| n == name) {
                    continue;
                }
                let descriptor = derived
                    .iter_mut()
                    .find(|(n, _)| n == name)
                    .and_then(|(_, d)| d.take());
                ordered.push((name.clone(), descriptor));
            }
            derived = ordered;
        }

        let missing: Vec<String> = derived
            .iter()
            .filter(|(name, d)| d.is_none() && !config.declared.iter().any(|f| &f.name == name))
            .map(|(name, _)| name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ModelDiffError::UnknownFields {
                model,
                fields: missing,
            });
        }

        for declared in &config.declared {
            let descriptor = declared_descriptor(declared, &config.widgets);
            match derived.iter_mut().find(|(n, _)| n == &declared.name) {
                Some(slot) => slot.1 = Some(descriptor),
                None => derived.push((declared.name.clone(), Some(descriptor))),
            }
        }

        let descriptors: Vec<FieldDescriptor> = derived.into_iter().filter_map(|(_, d)| d).collect();

        let include = match fields {
            Some(FieldFilter::Names(names)) => Some(names),
            _ => None,
        };
        let exclude = match exclude {
            Some(FieldFilter::Names(names)) => names,
            Some(FieldFilter::All) => model_fields.iter().map(|f| f.name.clone()).collect(),
            None => Vec::new(),
        };

        Ok(Self {
            name: config.name,
            model: Some(model),
            include,
            exclude,
            registry: FieldRegistry::from_descriptors(descriptors),
            schema,
            max_depth,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn schema(&self) -> &Arc<dyn Schema> {
        &self.schema
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Explicit include list, `None` when every field is included
    pub fn include(&self) -> Option<&[String]> {
        self.include.as_deref()
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }
}

fn parse_spec(comparator: &str, option: &str, spec: Option<&FieldSpec>) -> Result<Option<FieldFilter>> {
    match spec {
        None => Ok(None),
        Some(FieldSpec::Single(value)) if value == ALL_FIELDS => Ok(Some(FieldFilter::All)),
        Some(FieldSpec::Single(value)) => Err(ModelDiffError::FieldListIsString {
            comparator: comparator.to_string(),
            option: option.to_string(),
            value: value.clone(),
        }),
        Some(FieldSpec::List(names)) => Ok(Some(FieldFilter::Names(names.clone()))),
    }
}

fn check_override_keys(model: &str, model_fields: &[FieldMeta], config: &ComparatorConfig) -> Result<()> {
    let known = |name: &str| {
        model_fields.iter().any(|f| f.name == name) || config.declared.iter().any(|d| d.name == name)
    };
    let unknown: Vec<String> = config
        .related
        .keys()
        .chain(config.widgets.keys())
        .filter(|name| !known(name))
        .cloned()
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ModelDiffError::UnknownFields {
            model: model.to_string(),
            fields: unknown,
        })
    }
}

fn schema_descriptor(
    schema: &Arc<dyn Schema>,
    config: &ComparatorConfig,
    meta: &FieldMeta,
    max_depth: usize,
) -> Result<FieldDescriptor> {
    let explicit = config.related.get(&meta.name).cloned();
    let widget = config.widgets.get(&meta.name).cloned();

    let relational = match meta.kind {
        FieldKind::OneToOne | FieldKind::ReverseManyToOne => true,
        FieldKind::ForeignKey => explicit.is_some(),
        FieldKind::Scalar | FieldKind::ManyToMany => false,
    };
    if !relational {
        return Ok(FieldDescriptor::new(
            meta.name.clone(),
            meta.label.clone(),
            Strategy::Scalar,
            widget,
        ));
    }

    let related_model = meta
        .related_model
        .clone()
        .ok_or_else(|| ModelDiffError::ImproperlyConfigured {
            comparator: config.name.clone(),
            reason: format!("relation field {} has no related model", meta.name),
        })?;
    if let Some(def) = &explicit {
        if def.model().is_some_and(|m| m != related_model) {
            return Err(ModelDiffError::ImproperlyConfigured {
                comparator: config.name.clone(),
                reason: format!(
                    "related comparator {} for field {} does not compare {}",
                    def.name(),
                    meta.name,
                    related_model
                ),
            });
        }
    }

    let label = schema
        .model(&related_model)
        .map(|m| m.label.clone())
        .unwrap_or_else(|| meta.label.clone());
    let nested = NestedComparator::new(schema.clone(), related_model, explicit, max_depth);
    let strategy = if meta.kind == FieldKind::ReverseManyToOne {
        Strategy::Collection(nested)
    } else {
        Strategy::OneToOne(nested)
    };
    Ok(FieldDescriptor::new(meta.name.clone(), label, strategy, widget))
}

fn declared_descriptor(declared: &DeclaredField, widgets: &BTreeMap<String, Widget>) -> FieldDescriptor {
    let widget = declared
        .widget
        .clone()
        .or_else(|| widgets.get(&declared.name).cloned());
    let strategy = match &declared.strategy {
        DeclaredStrategy::Scalar => Strategy::Scalar,
        DeclaredStrategy::OneToOne(def) => Strategy::OneToOne(NestedComparator::fixed(def.clone())),
        DeclaredStrategy::Collection(def) => {
            Strategy::Collection(NestedComparator::fixed(def.clone()))
        }
    };
    FieldDescriptor::new(declared.name.clone(), declared.label.clone(), strategy, widget)
}
