//! Field descriptors: per-field comparison strategies.
//!
//! A [`FieldDescriptor`] is immutable and shared by every comparator built
//! from the same [`ComparatorDef`]. Comparing two values is a pure function of
//! those values ([`FieldDescriptor::differ`]); relational strategies recurse
//! through nested [`Comparator`]s which are returned inside the
//! [`Difference`] rather than cached on the descriptor.

use std::sync::{Arc, OnceLock};

use crate::comparator::{Comparator, Nesting};
use crate::errors::{ModelDiffError, Result};
use crate::registry::ComparatorDef;
use crate::render::Widget;
use crate::schema::{RecordRef, Schema};
use crate::value::Value;

/// Comparator used by a relational field.
///
/// Either fixed at registry build time, or derived on first use from the
/// related model with every field included. Deriving lazily keeps
/// self-referential models buildable.
#[derive(Debug)]
pub struct NestedComparator {
    related_model: Option<String>,
    explicit: Option<Arc<ComparatorDef>>,
    derived: OnceLock<Arc<ComparatorDef>>,
    schema: Option<Arc<dyn Schema>>,
    max_depth: usize,
}

impl NestedComparator {
    pub(crate) fn new(
        schema: Arc<dyn Schema>,
        related_model: String,
        explicit: Option<Arc<ComparatorDef>>,
        max_depth: usize,
    ) -> Self {
        Self {
            related_model: Some(related_model),
            explicit,
            derived: OnceLock::new(),
            schema: Some(schema),
            max_depth,
        }
    }

    pub(crate) fn fixed(def: Arc<ComparatorDef>) -> Self {
        Self {
            related_model: def.model().map(str::to_string),
            max_depth: def.max_depth(),
            explicit: Some(def),
            derived: OnceLock::new(),
            schema: None,
        }
    }

    pub fn related_model(&self) -> Option<&str> {
        self.related_model.as_deref()
    }

    /// Whether a comparator was configured rather than derived
    pub fn is_explicit(&self) -> bool {
        self.explicit.is_some()
    }

    /// The comparator definition to use, deriving it on first call.
    ///
    /// # Errors
    ///
    /// Registry build errors of the derived definition.
    pub fn resolve(&self) -> Result<&Arc<ComparatorDef>> {
        if let Some(def) = &self.explicit {
            return Ok(def);
        }
        if let Some(def) = self.derived.get() {
            return Ok(def);
        }
        let (Some(schema), Some(model)) = (&self.schema, &self.related_model) else {
            return Err(ModelDiffError::ImproperlyConfigured {
                comparator: "<nested>".to_string(),
                reason: "relation field has neither a comparator nor a related model".to_string(),
            });
        };
        let def = ComparatorDef::derive(schema.clone(), model, self.max_depth)?;
        Ok(self.derived.get_or_init(|| def))
    }
}

/// Comparison strategy of one field.
#[derive(Debug)]
pub enum Strategy {
    /// Native equality; 0 or 1 difference
    Scalar,
    /// One nested comparison of the two related records
    OneToOne(NestedComparator),
    /// Positional nested comparisons of two record lists
    Collection(NestedComparator),
}

impl Strategy {
    pub fn is_relational(&self) -> bool {
        !matches!(self, Strategy::Scalar)
    }
}

/// Nested comparators produced while diffing a relational field.
#[derive(Debug, Default)]
pub enum Nested {
    #[default]
    None,
    One(Box<Comparator>),
    Many(Vec<Comparator>),
}

/// Outcome of comparing one field.
#[derive(Debug, Default)]
pub struct Difference {
    count: usize,
    labels: Vec<String>,
    nested: Nested,
}

impl Difference {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_changed(&self) -> bool {
        self.count > 0
    }

    /// Nested comparators in pairing order; empty for scalar fields
    pub fn nested_comparators(&self) -> &[Comparator] {
        match &self.nested {
            Nested::None => &[],
            Nested::One(comparator) => std::slice::from_ref(comparator.as_ref()),
            Nested::Many(comparators) => comparators,
        }
    }

    pub fn nested(&self) -> &Nested {
        &self.nested
    }
}

/// How one registered field is compared and rendered.
#[derive(Debug)]
pub struct FieldDescriptor {
    name: String,
    label: String,
    strategy: Strategy,
    widget: Widget,
}

impl FieldDescriptor {
    /// Without an explicit widget, scalar fields use [`Widget::compare`] and
    /// relational fields [`Widget::multiple`].
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        strategy: Strategy,
        widget: Option<Widget>,
    ) -> Self {
        let widget = widget.unwrap_or_else(|| {
            if strategy.is_relational() {
                Widget::multiple()
            } else {
                Widget::compare()
            }
        });
        Self {
            name: name.into(),
            label: label.into(),
            strategy,
            widget,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    /// Compare two raw values of this field.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if both values are present with different types
    /// - `UnexpectedValue` if a relational field holds a non-record value
    /// - `DepthExceeded` if nesting goes past the configured limit
    pub fn differ(&self, first: &Value, second: &Value) -> Result<Difference> {
        let max_depth = match &self.strategy {
            Strategy::Scalar => crate::registry::DEFAULT_MAX_DEPTH,
            Strategy::OneToOne(nested) | Strategy::Collection(nested) => nested.max_depth,
        };
        self.differ_at(first, second, Nesting::root(max_depth))
    }

    /// # Errors
    ///
    /// See [`FieldDescriptor::differ`].
    pub fn difference_count(&self, first: &Value, second: &Value) -> Result<usize> {
        Ok(self.differ(first, second)?.count)
    }

    /// # Errors
    ///
    /// See [`FieldDescriptor::differ`].
    pub fn changed_labels(&self, first: &Value, second: &Value) -> Result<Vec<String>> {
        Ok(self.differ(first, second)?.labels)
    }

    pub(crate) fn differ_at(
        &self,
        first: &Value,
        second: &Value,
        nesting: Nesting,
    ) -> Result<Difference> {
        check_types(first, second)?;

        match &self.strategy {
            Strategy::Scalar => {
                if first == second {
                    Ok(Difference::default())
                } else {
                    Ok(Difference {
                        count: 1,
                        labels: vec![self.label.clone()],
                        nested: Nested::None,
                    })
                }
            }
            Strategy::OneToOne(nested) => {
                let first = self.single(first)?;
                let second = self.single(second)?;
                // Nothing on either side: no nested comparison, which also
                // stops self-referential chains at their last link.
                if first.is_none() && second.is_none() {
                    return Ok(Difference::default());
                }
                let def = nested.resolve()?;
                let comparator = Comparator::nested(def.clone(), first, second, nesting)?;
                Ok(Difference {
                    count: comparator.total_difference_count()?,
                    labels: comparator.changed_field_labels()?,
                    nested: Nested::One(Box::new(comparator)),
                })
            }
            Strategy::Collection(nested) => {
                let first = self.multiple(first)?;
                let second = self.multiple(second)?;
                let pairs = first.len().max(second.len());
                if pairs == 0 {
                    return Ok(Difference {
                        nested: Nested::Many(Vec::new()),
                        ..Difference::default()
                    });
                }

                let def = nested.resolve()?;
                let mut count = 0;
                let mut labels = Vec::new();
                let mut comparators = Vec::with_capacity(pairs);
                for i in 0..pairs {
                    let comparator = Comparator::nested(
                        def.clone(),
                        first.get(i).cloned(),
                        second.get(i).cloned(),
                        nesting,
                    )?;
                    count += comparator.total_difference_count()?;
                    labels.extend(comparator.changed_field_labels()?);
                    comparators.push(comparator);
                }
                Ok(Difference {
                    count,
                    labels,
                    nested: Nested::Many(comparators),
                })
            }
        }
    }

    fn single(&self, value: &Value) -> Result<Option<RecordRef>> {
        match value {
            Value::Null => Ok(None),
            Value::Record(record) => Ok(Some(record.clone())),
            other => Err(self.unexpected("record", other)),
        }
    }

    fn multiple<'a>(&self, value: &'a Value) -> Result<&'a [RecordRef]> {
        match value {
            Value::Null => Ok(&[]),
            Value::Records(records) => Ok(records),
            other => Err(self.unexpected("records", other)),
        }
    }

    fn unexpected(&self, expected: &str, found: &Value) -> ModelDiffError {
        ModelDiffError::UnexpectedValue {
            field: self.name.clone(),
            expected: expected.to_string(),
            found: found.type_name().to_string(),
        }
    }
}

/// Two present values must share a type; absence never conflicts.
fn check_types(first: &Value, second: &Value) -> Result<()> {
    if first.is_null() || second.is_null() {
        return Ok(());
    }
    if first.type_name() != second.type_name() {
        return Err(ModelDiffError::TypeMismatch {
            first: first.type_name().to_string(),
            second: second.type_name().to_string(),
        });
    }
    Ok(())
}
