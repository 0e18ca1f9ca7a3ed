//! The comparator: two records of one model and their bound fields.

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use crate::bound::BoundField;
use crate::errors::{ModelDiffError, Result};
use crate::field::FieldDescriptor;
use crate::registry::{ComparatorDef, DEFAULT_MAX_DEPTH};
use crate::schema::RecordRef;
use crate::snapshot::{extract_snapshot, Snapshot};
use crate::summary::ComparisonSummary;

/// Position of a comparator in a nested comparison tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nesting {
    depth: usize,
    max_depth: usize,
}

impl Nesting {
    pub fn root(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn descend(self, model: &str) -> Result<Self> {
        if self.depth >= self.max_depth {
            return Err(ModelDiffError::DepthExceeded {
                model: model.to_string(),
                max_depth: self.max_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self
        })
    }
}

impl Default for Nesting {
    fn default() -> Self {
        Self::root(DEFAULT_MAX_DEPTH)
    }
}

/// Field-by-field comparison of two records of the same model.
///
/// Either record may be absent. Bound fields are created on first access and
/// memoized for the lifetime of the comparator, so [`Comparator::bound_field`]
/// returns the same instance on every call.
pub struct Comparator {
    def: Arc<ComparatorDef>,
    first: Option<RecordRef>,
    second: Option<RecordRef>,
    first_data: Snapshot,
    second_data: Snapshot,
    bound_fields: Vec<OnceCell<BoundField>>,
    nesting: Nesting,
}

impl Comparator {
    /// Compare `first` and `second` with the fields of `def`.
    ///
    /// # Errors
    ///
    /// - `ImproperlyConfigured` if `def` has no model
    /// - `TypeMismatch` if a record is not of the def's model, or the two
    ///   records are of different models
    /// - snapshot extraction errors
    pub fn new(
        def: Arc<ComparatorDef>,
        first: impl Into<Option<RecordRef>>,
        second: impl Into<Option<RecordRef>>,
    ) -> Result<Self> {
        let nesting = Nesting::root(def.max_depth());
        Self::with_nesting(def, first.into(), second.into(), nesting)
    }

    /// A comparator one level below `parent`.
    pub(crate) fn nested(
        def: Arc<ComparatorDef>,
        first: Option<RecordRef>,
        second: Option<RecordRef>,
        parent: Nesting,
    ) -> Result<Self> {
        let nesting = parent.descend(def.model().unwrap_or(def.name()))?;
        Self::with_nesting(def, first, second, nesting)
    }

    fn with_nesting(
        def: Arc<ComparatorDef>,
        first: Option<RecordRef>,
        second: Option<RecordRef>,
        nesting: Nesting,
    ) -> Result<Self> {
        let Some(model) = def.model() else {
            return Err(ModelDiffError::ImproperlyConfigured {
                comparator: def.name().to_string(),
                reason: "comparator has no model".to_string(),
            });
        };

        if let (Some(a), Some(b)) = (&first, &second) {
            if a.model() != b.model() {
                return Err(ModelDiffError::TypeMismatch {
                    first: a.model().to_string(),
                    second: b.model().to_string(),
                });
            }
        }
        for record in first.iter().chain(second.iter()) {
            if record.model() != model {
                return Err(ModelDiffError::TypeMismatch {
                    first: model.to_string(),
                    second: record.model().to_string(),
                });
            }
        }

        let first_data = snapshot(&def, first.as_ref())?;
        let second_data = snapshot(&def, second.as_ref())?;
        let bound_fields = (0..def.registry().len()).map(|_| OnceCell::new()).collect();

        tracing::debug!(
            comparator = def.name(),
            model = model,
            depth = nesting.depth(),
            "comparator created"
        );

        Ok(Self {
            def,
            first,
            second,
            first_data,
            second_data,
            bound_fields,
            nesting,
        })
    }

    pub fn def(&self) -> &Arc<ComparatorDef> {
        &self.def
    }

    pub fn first(&self) -> Option<&RecordRef> {
        self.first.as_ref()
    }

    pub fn second(&self) -> Option<&RecordRef> {
        self.second.as_ref()
    }

    pub fn first_data(&self) -> &Snapshot {
        &self.first_data
    }

    pub fn second_data(&self) -> &Snapshot {
        &self.second_data
    }

    /// Nesting depth; 0 for a top-level comparator
    pub fn depth(&self) -> usize {
        self.nesting.depth()
    }

    pub(crate) fn nesting(&self) -> Nesting {
        self.nesting
    }

    /// The bound field for `name`, created on first request.
    ///
    /// # Errors
    ///
    /// `FieldNotFound` for a name that is not registered, otherwise any error
    /// raised while comparing the field.
    pub fn bound_field(&self, name: &str) -> Result<&BoundField> {
        let (index, descriptor) =
            self.def
                .registry()
                .lookup(name)
                .ok_or_else(|| ModelDiffError::FieldNotFound {
                    comparator: self.def.name().to_string(),
                    field: name.to_string(),
                })?;
        self.bound_at(index, descriptor)
    }

    fn bound_at(&self, index: usize, descriptor: &FieldDescriptor) -> Result<&BoundField> {
        let cell = &self.bound_fields[index];
        if let Some(bound) = cell.get() {
            return Ok(bound);
        }
        let bound = BoundField::new(self, descriptor)?;
        Ok(cell.get_or_init(|| bound))
    }

    /// Bound fields in registry order.
    ///
    /// Iterating again reuses the fields bound by earlier passes.
    pub fn fields(&self) -> impl Iterator<Item = Result<&BoundField>> + '_ {
        self.def
            .registry()
            .iter()
            .enumerate()
            .map(move |(index, descriptor)| self.bound_at(index, descriptor))
    }

    /// Sum of every field's difference count.
    ///
    /// # Errors
    ///
    /// The first error raised while comparing a field.
    pub fn total_difference_count(&self) -> Result<usize> {
        let mut total = 0;
        for field in self.fields() {
            total += field?.difference_count();
        }
        Ok(total)
    }

    /// Labels of changed fields in registry order, nested labels flattened.
    ///
    /// # Errors
    ///
    /// The first error raised while comparing a field.
    pub fn changed_field_labels(&self) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for field in self.fields() {
            labels.extend_from_slice(field?.difference_labels());
        }
        Ok(labels)
    }

    /// Structured summary of the whole comparison.
    ///
    /// # Errors
    ///
    /// The first error raised while comparing a field.
    pub fn summary(&self) -> Result<ComparisonSummary> {
        ComparisonSummary::from_comparator(self)
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("comparator", &self.def.name())
            .field("first", &self.first)
            .field("second", &self.second)
            .field("depth", &self.nesting.depth())
            .finish_non_exhaustive()
    }
}

fn snapshot(def: &ComparatorDef, record: Option<&RecordRef>) -> Result<Snapshot> {
    let mut data = extract_snapshot(def.schema().as_ref(), record, def.include(), def.exclude())?;
    // Fields declared by hand are read straight from the record.
    if let Some(record) = record {
        for name in def.registry().names() {
            if !data.contains(name) {
                data.insert(name, record.value(name).unwrap_or_default());
            }
        }
    }
    Ok(data)
}
