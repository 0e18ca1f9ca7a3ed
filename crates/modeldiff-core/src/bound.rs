//! Bound fields: one descriptor paired with the two values of one comparison.

use crate::comparator::Comparator;
use crate::errors::Result;
use crate::field::{Difference, FieldDescriptor};
use crate::render::{related_context, scalar_context, Renderer, Widget};
use crate::value::Value;

/// A field of one [`Comparator`], with its difference computed at
/// construction.
#[derive(Debug)]
pub struct BoundField {
    name: String,
    label: String,
    first: Value,
    second: Value,
    is_related: bool,
    widget: Widget,
    difference: Difference,
}

impl BoundField {
    /// Read both values from the comparator snapshots and compare them.
    ///
    /// # Errors
    ///
    /// Any error raised by [`FieldDescriptor::differ`].
    pub fn new(comparator: &Comparator, descriptor: &FieldDescriptor) -> Result<Self> {
        let first = comparator.first_data().get(descriptor.name());
        let second = comparator.second_data().get(descriptor.name());
        let difference = descriptor.differ_at(&first, &second, comparator.nesting())?;
        Ok(Self {
            name: descriptor.name().to_string(),
            label: descriptor.label().to_string(),
            first,
            second,
            is_related: descriptor.strategy().is_relational(),
            widget: descriptor.widget().clone(),
            difference,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn first(&self) -> &Value {
        &self.first
    }

    pub fn second(&self) -> &Value {
        &self.second
    }

    pub fn is_related(&self) -> bool {
        self.is_related
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn difference(&self) -> &Difference {
        &self.difference
    }

    pub fn difference_count(&self) -> usize {
        self.difference.count()
    }

    pub fn difference_labels(&self) -> &[String] {
        self.difference.labels()
    }

    /// Nested comparators of a relational field
    pub fn nested(&self) -> &[Comparator] {
        self.difference.nested_comparators()
    }

    /// Render through the field's widget template.
    ///
    /// Relational fields first render every nested field and pass the
    /// concatenated markup as `related_result`.
    ///
    /// # Errors
    ///
    /// Renderer errors, or comparison errors raised by nested fields.
    pub fn render(&self, renderer: &dyn Renderer) -> Result<String> {
        let context = if self.is_related {
            let mut related = String::new();
            for comparator in self.nested() {
                for field in comparator.fields() {
                    related.push_str(&field?.render(renderer)?);
                }
            }
            related_context(&related, self.difference_count(), &self.label)
        } else {
            scalar_context(&self.first, &self.second, self.difference_count(), &self.label)?
        };
        renderer.render(self.widget.template(), &context)
    }
}
