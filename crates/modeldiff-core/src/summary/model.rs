//! Summary output types.
//!
//! Values are carried as JSON so summaries serialize the same way render
//! contexts do.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::comparator::Comparator;
use crate::errors::Result;

/// Summary of one comparator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonSummary {
    /// Name of the comparator declaration
    pub comparator: String,
    pub model: Option<String>,
    /// Display string of the first record, `None` when absent
    pub first: Option<String>,
    pub second: Option<String>,
    pub total_differences: usize,
    pub changed_labels: Vec<String>,
    /// Every registered field in registry order
    pub fields: Vec<FieldSummary>,
}

/// Summary of one bound field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSummary {
    pub name: String,
    pub label: String,
    pub first: JsonValue,
    pub second: JsonValue,
    pub differences: usize,
    pub is_related: bool,
    /// One entry per nested comparison, in pairing order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<ComparisonSummary>,
}

impl FieldSummary {
    pub fn is_changed(&self) -> bool {
        self.differences > 0
    }
}

impl ComparisonSummary {
    /// # Errors
    ///
    /// The first error raised while comparing a field, or `Serialization`
    /// if a value cannot be represented as JSON.
    pub fn from_comparator(comparator: &Comparator) -> Result<Self> {
        let mut fields = Vec::new();
        for field in comparator.fields() {
            let field = field?;
            let related = field
                .nested()
                .iter()
                .map(Self::from_comparator)
                .collect::<Result<Vec<_>>>()?;
            fields.push(FieldSummary {
                name: field.name().to_string(),
                label: field.label().to_string(),
                first: serde_json::to_value(field.first())?,
                second: serde_json::to_value(field.second())?,
                differences: field.difference_count(),
                is_related: field.is_related(),
                related,
            });
        }

        Ok(Self {
            comparator: comparator.def().name().to_string(),
            model: comparator.def().model().map(str::to_string),
            first: comparator.first().map(|r| r.display()),
            second: comparator.second().map(|r| r.display()),
            total_differences: comparator.total_difference_count()?,
            changed_labels: comparator.changed_field_labels()?,
            fields,
        })
    }

    pub fn is_identical(&self) -> bool {
        self.total_differences == 0
    }

    /// Fields with at least one difference
    pub fn changed_fields(&self) -> impl Iterator<Item = &FieldSummary> {
        self.fields.iter().filter(|f| f.is_changed())
    }
}
