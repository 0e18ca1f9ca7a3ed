//! Rendering boundary.
//!
//! The engine does not produce markup itself: each bound field hands a small
//! JSON context to a [`Renderer`] under the template named by its [`Widget`].

pub mod markdown;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::errors::Result;
use crate::value::Value;

pub use markdown::{MarkdownRenderer, TemplateKind};

/// Template for scalar fields (context: first, second, differences, field_label)
pub const COMPARE_FIELD_TEMPLATE: &str = "comparison/widgets/compare_field.html";

/// Template for relational fields (context: related_result, differences, field_label)
pub const MULTIPLE_COMPARE_FIELD_TEMPLATE: &str = "comparison/widgets/multiple_compare_field.html";

/// Template engine turning a context into markup.
pub trait Renderer {
    /// # Errors
    ///
    /// Implementations report unknown templates as `TemplateNotFound` and
    /// other failures as `Render`.
    fn render(&self, template: &str, context: &JsonValue) -> Result<String>;
}

/// Reference to the template a field renders with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Widget {
    template: String,
}

impl Widget {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Default widget for scalar fields
    pub fn compare() -> Self {
        Self::new(COMPARE_FIELD_TEMPLATE)
    }

    /// Default widget for relational fields
    pub fn multiple() -> Self {
        Self::new(MULTIPLE_COMPARE_FIELD_TEMPLATE)
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

/// Context for a scalar field.
///
/// # Errors
///
/// `Serialization` if a value cannot be represented as JSON.
pub fn scalar_context(
    first: &Value,
    second: &Value,
    differences: usize,
    field_label: &str,
) -> Result<JsonValue> {
    let mut context = Map::new();
    context.insert("first".to_string(), serde_json::to_value(first)?);
    context.insert("second".to_string(), serde_json::to_value(second)?);
    context.insert("differences".to_string(), JsonValue::from(differences));
    context.insert("field_label".to_string(), JsonValue::from(field_label));
    Ok(JsonValue::Object(context))
}

/// Context for a relational field; `related_result` is the concatenated
/// markup of every nested field.
pub fn related_context(related_result: &str, differences: usize, field_label: &str) -> JsonValue {
    let mut context = Map::new();
    context.insert("related_result".to_string(), JsonValue::from(related_result));
    context.insert("differences".to_string(), JsonValue::from(differences));
    context.insert("field_label".to_string(), JsonValue::from(field_label));
    JsonValue::Object(context)
}
