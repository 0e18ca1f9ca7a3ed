//! Markdown renderer for the built-in widget templates.
//!
//! Every field renders as one table row, so a whole comparison (including
//! nested relations) forms a single Markdown table.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::comparator::Comparator;
use crate::errors::{ModelDiffError, Result};
use crate::render::{Renderer, COMPARE_FIELD_TEMPLATE, MULTIPLE_COMPARE_FIELD_TEMPLATE};

/// How a template name is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// One row: label, first, second, change marker
    Field,
    /// A heading row followed by the nested rows
    Related,
}

#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    templates: BTreeMap<String, TemplateKind>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert(COMPARE_FIELD_TEMPLATE.to_string(), TemplateKind::Field);
        templates.insert(
            MULTIPLE_COMPARE_FIELD_TEMPLATE.to_string(),
            TemplateKind::Related,
        );
        Self { templates }
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom widget template
    pub fn with_template(mut self, template: impl Into<String>, kind: TemplateKind) -> Self {
        self.templates.insert(template.into(), kind);
        self
    }

    /// Render every field of `comparator` as a Markdown table.
    ///
    /// # Errors
    ///
    /// Propagates comparison errors and template lookup failures.
    pub fn render_table(&self, comparator: &Comparator) -> Result<String> {
        let mut out = String::from("| Field | First | Second | Changes |\n|---|---|---|---|\n");
        for field in comparator.fields() {
            out.push_str(&field?.render(self)?);
        }
        Ok(out)
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, template: &str, context: &JsonValue) -> Result<String> {
        let kind = self
            .templates
            .get(template)
            .ok_or_else(|| ModelDiffError::TemplateNotFound {
                template: template.to_string(),
            })?;

        let label = context_str(template, context, "field_label")?;
        let differences = context
            .get("differences")
            .and_then(JsonValue::as_u64)
            .ok_or_else(|| missing(template, "differences"))?;

        match kind {
            TemplateKind::Field => {
                let first = context.get("first").ok_or_else(|| missing(template, "first"))?;
                let second = context
                    .get("second")
                    .ok_or_else(|| missing(template, "second"))?;
                let marker = if differences > 0 { "changed" } else { "" };
                Ok(format!(
                    "| {} | {} | {} | {} |\n",
                    escape(label),
                    escape(&cell(first)),
                    escape(&cell(second)),
                    marker
                ))
            }
            TemplateKind::Related => {
                let related = context_str(template, context, "related_result")?;
                Ok(format!(
                    "| **{}** | | | {} |\n{}",
                    escape(label),
                    differences,
                    related
                ))
            }
        }
    }
}

fn context_str<'a>(template: &str, context: &'a JsonValue, key: &str) -> Result<&'a str> {
    context
        .get(key)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| missing(template, key))
}

fn missing(template: &str, key: &str) -> ModelDiffError {
    ModelDiffError::Render {
        template: template.to_string(),
        message: format!("missing context key `{}`", key),
    }
}

fn cell(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "-".to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
