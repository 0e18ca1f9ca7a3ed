//! Markdown rendering of a [`ComparisonSummary`].

use serde_json::Value as JsonValue;

use crate::summary::model::{ComparisonSummary, FieldSummary};

/// Render a Markdown summary of a comparison.
///
/// Only changed fields are listed; nested relations are indented under the
/// field that holds them.
pub fn render_human_summary(summary: &ComparisonSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("## {}\n\n", summary.comparator));
    out.push_str(&format!(
        "**First**: {}  \n**Second**: {}  \n**Differences**: {}\n\n",
        side(summary.first.as_deref()),
        side(summary.second.as_deref()),
        summary.total_differences
    ));

    if summary.is_identical() {
        out.push_str("_No differences._\n");
        return out;
    }

    out.push_str("### Changed Fields\n\n");
    write_fields(&mut out, summary, 0);
    out
}

fn write_fields(out: &mut String, summary: &ComparisonSummary, level: usize) {
    let indent = "  ".repeat(level);
    for field in summary.changed_fields() {
        if field.is_related {
            out.push_str(&format!(
                "{indent}- **{}** ({} changes)\n",
                field.label, field.differences
            ));
            for (i, nested) in field.related.iter().enumerate() {
                if nested.is_identical() {
                    continue;
                }
                if field.related.len() > 1 {
                    out.push_str(&format!(
                        "{indent}  - #{}: {} → {}\n",
                        i + 1,
                        side(nested.first.as_deref()),
                        side(nested.second.as_deref())
                    ));
                    write_fields(out, nested, level + 2);
                } else {
                    write_fields(out, nested, level + 1);
                }
            }
        } else {
            write_scalar(out, &indent, field);
        }
    }
}

fn write_scalar(out: &mut String, indent: &str, field: &FieldSummary) {
    out.push_str(&format!(
        "{indent}- **{}**: `{}` → `{}`\n",
        field.label,
        value(&field.first),
        value(&field.second)
    ));
}

fn side(display: Option<&str>) -> &str {
    display.unwrap_or("(none)")
}

fn value(v: &JsonValue) -> String {
    match v {
        JsonValue::Null => "-".to_string(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
