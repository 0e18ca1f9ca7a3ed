//! Comparison summaries for review screens.
//!
//! [`ComparisonSummary`] is a serializable snapshot of a finished comparison
//! (every field, its values and its difference, nested relations included);
//! [`render_human_summary`] turns it into Markdown.
//!
//! ```ignore
//! let summary = comparator.summary()?;
//! let json = serde_json::to_string_pretty(&summary)?;
//! let markdown = modeldiff_core::summary::render_human_summary(&summary);
//! ```

pub mod human_summary;
pub mod model;

pub use human_summary::render_human_summary;
pub use model::{ComparisonSummary, FieldSummary};
