//! modeldiff core - field-by-field comparison of two records
//!
//! This crate provides:
//! - Declarative comparator definitions built once from a schema ([`registry`])
//! - Scalar, one-to-one and collection comparison strategies ([`field`])
//! - Comparators with memoized bound fields ([`comparator`], [`bound`])
//! - A rendering boundary with a Markdown renderer ([`render`])
//! - TOML catalogs of comparators ([`config`]) and review summaries ([`summary`])
//!
//! ```
//! use modeldiff_core::schema::memory::{MemoryRecord, MemorySchema};
//! use modeldiff_core::schema::{FieldMeta, ModelMeta};
//! use modeldiff_core::{Comparator, ComparatorConfig, ComparatorDef};
//!
//! let schema = MemorySchema::new()
//!     .with_model(
//!         ModelMeta::new("Person", "Person")
//!             .field(FieldMeta::scalar("name", "Name"))
//!             .field(FieldMeta::scalar("age", "Age")),
//!     )
//!     .into_shared();
//! let def = ComparatorDef::build(
//!     schema,
//!     ComparatorConfig::new("PersonComparator").model("Person").all_fields(),
//! )?;
//!
//! let before = MemoryRecord::new("Person").with_pk(1).set("name", "Alice").set("age", 30);
//! let after = MemoryRecord::new("Person").with_pk(1).set("name", "Alice").set("age", 31);
//! let comparator = Comparator::new(def, before.into_ref(), after.into_ref())?;
//!
//! assert_eq!(comparator.total_difference_count()?, 1);
//! assert_eq!(comparator.changed_field_labels()?, vec!["Age"]);
//! # Ok::<(), modeldiff_core::ModelDiffError>(())
//! ```

pub mod bound;
pub mod comparator;
pub mod config;
pub mod errors;
pub mod field;
pub mod filters;
pub mod logging_facility;
pub mod registry;
pub mod render;
pub mod schema;
pub mod snapshot;
pub mod summary;
pub mod value;

// Re-export commonly used types
pub use bound::BoundField;
pub use comparator::Comparator;
pub use config::Catalog;
pub use errors::{ExError, ExErrorKind, ModelDiffError, Result};
pub use field::{Difference, FieldDescriptor, Strategy};
pub use registry::{ComparatorConfig, ComparatorDef, DeclaredField, FieldSpec, ALL_FIELDS};
pub use render::{MarkdownRenderer, Renderer, Widget};
pub use schema::{FieldKind, FieldMeta, ModelMeta, Record, RecordRef, Schema};
pub use value::Value;
