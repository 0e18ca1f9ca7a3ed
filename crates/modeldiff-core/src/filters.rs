//! Lookup helpers for template integrations.

use crate::bound::BoundField;
use crate::comparator::Comparator;
use crate::errors::Result;

/// Bound field of `comparator` named `name`, as used inside a host template
/// (`{{ comparator|field_by_name:"age" }}`).
///
/// # Errors
///
/// `FieldNotFound` for an unregistered name.
pub fn field_by_name<'a>(comparator: &'a Comparator, name: &str) -> Result<&'a BoundField> {
    comparator.bound_field(name)
}
