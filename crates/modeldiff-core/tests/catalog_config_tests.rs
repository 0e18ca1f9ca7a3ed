#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::io::Write;

use common::{person, pet, test_schema};
use modeldiff_core::config::CatalogConfig;
use modeldiff_core::{Catalog, ExError, ExErrorKind, ModelDiffError};

const CATALOG: &str = r#"
max_depth = 8

[[comparator]]
name = "PersonComparator"
model = "Person"
fields = ["name", "age", "pets"]

[comparator.related]
pets = "PetComparator"

[comparator.widgets]
name = "widgets/name.html"

[[comparator]]
name = "PetComparator"
model = "Pet"
fields = ["name"]
"#;

#[test]
fn test_catalog_builds_every_comparator() {
    let catalog = Catalog::from_toml_str(test_schema(), CATALOG).unwrap();

    assert_eq!(catalog.len(), 2);
    let person_def = catalog.get("PersonComparator").unwrap();
    assert_eq!(person_def.max_depth(), 8);
    assert_eq!(
        person_def.registry().get("name").unwrap().widget().template(),
        "widgets/name.html"
    );
}

#[test]
fn test_related_reference_is_used_for_nested_fields() {
    let catalog = Catalog::from_toml_str(test_schema(), CATALOG).unwrap();
    let cmp = catalog
        .compare(
            "PersonComparator",
            person(1, "Alice", 30)
                .set("pets", vec![pet(1, "Tom", "cat")])
                .into_ref(),
            person(1, "Alice", 30)
                .set("pets", vec![pet(1, "Tom", "dog")])
                .into_ref(),
        )
        .unwrap();

    // PetComparator only compares names.
    assert_eq!(cmp.total_difference_count().unwrap(), 0);
}

#[test]
fn test_compare_with_undeclared_name() {
    let catalog = Catalog::from_toml_str(test_schema(), CATALOG).unwrap();
    let err = catalog.compare("ShipComparator", None, None).unwrap_err();
    assert!(matches!(err, ModelDiffError::ImproperlyConfigured { ref comparator, .. } if comparator == "ShipComparator"));
}

#[test]
fn test_unknown_related_reference() {
    let err = Catalog::from_toml_str(
        test_schema(),
        r#"
        [[comparator]]
        name = "PersonComparator"
        model = "Person"
        fields = "__all__"
        related = { pets = "AnimalComparator" }
        "#,
    )
    .unwrap_err();
    match err {
        ModelDiffError::ImproperlyConfigured { comparator, reason } => {
            assert_eq!(comparator, "PersonComparator");
            assert!(reason.contains("AnimalComparator"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_duplicate_names() {
    let err = Catalog::from_toml_str(
        test_schema(),
        r#"
        [[comparator]]
        name = "PetComparator"
        model = "Pet"
        fields = "__all__"

        [[comparator]]
        name = "PetComparator"
        model = "Pet"
        exclude = ["species"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ModelDiffError::ImproperlyConfigured { .. }));
}

#[test]
fn test_bare_string_in_catalog() {
    let err = Catalog::from_toml_str(
        test_schema(),
        r#"
        [[comparator]]
        name = "PetComparator"
        model = "Pet"
        fields = "name"
        "#,
    )
    .unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::InvalidFieldList);
}

#[test]
fn test_malformed_toml() {
    let err = Catalog::from_toml_str(test_schema(), "[[comparator]\nname = ").unwrap_err();
    assert!(matches!(err, ModelDiffError::Serialization { .. }));
}

#[test]
fn test_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();

    let catalog = Catalog::from_path(test_schema(), file.path()).unwrap();
    assert_eq!(
        catalog.names().collect::<Vec<_>>(),
        vec!["PersonComparator", "PetComparator"]
    );
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::from_path(test_schema(), dir.path().join("missing.toml")).unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.code(), "ERR_IO");
}

#[test]
fn test_config_round_trips_through_toml() {
    let config: CatalogConfig = toml::from_str(CATALOG).unwrap();
    assert_eq!(config.max_depth, Some(8));
    assert_eq!(config.comparators.len(), 2);
    assert_eq!(
        config.comparators[0].related.get("pets").map(String::as_str),
        Some("PetComparator")
    );
}
