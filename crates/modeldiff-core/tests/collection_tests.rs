#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{person, person_def, pet};
use modeldiff_core::{Comparator, RecordRef};

fn compare_pets(first: Vec<RecordRef>, second: Vec<RecordRef>) -> Comparator {
    Comparator::new(
        person_def(),
        person(1, "Alice", 30).set("pets", first).into_ref(),
        person(1, "Alice", 30).set("pets", second).into_ref(),
    )
    .unwrap()
}

#[test]
fn test_extra_member_compared_against_absence() {
    let cmp = compare_pets(
        vec![pet(1, "Tom", "cat"), pet(2, "Rex", "dog")],
        vec![pet(1, "Tom", "cat")],
    );

    assert_eq!(cmp.total_difference_count().unwrap(), 2);
    assert_eq!(
        cmp.changed_field_labels().unwrap(),
        vec!["Pet name", "Species"]
    );

    let pets = cmp.bound_field("pets").unwrap();
    assert_eq!(pets.nested().len(), 2);
    assert!(pets.nested()[1].second().is_none());
}

#[test]
fn test_shrinking_to_empty() {
    let cmp = compare_pets(
        vec![
            pet(1, "Tom", "cat"),
            pet(2, "Rex", "dog"),
            pet(3, "Nemo", "fish"),
        ],
        vec![],
    );

    // Each removed member differs from absence on both of its fields.
    assert_eq!(cmp.total_difference_count().unwrap(), 6);
    let labels = cmp.changed_field_labels().unwrap();
    assert_eq!(labels.len(), 6);
    assert_eq!(labels.iter().filter(|l| *l == "Species").count(), 3);
}

#[test]
fn test_count_is_sum_of_pairs() {
    let cmp = compare_pets(
        vec![pet(1, "Tom", "cat"), pet(2, "Rex", "dog")],
        vec![pet(1, "Tommy", "cat"), pet(2, "Rex", "wolf"), pet(3, "Nemo", "fish")],
    );

    let pets = cmp.bound_field("pets").unwrap();
    let per_pair: Vec<usize> = pets
        .nested()
        .iter()
        .map(|c| c.total_difference_count().unwrap())
        .collect();
    assert_eq!(per_pair, vec![1, 1, 2]);
    assert_eq!(pets.difference_count(), 4);
    assert_eq!(cmp.total_difference_count().unwrap(), 4);
}

#[test]
fn test_pairing_is_positional() {
    let cmp = compare_pets(
        vec![pet(1, "Tom", "cat"), pet(2, "Rex", "dog")],
        vec![pet(2, "Rex", "dog"), pet(1, "Tom", "cat")],
    );

    assert_eq!(cmp.total_difference_count().unwrap(), 4);
    assert_eq!(
        cmp.changed_field_labels().unwrap(),
        vec!["Pet name", "Species", "Pet name", "Species"]
    );
}

#[test]
fn test_identical_collections() {
    let cmp = compare_pets(
        vec![pet(1, "Tom", "cat"), pet(2, "Rex", "dog")],
        vec![pet(1, "Tom", "cat"), pet(2, "Rex", "dog")],
    );
    assert_eq!(cmp.total_difference_count().unwrap(), 0);
    assert_eq!(cmp.bound_field("pets").unwrap().nested().len(), 2);
}

#[test]
fn test_missing_collection_reads_as_empty() {
    let cmp = Comparator::new(
        person_def(),
        person(1, "Alice", 30).into_ref(),
        person(1, "Alice", 30).set("pets", Vec::<RecordRef>::new()).into_ref(),
    )
    .unwrap();
    let pets = cmp.bound_field("pets").unwrap();
    assert_eq!(pets.difference_count(), 0);
    assert!(pets.nested().is_empty());
}
