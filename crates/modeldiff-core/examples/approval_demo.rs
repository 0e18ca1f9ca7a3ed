//! Approval screen demo
//!
//! Loads a comparator catalog, compares a pending change of a person record
//! against the approved version and prints the Markdown table and summary.

use modeldiff_core::logging_facility::{init, Profile};
use modeldiff_core::schema::memory::{MemoryRecord, MemorySchema};
use modeldiff_core::summary::render_human_summary;
use modeldiff_core::{Catalog, FieldMeta, MarkdownRenderer, ModelMeta, RecordRef};

const CATALOG: &str = r#"
[[comparator]]
name = "PetComparator"
model = "Pet"
fields = ["name", "species"]

[[comparator]]
name = "PersonComparator"
model = "Person"
exclude = ["id"]

[comparator.related]
pets = "PetComparator"
"#;

fn pet(pk: i64, name: &str, species: &str) -> RecordRef {
    MemoryRecord::new("Pet")
        .with_pk(pk)
        .set("name", name)
        .set("species", species)
        .into_ref()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);

    let schema = MemorySchema::new()
        .with_model(
            ModelMeta::new("Person", "Person")
                .field(FieldMeta::scalar("id", "ID"))
                .field(FieldMeta::scalar("name", "Name"))
                .field(FieldMeta::scalar("email", "Email"))
                .field(FieldMeta::one_to_one("passport", "Passport", "Passport"))
                .field(FieldMeta::reverse_many_to_one("pets", "Pet", "Pets")),
        )
        .with_model(
            ModelMeta::new("Passport", "Passport")
                .field(FieldMeta::scalar("number", "Number"))
                .field(FieldMeta::scalar("expires", "Expires")),
        )
        .with_model(
            ModelMeta::new("Pet", "Pet")
                .field(FieldMeta::scalar("name", "Name"))
                .field(FieldMeta::scalar("species", "Species"))
                .field(FieldMeta::scalar("chip", "Chip")),
        )
        .into_shared();

    let catalog = Catalog::from_toml_str(schema, CATALOG)?;

    let expires = chrono::NaiveDate::from_ymd_opt(2030, 5, 1).ok_or("invalid date")?;
    let approved = MemoryRecord::new("Person")
        .with_pk(7)
        .set("id", 7)
        .set("name", "Alice Smith")
        .set("email", "alice@example.com")
        .set(
            "passport",
            MemoryRecord::new("Passport")
                .with_pk(3)
                .set("number", "X1234")
                .set("expires", expires)
                .into_ref(),
        )
        .set("pets", vec![pet(1, "Tom", "cat"), pet(2, "Rex", "dog")])
        .into_ref();
    let pending = MemoryRecord::new("Person")
        .with_pk(7)
        .set("id", 7)
        .set("name", "Alice Jones")
        .set("email", "alice@example.com")
        .set(
            "passport",
            MemoryRecord::new("Passport")
                .with_pk(3)
                .set("number", "Y9876")
                .set("expires", expires)
                .into_ref(),
        )
        .set("pets", vec![pet(1, "Tom", "cat")])
        .into_ref();

    let comparator = catalog.compare("PersonComparator", approved, pending)?;

    println!("{} change(s)\n", comparator.total_difference_count()?);
    println!("{}", MarkdownRenderer::new().render_table(&comparator)?);
    println!("{}", render_human_summary(&comparator.summary()?));

    Ok(())
}
