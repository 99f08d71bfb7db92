//! Tests for catalog resolution

use crate::app::models::SampleType;
use crate::app::services::sql_writer::catalog::{Catalog, SnameResolution};

fn catalog() -> Catalog {
    Catalog::from_defaults().unwrap()
}

#[test]
fn test_collection_system_lookup() {
    let catalog = catalog();
    assert_eq!(catalog.collection_system("Samsung Tablet A"), Some("SA"));
    assert_eq!(catalog.collection_system("Samsung Tablet I"), Some("SI"));
    assert_eq!(catalog.collection_system("Nokia Brick"), None);
}

#[test]
fn test_sname_resolution() {
    let catalog = catalog();
    assert_eq!(
        catalog.resolve_sname("VEE"),
        SnameResolution::Known("VEE".to_string())
    );
    assert_eq!(
        catalog.resolve_sname("998"),
        SnameResolution::Unknown("998".to_string())
    );
    // XXX and NULL mean no neighbor at all.
    assert_eq!(catalog.resolve_sname("XXX"), SnameResolution::Absent);
    assert_eq!(catalog.resolve_sname("NULL"), SnameResolution::Absent);
}

#[test]
fn test_ncode_resolution_is_protocol_dependent() {
    let catalog = catalog();

    assert_eq!(
        catalog.resolve_ncode("N0", &SampleType::AdultFemale),
        Some("1")
    );
    assert_eq!(
        catalog.resolve_ncode("N1", &SampleType::AdultFemale),
        Some("A")
    );
    assert_eq!(
        catalog.resolve_ncode("N2", &SampleType::AdultFemale),
        Some("O")
    );

    assert_eq!(catalog.resolve_ncode("N0", &SampleType::Juvenile), Some("1"));
    assert_eq!(catalog.resolve_ncode("N1", &SampleType::Juvenile), Some("2"));
    assert_eq!(catalog.resolve_ncode("N2", &SampleType::Juvenile), Some("3"));

    assert_eq!(catalog.resolve_ncode("N9", &SampleType::Juvenile), None);
    assert_eq!(
        catalog.resolve_ncode("N0", &SampleType::Other("ADM".to_string())),
        None
    );
}

#[test]
fn test_acts_saved_as_notes() {
    let catalog = catalog();
    assert!(catalog.act_saved_as_note("M"));
    assert!(catalog.act_saved_as_note("E"));
    assert!(catalog.act_saved_as_note("C"));
    assert!(!catalog.act_saved_as_note("G"));
}

#[test]
fn test_behavior_keywords_are_word_bounded() {
    let catalog = catalog();

    assert_eq!(catalog.behaviors_in_text("VEE C UJU"), vec!["C"]);
    assert_eq!(catalog.behaviors_in_text("vee consorting uju"), vec!["C"]);
    assert_eq!(catalog.behaviors_in_text("VEE MOUNT UJU"), vec!["M"]);
    // Substrings do not match.
    assert!(catalog.behaviors_in_text("CONSORTIUM MEETING").is_empty());
    assert!(catalog.behaviors_in_text("EMEMBE GROOMING").is_empty());
}

#[test]
fn test_note_prefix() {
    let catalog = catalog();
    assert_eq!(catalog.note_prefix("VEE consort UJU"), "C");
    assert_eq!(catalog.note_prefix("VEE M UJU"), "O");
    assert_eq!(catalog.note_prefix("group moved north"), "O");
}
