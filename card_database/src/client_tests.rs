//! Tests for the client export loader

use crate::client::{ClientCard, ClientExport, Localization};
use crate::error::BuildError;
use tempfile::TempDir;

const LOC_JSON: &str = r#"[
    {
        "isoCode": "en-US",
        "keys": [
            { "id": 100, "text": "Shock" },
            { "id": 101, "text": "Opt" }
        ]
    },
    {
        "isoCode": "fr-FR",
        "keys": [
            { "id": 100, "text": "Choc" }
        ]
    }
]"#;

const CARDS_JSON: &str = r#"[
    { "grpid": 1, "titleId": 100, "CollectorNumber": "159", "set": "M21", "isPrimaryCard": true, "rarity": 2 },
    { "grpid": 2, "titleId": 100, "CollectorNumber": "159", "set": "M21", "isPrimaryCard": false },
    { "grpid": 3, "titleId": 101, "CollectorNumber": "65", "set": "XLN", "isPrimaryCard": true }
]"#;

fn write_export(dir: &std::path::Path) {
    std::fs::write(dir.join("data_loc_abc.mtga"), LOC_JSON).unwrap();
    std::fs::write(dir.join("data_cards_abc.mtga"), CARDS_JSON).unwrap();
}

#[test]
fn test_load_uses_first_localization_block() {
    let temp_dir = TempDir::new().unwrap();
    write_export(temp_dir.path());

    let export = ClientExport::load(temp_dir.path()).unwrap();
    assert_eq!(export.localization.get(100), Some("Shock"));
    assert_eq!(export.localization.len(), 2);
    assert_eq!(export.cards.len(), 3);
}

#[test]
fn test_primary_entries_skip_variants() {
    let temp_dir = TempDir::new().unwrap();
    write_export(temp_dir.path());

    let export = ClientExport::load(temp_dir.path()).unwrap();
    let entries = export.primary_entries().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].internal_id, 1);
    assert_eq!(entries[0].display_name, "Shock");
    assert_eq!(entries[0].set_code, "M21");
    assert_eq!(entries[0].collector_number, "159");
    assert_eq!(entries[1].display_name, "Opt");
}

#[test]
fn test_missing_card_files_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("data_loc_abc.mtga"), LOC_JSON).unwrap();

    let result = ClientExport::load(temp_dir.path());
    assert!(matches!(result, Err(BuildError::MissingFile(_))));
}

#[test]
fn test_missing_localization_files_yield_empty_table() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("data_cards_abc.mtga"), CARDS_JSON).unwrap();

    let export = ClientExport::load(temp_dir.path()).unwrap();
    assert!(export.localization.is_empty());
    assert!(matches!(
        export.primary_entries(),
        Err(BuildError::MissingLocalization { grpid: 1, title_id: 100 })
    ));
}

#[test]
fn test_unlocalized_primary_card_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let loc_path = temp_dir.path().join("data_loc_abc.mtga");
    std::fs::write(&loc_path, LOC_JSON).unwrap();
    let localization = Localization::load(&[loc_path]).unwrap();
    let card = ClientCard {
        grpid: 7,
        title_id: 999,
        collector_number: "1".to_string(),
        set: "war".to_string(),
        is_primary_card: true,
    };

    match card.resolve(&localization) {
        Err(BuildError::MissingLocalization { grpid, title_id }) => {
            assert_eq!(grpid, 7);
            assert_eq!(title_id, 999);
        }
        other => panic!("Expected MissingLocalization, got: {other:?}"),
    }
}
